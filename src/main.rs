mod app;
mod clipboard;
mod config;
mod content;
mod error;
mod input;
mod logging;
mod models;
mod page;
mod scheduler;
mod theme;
mod tracker;
mod typing;
mod ui;
mod utils;
mod viewport;

use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Runtime;
use tracing::info;

use crate::app::App;
use crate::config::{Overrides, Settings};
use crate::content::Portfolio;

/// A single-page portfolio in your terminal.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Extra config file layered over the user config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// TOML file with the portfolio content.
    #[arg(long, value_name = "PATH")]
    content: Option<PathBuf>,

    /// Milliseconds between revealed characters of the greeting.
    #[arg(long, value_name = "MS")]
    typing_delay: Option<u64>,

    /// How long "Copied!" stays up, in milliseconds.
    #[arg(long, value_name = "MS")]
    copy_window: Option<u64>,

    /// Where to write logs.
    #[arg(long, value_name = "PATH")]
    log_file: Option<String>,

    /// Print the effective settings as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let overrides = Overrides {
        config_file: cli.config,
        typing_delay_ms: cli.typing_delay,
        copy_window_ms: cli.copy_window,
        log_file: cli.log_file,
    };
    let settings = Settings::new(&overrides).context("failed to load settings")?;

    if cli.print_config {
        print!("{}", settings.to_toml().context("failed to serialize settings")?);
        return Ok(());
    }

    logging::init(&settings)?;
    info!(
        typing_delay_ms = settings.typing.delay_ms,
        copy_window_ms = settings.clipboard.window_ms,
        threshold = settings.tracker.threshold,
        tie_break = ?settings.tracker.tie_break,
        "starting folio"
    );

    let portfolio = match &cli.content {
        Some(path) => Portfolio::from_file(path)?,
        None => Portfolio::default(),
    };

    let rt = Runtime::new().context("failed to start tokio runtime")?;
    let mut app = App::new(settings, portfolio);

    terminal::enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &rt);

    app.dispose();
    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn run(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, rt: &Runtime) -> Result<()> {
    let start = Instant::now();
    let tick_rate = app.settings.tick_rate();

    loop {
        app.advance_clock(start.elapsed());
        terminal.draw(|f| {
            let page = ui::page_area(f.area());
            app.set_frame_width(f.area().width);
            app.sync_viewport(ui::content_width(page), page.height);
            ui::render(f, app);
        })?;

        // Wake up for the next timer even when no key arrives
        let timeout = app
            .timers
            .next_deadline()
            .map(|deadline| deadline.saturating_sub(start.elapsed()))
            .map_or(tick_rate, |due| due.min(tick_rate))
            .max(Duration::from_millis(1));

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && !input::handle_key(key_event, app, rt) {
                    break;
                }
            }
        }
    }
    info!("quitting");
    Ok(())
}
