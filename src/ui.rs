use chrono::{Datelike, Local};
use ratatui::{
    layout::{Constraint, Direction, Layout, Position, Rect, Size},
    prelude::*,
    symbols,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Tabs, Wrap},
};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::app::App;
use crate::clipboard::ClipboardWrite;
use crate::content::Section;
use crate::models::{AlertKind, FocusArea};
use crate::page;
use crate::utils::centered_rect;

const NAV_HEIGHT: u16 = 3;
const FOOTER_HEIGHT: u16 = 3;

const KEY_HELP: [(&str, &str); 11] = [
    ("j/k, ↑/↓", "Scroll one line"),
    ("PgUp/PgDn, Space", "Scroll one page"),
    ("g/Home, G/End", "Top / bottom"),
    ("1-5", "Jump to a section"),
    ("Tab/Shift+Tab", "Next / previous section"),
    ("e", "Copy email"),
    ("p", "Copy phone"),
    ("f", "Write a message"),
    ("m", "Menu (narrow terminals)"),
    ("?", "Toggle this help"),
    ("q/Esc", "Quit"),
];

fn split(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(NAV_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Area the scrolling page is drawn into.
pub fn page_area(area: Rect) -> Rect {
    split(area)[1]
}

/// Width left for page content once the scrollbar column is taken.
pub fn content_width(page: Rect) -> u16 {
    page.width.saturating_sub(1)
}

/// Renders the whole screen.
pub fn render<C: ClipboardWrite>(f: &mut Frame, app: &App<C>) {
    let [nav_area, page_area, footer_area] = split(f.area());
    f.render_widget(Block::default().style(Style::default().bg(app.theme.root_bg)), f.area());

    render_navbar(f, app, nav_area);
    render_page(f, app, page_area);
    render_footer(f, app, footer_area);

    if app.nav_open {
        render_nav_menu(f, app, nav_area);
    }
    if app.show_help {
        render_help(f, app);
    }
    if let Some(alert) = app.alerts.current() {
        let theme = &app.theme;
        let popup_area = centered_rect(50, 30, f.area());
        f.render_widget(Clear, popup_area);
        let border = match alert.kind {
            AlertKind::Error => theme.popup_error_border,
            AlertKind::Info => theme.popup_info_border,
        };
        let block = Block::default()
            .title(Span::styled(format!(" {} ", alert.title), theme.popup_title))
            .title_bottom(Line::from(" Enter/Esc to dismiss ").right_aligned())
            .borders(Borders::ALL)
            .style(border);
        let para = Paragraph::new(alert.text.clone())
            .block(block)
            .wrap(Wrap { trim: true })
            .style(theme.popup_text);
        f.render_widget(para, popup_area);
    }
}

fn render_navbar<C: ClipboardWrite>(f: &mut Frame, app: &App<C>, area: Rect) {
    let theme = &app.theme;
    let name = &app.portfolio.owner.name;
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(name.chars().count() as u16 + 4), Constraint::Min(1)])
        .split(area);

    let brand = Paragraph::new(name.as_str())
        .style(theme.brand)
        .block(Block::default().borders(Borders::TOP | Borders::BOTTOM | Borders::LEFT).style(theme.footer));
    f.render_widget(brand, chunks[0]);

    let nav_block = Block::default().borders(Borders::ALL).style(theme.footer);
    if app.is_narrow() {
        let hint = if app.nav_open { "✕ [m] Close" } else { "☰ [m] Menu" };
        let toggle = Paragraph::new(hint)
            .style(theme.nav_item)
            .alignment(Alignment::Right)
            .block(nav_block);
        f.render_widget(toggle, chunks[1]);
        return;
    }

    let titles = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{} {}", i + 1, s.label()));
    let tabs = Tabs::new(titles)
        .block(nav_block)
        .style(theme.nav_item)
        .highlight_style(theme.nav_active)
        .select(app.active_section().map(Section::index).unwrap_or(0))
        .divider(symbols::DOT)
        .padding(" ", " ");
    f.render_widget(tabs, chunks[1]);
}

fn render_page<C: ClipboardWrite>(f: &mut Frame, app: &App<C>, area: Rect) {
    let width = content_width(area);
    let layout = app.layout();
    let view = app.page_view();

    let mut scroll_view = ScrollView::new(Size::new(width, layout.height()))
        .horizontal_scrollbar_visibility(ScrollbarVisibility::Never)
        .vertical_scrollbar_visibility(ScrollbarVisibility::Always);
    for (i, (section, bounds)) in layout.sections.iter().enumerate() {
        let lines = page::section_lines(&view, *section, width);
        let rect = Rect::new(0, bounds.top, width, bounds.height);
        let para = Paragraph::new(lines)
            .block(Block::default().padding(Padding::horizontal(2)))
            .style(Style::default().bg(app.theme.section_bg[i % 2]).fg(app.theme.text));
        scroll_view.render_widget(para, rect);
    }

    let mut state = ScrollViewState::default();
    state.set_offset(Position::new(0, app.offset()));
    f.render_stateful_widget(scroll_view, area, &mut state);
}

fn render_footer<C: ClipboardWrite>(f: &mut Frame, app: &App<C>, area: Rect) {
    let year = Local::now().year();
    let hints = match app.focus {
        FocusArea::Form => "Tab Next field | Enter Send | Esc Leave form",
        FocusArea::Page => "j/k Scroll | 1-5/Tab Sections | e/p Copy | f Message | ? Help | q Quit",
    };
    let footer = Paragraph::new(format!(
        "© {} {}. All rights reserved. | {}",
        year, app.portfolio.owner.name, hints
    ))
    .block(Block::default().borders(Borders::ALL))
    .style(app.theme.footer);
    f.render_widget(footer, area);
}

fn render_nav_menu<C: ClipboardWrite>(f: &mut Frame, app: &App<C>, nav_area: Rect) {
    let theme = &app.theme;
    let width = 20u16.min(nav_area.width);
    let height = (Section::ALL.len() as u16 + 2).min(f.area().height.saturating_sub(nav_area.bottom()));
    let area = Rect::new(nav_area.right().saturating_sub(width), nav_area.bottom(), width, height);
    f.render_widget(Clear, area);

    let items: Vec<ListItem> = Section::ALL
        .iter()
        .enumerate()
        .map(|(i, s)| ListItem::new(format!("{} {}", i + 1, s.label())))
        .collect();
    let mut state = ListState::default();
    state.select(app.active_section().map(Section::index));
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).style(theme.popup_info_border))
        .style(theme.nav_item)
        .highlight_style(theme.nav_active)
        .highlight_symbol("→");
    f.render_stateful_widget(list, area, &mut state);
}

fn render_help<C: ClipboardWrite>(f: &mut Frame, app: &App<C>) {
    let theme = &app.theme;
    let popup_area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, popup_area);

    let lines: Vec<Line> = KEY_HELP
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:<18}"), theme.card_title),
                Span::styled(*action, theme.popup_text),
            ])
        })
        .collect();
    let para = Paragraph::new(lines).block(
        Block::default()
            .title(Span::styled(" Keys ", theme.popup_title))
            .borders(Borders::ALL)
            .style(theme.popup_info_border),
    );
    f.render_widget(para, popup_area);
}
