use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::content::Section;
use crate::tracker::TieBreak;

/// Project defaults, also written out as the user's starting config.
const BLUEPRINT: &str = include_str!("../folio.toml");

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub typing: TypingSettings,
    pub clipboard: ClipboardSettings,
    pub tracker: TrackerSettings,
    pub ui: UiSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TypingSettings {
    pub delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClipboardSettings {
    pub window_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrackerSettings {
    pub threshold: f32,
    pub root_margin: i16,
    pub tie_break: TieBreak,
    pub default_section: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UiSettings {
    pub tick_rate_ms: u64,
    pub narrow_width: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogSettings {
    pub file: Option<String>,
    pub filter: String,
}

/// Values given on the command line; they win over every file and env source.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub config_file: Option<PathBuf>,
    pub typing_delay_ms: Option<u64>,
    pub copy_window_ms: Option<u64>,
    pub log_file: Option<String>,
}

impl Settings {
    pub fn new(overrides: &Overrides) -> Result<Self, ConfigError> {
        let user_config_path = get_user_config_path();

        // Seed the user config from the blueprint on first run.
        if let Some(path) = &user_config_path {
            if !path.exists() {
                if let Err(err) = write_blueprint(path) {
                    warn!(path = %path.display(), error = %err, "could not create user config");
                }
            }
        }

        // 1. Built-in defaults.
        let mut builder = Config::builder().add_source(File::from_str(BLUEPRINT, FileFormat::Toml));
        // 2. User's global config.
        if let Some(path) = user_config_path {
            builder = builder.add_source(File::from(path).required(false));
        }
        // 3. Local folio.toml from CWD.
        builder = builder.add_source(File::with_name("folio.toml").required(false));
        // 4. Explicit --config file, which must exist.
        if let Some(path) = &overrides.config_file {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }
        // 5. FOLIO_TYPING__DELAY_MS and friends.
        builder = builder.add_source(
            Environment::with_prefix("FOLIO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .set_override_option("typing.delay_ms", overrides.typing_delay_ms)?
            .set_override_option("clipboard.window_ms", overrides.copy_window_ms)?
            .set_override_option("log.file", overrides.log_file.clone())?
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.tracker.threshold) {
            return Err(ConfigError::Message(format!(
                "tracker.threshold must be between 0 and 1, got {}",
                self.tracker.threshold
            )));
        }
        if Section::from_id(&self.tracker.default_section).is_none() {
            return Err(ConfigError::Message(format!(
                "tracker.default_section '{}' is not a section",
                self.tracker.default_section
            )));
        }
        if self.clipboard.window_ms == 0 {
            return Err(ConfigError::Message("clipboard.window_ms must be greater than 0".into()));
        }
        Ok(())
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing.delay_ms)
    }

    pub fn copy_window(&self) -> Duration {
        Duration::from_millis(self.clipboard.window_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.ui.tick_rate_ms.max(1))
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log
            .file
            .as_deref()
            .filter(|f| !f.is_empty())
            .map(|f| PathBuf::from(shellexpand::tilde(f).into_owned()))
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

pub fn get_user_config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".config");
    path.push("folio");
    path.push("folio.toml");
    Some(path)
}

fn write_blueprint(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, BLUEPRINT)
}
