use crate::consts;
use ratatui::style::Style;
use serde::Deserialize;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Program configuration read from a configuration file
#[derive(Clone, Copy, Deserialize, Debug, Default, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Settings for gameplay
    pub(crate) game: GameConfig,

    /// Styles for the various things drawn on the screen
    pub(crate) styles: Styles,
}

impl Config {
    /// Return the default configuration file path
    pub(crate) fn default_path() -> Result<PathBuf, ConfigError> {
        dirs::config_local_dir()
            .map(|p| p.join("gridsnake").join("config.toml"))
            .ok_or(ConfigError::NoPath)
    }

    /// Read configuration from a file on disk.  If the file does not exist and
    /// `allow_missing` is true, a default `Config` value is returned.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the file could not be read or if the file's contents
    /// could not be deserialized.
    pub(crate) fn load(path: &Path, allow_missing: bool) -> Result<Config, ConfigError> {
        let content = match fs_err::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
                tracing::debug!(path = %path.display(), "No configuration file; using defaults");
                return Ok(Config::default());
            }
            Err(e) => return Err(ConfigError::Read(e)),
        };
        let config = toml::from_str::<Config>(&content)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }
}

#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(from = "RawGameConfig")]
pub(crate) struct GameConfig {
    /// Time between movements of the snake
    pub(crate) tick_period: Duration,
}

impl Default for GameConfig {
    fn default() -> GameConfig {
        GameConfig {
            tick_period: consts::TICK_PERIOD,
        }
    }
}

#[derive(Clone, Deserialize, Debug, Default)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct RawGameConfig {
    /// Milliseconds
    tick_period: Option<NonZeroU64>,
}

impl From<RawGameConfig> for GameConfig {
    fn from(value: RawGameConfig) -> GameConfig {
        GameConfig {
            tick_period: value
                .tick_period
                .map_or(consts::TICK_PERIOD, |ms| Duration::from_millis(ms.get())),
        }
    }
}

/// Styles used when drawing the game
#[derive(Clone, Copy, Deserialize, Debug, Eq, PartialEq)]
#[serde(from = "RawStyles")]
pub(crate) struct Styles {
    pub(crate) snake: Style,
    pub(crate) food: Style,
    pub(crate) collision: Style,
    pub(crate) score_bar: Style,
    pub(crate) key: Style,
    pub(crate) menu_selection: Style,
}

impl Default for Styles {
    fn default() -> Styles {
        Styles {
            snake: consts::SNAKE_STYLE,
            food: consts::FOOD_STYLE,
            collision: consts::COLLISION_STYLE,
            score_bar: consts::SCORE_BAR_STYLE,
            key: consts::KEY_STYLE,
            menu_selection: consts::MENU_SELECTION_STYLE,
        }
    }
}

/// Style strings as written in the configuration file, e.g., `"bold green"`
#[derive(Clone, Deserialize, Debug, Default)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct RawStyles {
    snake: Option<parse_style::Style>,
    food: Option<parse_style::Style>,
    collision: Option<parse_style::Style>,
    score_bar: Option<parse_style::Style>,
    key: Option<parse_style::Style>,
    menu_selection: Option<parse_style::Style>,
}

impl From<RawStyles> for Styles {
    fn from(value: RawStyles) -> Styles {
        fn or_default(style: Option<parse_style::Style>, default: Style) -> Style {
            style.map_or(default, Style::from)
        }

        let defaults = Styles::default();
        Styles {
            snake: or_default(value.snake, defaults.snake),
            food: or_default(value.food, defaults.food),
            collision: or_default(value.collision, defaults.collision),
            score_bar: or_default(value.score_bar, defaults.score_bar),
            key: or_default(value.key, defaults.key),
            menu_selection: or_default(value.menu_selection, defaults.menu_selection),
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    #[error("failed to determine path to local configuration directory")]
    NoPath,
    #[error("failed to read configuration file")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration file")]
    Parse(#[from] toml::de::Error),
}
