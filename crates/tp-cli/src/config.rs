//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tp_core::{CurrencyCode, TimelineConfig, ValidationError};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Pixels per hour on the day timeline.
    pub hour_height: f64,
    /// Smallest height any timeline item is drawn with.
    pub min_height: f64,
    /// Base currency for trips that do not set their own.
    pub base_currency: CurrencyCode,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("hour_height", &self.hour_height)
            .field("min_height", &self.min_height)
            .field("base_currency", &self.base_currency.as_str())
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        let timeline = TimelineConfig::default();
        Self {
            hour_height: timeline.hour_height,
            min_height: timeline.min_height,
            base_currency: CurrencyCode::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (TP_*)
        figment = figment.merge(Env::prefixed("TP_"));

        figment.extract()
    }

    /// The validated timeline scale.
    pub fn timeline(&self) -> Result<TimelineConfig, ValidationError> {
        TimelineConfig::new(self.hour_height, self.min_height)
    }
}

/// Returns the platform-specific config directory for tp.
///
/// On Linux: `~/.config/tp`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tp"))
}
