//! Marquee configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vk_scroll::{ScrollConfig, ScrollConfigError};

/// Directory under the platform config dir holding `config.json`.
const CONFIG_DIR_NAME: &str = "vk-marquee";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid scroll settings: {0}")]
    Scroll(#[from] ScrollConfigError),

    #[error("Invalid session settings: {0}")]
    Session(String),
}

/// Timing of the session controller. All values in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Presentation tick period.
    pub tick_interval_ms: u64,
    /// How long a completed phrase stays up before the next one loads.
    pub settle_delay_ms: u64,
    /// Pause before restarting a recognizer that ended on its own.
    pub restart_delay_ms: u64,
    /// Minimum time between two recognizer starts.
    pub min_restart_interval_ms: u64,
    /// Consecutive restarts that die within `min_restart_interval_ms`
    /// tolerated before recognition is given up for the run.
    pub max_rapid_restarts: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            settle_delay_ms: 1500,
            restart_delay_ms: 100,
            min_restart_interval_ms: 1000,
            max_rapid_restarts: 10,
        }
    }
}

impl SessionConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    pub fn min_restart_interval(&self) -> Duration {
        Duration::from_millis(self.min_restart_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Session(
                "tick_interval_ms must be at least 1".to_string(),
            ));
        }
        if self.min_restart_interval_ms == 0 {
            return Err(ConfigError::Session(
                "min_restart_interval_ms must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Complete marquee configuration as stored on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarqueeConfig {
    pub scroll: ScrollConfig,
    pub session: SessionConfig,
}

impl MarqueeConfig {
    /// `<config dir>/vk-marquee/config.json`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse and validate config JSON. Missing fields take their defaults.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: MarqueeConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scroll.validate()?;
        self.session.validate()
    }
}
