//! Logger configuration loaded from TOML.
//!
//! ```toml
//! # Level applied to every channel after they are built (optional)
//! level = "info"
//!
//! # Erasable console channel on stdout (omit for none)
//! [console]
//! level = "debug"
//!
//! # Any number of file channels; files are truncated when opened
//! [[files]]
//! name = "main"
//! path = "session.log"
//! level = "trace"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::log::{LogLevel, Logger};

/// Main configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Overrides the level of every channel
    pub level: Option<LogLevel>,
    /// Console channel settings
    pub console: Option<ConsoleConfig>,
    /// File channels
    pub files: Vec<FileChannelConfig>,
}

/// Console channel configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub level: LogLevel,
}

/// File channel configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileChannelConfig {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub level: LogLevel,
}

impl LoggerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from `path`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading logger config from {}", path.display());
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize back to TOML
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Build a logger with the configured channels
    pub fn build(&self) -> Result<Logger> {
        let mut logger = Logger::new();
        if let Some(console) = &self.console {
            logger.add_console_channel(console.level)?;
        }
        for file in &self.files {
            logger.add_file_channel(file.name.as_str(), &file.path, file.level)?;
        }
        if let Some(level) = self.level {
            logger.set_level(level);
        }
        Ok(logger)
    }
}
