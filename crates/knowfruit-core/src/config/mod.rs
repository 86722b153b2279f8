//! Configuration management for Know Your Fruit.
//!
//! Configuration is loaded once at startup from a TOML file and then treated
//! as read-only. All config structs implement `Default` with the values of
//! the production deployment.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use crate::labels::ClassNames;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Know Your Fruit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Remote model settings
    pub model: ModelConfig,

    /// Class vocabulary and ranking
    pub classes: ClassesConfig,

    /// Caller-side retry policy
    pub pipeline: PipelineConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Web front end settings
    pub server: ServerConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.knowfruit.knowfruit/config.toml
    /// - Linux: ~/.config/knowfruit/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\knowfruit\config\config.toml
    ///
    /// Falls back to ~/.knowfruit/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "knowfruit", "knowfruit")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".knowfruit").join("config.toml")
            })
    }

    /// Build the immutable class table from `classes.names`.
    pub fn class_names(&self) -> Result<ClassNames, ConfigError> {
        ClassNames::new(self.classes.names.clone())
    }

    /// Get the resolved static asset directory (with ~ expansion).
    pub fn static_dir(&self) -> PathBuf {
        expand_path(&self.server.static_dir)
    }

    /// Get the resolved fruit info file path (with ~ expansion).
    pub fn fruit_info_path(&self) -> PathBuf {
        expand_path(&self.server.fruit_info_path)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}
