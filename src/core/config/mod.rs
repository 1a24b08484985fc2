//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. Environment (`OPENAI_BASE_URL`, applied by the translator)
//! 4. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order, first hit wins:
//! 1. `$REFINENB_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/refinenb/config.toml`
//! 3. `~/.refinenb/config.toml`
//!
//! A missing file is not an error.
//!
//! # Example
//!
//! ```no_run
//! use refinenb::core::config::Config;
//!
//! let config = Config::load().unwrap();
//! println!("Model: {}", config.model());
//! println!("Backups: {}", config.backup());
//! ```

pub mod schema;

pub use schema::{GlobalConfig, TranslateConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;
/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
/// Default environment variable carrying the API key.
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration with defaults applied through accessors.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub global: GlobalConfig,
    /// Path the config was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be parsed or
    /// holds invalid values.
    pub fn load() -> Result<Self, ConfigError> {
        match Self::locate() {
            Some(path) => Self::from_file(&path),
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load and validate a specific config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let global: GlobalConfig =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        global.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Self {
            global,
            path: Some(path.to_path_buf()),
        })
    }

    /// Wrap already-parsed settings.
    pub fn from_global(global: GlobalConfig) -> Self {
        Self { global, path: None }
    }

    /// Find the first existing config file.
    fn locate() -> Option<PathBuf> {
        // 1. Check $REFINENB_CONFIG
        if let Ok(path) = std::env::var("REFINENB_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/refinenb/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("refinenb/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.refinenb/config.toml
        dirs::home_dir()
            .map(|home| home.join(".refinenb/config.toml"))
            .filter(|path| path.exists())
    }

    /// Path the config was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    fn translate(&self) -> Option<&TranslateConfig> {
        self.global.translate.as_ref()
    }

    /// Whether to keep a backup before in-place rewrites.
    ///
    /// Defaults to `true` if not configured.
    pub fn backup(&self) -> bool {
        self.global.backup.unwrap_or(true)
    }

    /// Chat model name.
    pub fn model(&self) -> &str {
        self.translate()
            .and_then(|t| t.model.as_deref())
            .unwrap_or(DEFAULT_MODEL)
    }

    /// Sampling temperature.
    pub fn temperature(&self) -> f64 {
        self.translate()
            .and_then(|t| t.temperature)
            .unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Configured API base URL.
    pub fn api_base(&self) -> &str {
        self.translate()
            .and_then(|t| t.api_base.as_deref())
            .unwrap_or(DEFAULT_API_BASE)
    }

    /// Environment variable that holds the API key.
    pub fn api_key_env(&self) -> &str {
        self.translate()
            .and_then(|t| t.api_key_env.as_deref())
            .unwrap_or(DEFAULT_API_KEY_ENV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert!(config.backup());
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.temperature(), DEFAULT_TEMPERATURE);
        assert_eq!(config.api_base(), DEFAULT_API_BASE);
        assert_eq!(config.api_key_env(), DEFAULT_API_KEY_ENV);
        assert!(config.path().is_none());
    }

    #[test]
    fn file_values_override_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "backup = false\n[translate]\nmodel = \"gpt-4o-mini\"\ntemperature = 0.1\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(!config.backup());
        assert_eq!(config.model(), "gpt-4o-mini");
        assert_eq!(config.temperature(), 0.1);
        assert_eq!(config.api_base(), DEFAULT_API_BASE);
        assert_eq!(config.path(), Some(path.as_path()));
    }

    #[test]
    fn parse_error_names_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "backup = ").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn invalid_value_is_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[translate]\ntemperature = 9.0\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::InvalidValue(_))
        ));
    }
}
