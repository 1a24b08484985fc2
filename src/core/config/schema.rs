//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Config values are validated after parsing so that a bad value is
//! reported with the file it came from rather than surfacing later as an
//! API error.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// User configuration.
///
/// # Example
///
/// ```toml
/// backup = true
///
/// [translate]
/// model = "gpt-4o"
/// temperature = 0.3
/// api_base = "https://api.openai.com/v1"
/// api_key_env = "OPENAI_API_KEY"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GlobalConfig {
    /// Keep a `.bak` copy before rewriting a notebook in place
    pub backup: Option<bool>,

    /// Translation service settings
    pub translate: Option<TranslateConfig>,
}

impl GlobalConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(translate) = &self.translate {
            translate.validate()?;
        }
        Ok(())
    }
}

/// Translation service settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TranslateConfig {
    /// Chat model name
    pub model: Option<String>,

    /// Sampling temperature
    pub temperature: Option<f64>,

    /// Base URL of an OpenAI-compatible API
    pub api_base: Option<String>,

    /// Name of the environment variable holding the API key
    pub api_key_env: Option<String>,
}

impl TranslateConfig {
    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("model", &self.model),
            ("api_base", &self.api_base),
            ("api_key_env", &self.api_key_env),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(format!(
                    "translate.{} cannot be empty",
                    name
                )));
            }
        }

        if let Some(temperature) = self.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(ConfigError::InvalidValue(format!(
                    "translate.temperature must be between 0 and 2, got {}",
                    temperature
                )));
            }
        }

        if let Some(base) = &self.api_base {
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(ConfigError::InvalidValue(format!(
                    "translate.api_base must be an http(s) URL, got '{}'",
                    base
                )));
            }
        }

        Ok(())
    }
}
