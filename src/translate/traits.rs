//! translate::traits
//!
//! Translator trait definition for language-model translation services.
//!
//! # Design
//!
//! The `Translator` trait is async because translation involves network
//! I/O. Requests are one cell at a time; callers own ordering.
//!
//! # Example
//!
//! ```ignore
//! use refinenb::translate::{ContentKind, Language, TranslationRequest, Translator};
//!
//! async fn hello(translator: &dyn Translator) -> Result<String, TranslateError> {
//!     let out = translator
//!         .translate(TranslationRequest {
//!             content: "Hello".to_string(),
//!             kind: ContentKind::Markdown,
//!             language: Language::German,
//!         })
//!         .await?;
//!     Ok(out.translated_content)
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::language::Language;

/// Errors from translation operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TranslateError {
    /// No credential is available.
    #[error("no API key found; set the {env_var} environment variable")]
    AuthRequired {
        /// Variable that was checked
        env_var: String,
    },

    /// The service rejected the credential.
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// The language code is not one refinenb translates into.
    #[error("invalid language code: {code} (supported: {supported})")]
    UnsupportedLanguage { code: String, supported: String },

    /// Rate limit exceeded.
    #[error("rate limited by translation service")]
    RateLimited,

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// Network or connection error.
    #[error("network error: {0}")]
    NetworkError(String),

    /// The service answered but the answer was unusable.
    #[error("invalid response from translation service: {0}")]
    InvalidResponse(String),
}

impl TranslateError {
    /// Whether the error concerns credentials.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            TranslateError::AuthRequired { .. } | TranslateError::AuthFailed(_)
        )
    }
}

/// What kind of text is being translated; selects the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    /// Markdown prose: translate everything, keep syntax.
    Markdown,
    /// Source code: translate comments and docstrings only.
    Code,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Markdown => write!(f, "markdown"),
            ContentKind::Code => write!(f, "code"),
        }
    }
}

/// Request to translate one piece of content.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRequest {
    /// Text to translate
    pub content: String,
    /// Prompt selector
    pub kind: ContentKind,
    /// Target language
    pub language: Language,
}

/// Structured translation result.
///
/// This is also the JSON shape the model is asked to answer with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    /// The translated content, formatting preserved
    pub translated_content: String,

    /// Detected source language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,

    /// Any notes about the translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translation_notes: Option<String>,

    /// Additional model-provided details (confidence, alternatives)
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl Translation {
    /// A result carrying only translated text.
    pub fn text(translated_content: impl Into<String>) -> Self {
        Self {
            translated_content: translated_content.into(),
            source_language: None,
            translation_notes: None,
            metadata: Map::new(),
        }
    }
}

/// A service that translates text.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Error Handling
///
/// - `AuthRequired` / `AuthFailed`: credential missing or rejected
/// - `RateLimited`, `ApiError`, `NetworkError`: the call failed
/// - `InvalidResponse`: the call succeeded but the payload was unusable
#[async_trait]
pub trait Translator: Send + Sync {
    /// Service name for logs (e.g., "openai", "mock").
    fn name(&self) -> &'static str;

    /// Translate one piece of content.
    async fn translate(&self, request: TranslationRequest) -> Result<Translation, TranslateError>;
}
