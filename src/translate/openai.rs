//! translate::openai
//!
//! Translator backed by an OpenAI-compatible chat-completions API.
//!
//! # Design
//!
//! Each cell becomes one `POST {api_base}/chat/completions` call with a
//! system message fixing the JSON answer shape and a user message holding
//! the rendered prompt. JSON mode (`response_format: json_object`) is
//! requested; the `translated_content` field of the answer is the result.
//!
//! # Authentication
//!
//! The API key comes from the environment (`OPENAI_API_KEY` unless the
//! config names another variable). It is sent as a bearer token and never
//! logged or shown in `Debug` output.
//!
//! # Retries
//!
//! None. A failed call surfaces immediately as a [`TranslateError`].
//!
//! # Example
//!
//! ```ignore
//! use refinenb::core::config::Config;
//! use refinenb::translate::openai::OpenAiTranslator;
//!
//! let translator = OpenAiTranslator::from_config(&Config::load()?)?;
//! ```

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

use super::prompts;
use super::traits::{Translation, TranslationRequest, TranslateError, Translator};
use crate::core::config::Config;

/// Environment variable overriding the configured API base URL.
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = concat!("refinenb/", env!("CARGO_PKG_VERSION"));

/// Chat-completions translator.
pub struct OpenAiTranslator {
    /// HTTP client for making requests
    client: Client,
    /// Bearer token
    api_key: String,
    /// API base URL, without the `/chat/completions` suffix
    api_base: String,
    /// Model name
    model: String,
    /// Sampling temperature
    temperature: f64,
}

// Custom Debug to avoid exposing api_key
impl std::fmt::Debug for OpenAiTranslator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiTranslator")
            .field("has_api_key", &!self.api_key.is_empty())
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl OpenAiTranslator {
    /// Create a translator against the default OpenAI endpoint.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            api_base: crate::core::config::DEFAULT_API_BASE.to_string(),
            model: model.into(),
            temperature: crate::core::config::DEFAULT_TEMPERATURE,
        }
    }

    /// Point the translator at another OpenAI-compatible server.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Build a translator from config and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`TranslateError::AuthRequired`] if the API key variable is
    /// unset or empty.
    pub fn from_config(config: &Config) -> Result<Self, TranslateError> {
        Self::from_config_with_env(config, |name| std::env::var(name).ok())
    }

    /// Like [`from_config`](Self::from_config) with an injectable
    /// environment lookup.
    pub fn from_config_with_env(
        config: &Config,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, TranslateError> {
        let key_var = config.api_key_env();
        let api_key = env(key_var)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| TranslateError::AuthRequired {
                env_var: key_var.to_string(),
            })?;

        let api_base = env(BASE_URL_ENV)
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(|| config.api_base().to_string());

        Ok(Self::new(api_key.trim(), config.model())
            .with_api_base(api_base)
            .with_temperature(config.temperature()))
    }

    /// Model name in use.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// API base URL in use.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn headers(&self) -> Result<HeaderMap, TranslateError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.api_key))
            .map_err(|_| TranslateError::AuthFailed("API key contains invalid characters".into()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        Ok(headers)
    }

    fn build_body(&self, request: &TranslationRequest) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompts::SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompts::render(request.kind, request.language, &request.content),
                },
            ],
            temperature: self.temperature,
            response_format: ResponseFormat {
                r#type: "json_object".to_string(),
            },
        }
    }

    /// Handle API response, mapping errors appropriately.
    async fn handle_response(response: Response) -> Result<ChatResponse, TranslateError> {
        let status = response.status();

        if status.is_success() {
            response
                .json()
                .await
                .map_err(|e| TranslateError::InvalidResponse(format!("malformed body: {}", e)))
        } else {
            Self::handle_error_response(response, status).await
        }
    }

    /// Handle an error response from the API.
    async fn handle_error_response<T>(
        response: Response,
        status: StatusCode,
    ) -> Result<T, TranslateError> {
        let message = match response.json::<ApiErrorResponse>().await {
            Ok(body) => body.error.message,
            Err(_) => "Unknown error".to_string(),
        };

        Err(match status {
            StatusCode::UNAUTHORIZED => TranslateError::AuthFailed(message),
            StatusCode::FORBIDDEN => {
                TranslateError::AuthFailed(format!("permission denied: {}", message))
            }
            StatusCode::TOO_MANY_REQUESTS => TranslateError::RateLimited,
            _ if status.is_server_error() => TranslateError::ApiError {
                status: status.as_u16(),
                message: format!("server error: {}", message),
            },
            _ => TranslateError::ApiError {
                status: status.as_u16(),
                message,
            },
        })
    }
}

/// Pull the structured translation out of a completion.
fn parse_translation(response: ChatResponse) -> Result<Translation, TranslateError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| TranslateError::InvalidResponse("no completion content".into()))?;

    serde_json::from_str(strip_code_fence(&content)).map_err(|e| {
        TranslateError::InvalidResponse(format!("expected translation JSON: {}", e))
    })
}

/// Some models wrap JSON in a markdown fence even in JSON mode.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[async_trait]
impl Translator for OpenAiTranslator {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn translate(&self, request: TranslationRequest) -> Result<Translation, TranslateError> {
        let url = self.completions_url();
        let body = self.build_body(&request);

        tracing::debug!(
            url = %url,
            model = %self.model,
            kind = %request.kind,
            chars = request.content.len(),
            "sending translation request"
        );

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranslateError::NetworkError(e.to_string()))?;

        let completion = Self::handle_response(response).await?;
        parse_translation(completion)
    }
}

// =============================================================================
// Wire types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f64,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}
