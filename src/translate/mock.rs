//! translate::mock
//!
//! Mock translator for deterministic testing.
//!
//! # Design
//!
//! The mock never touches the network. By default it "translates" by
//! prefixing the content with the target language code, e.g. `[de] Hello`.
//! Fixed answers can be registered per input, and a failure can be
//! scheduled for the n-th call. Every call is recorded.
//!
//! # Example
//!
//! ```
//! use refinenb::translate::mock::MockTranslator;
//! use refinenb::translate::{ContentKind, Language, TranslationRequest, Translator};
//!
//! # tokio_test::block_on(async {
//! let translator = MockTranslator::new().with_answer("Hello", "Hallo");
//!
//! let out = translator.translate(TranslationRequest {
//!     content: "Hello".to_string(),
//!     kind: ContentKind::Markdown,
//!     language: Language::German,
//! }).await.unwrap();
//!
//! assert_eq!(out.translated_content, "Hallo");
//! assert_eq!(translator.calls().len(), 1);
//! # });
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{Translation, TranslationRequest, TranslateError, Translator};

/// Mock translator for testing.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping.
#[derive(Debug, Clone, Default)]
pub struct MockTranslator {
    /// Internal state shared across clones.
    inner: Arc<Mutex<MockTranslatorInner>>,
}

/// Internal mutable state.
#[derive(Debug, Default)]
struct MockTranslatorInner {
    /// Fixed answers by exact input content.
    answers: HashMap<String, String>,
    /// Call to fail on (for testing error paths).
    fail_on: Option<FailOn>,
    /// Recorded requests for verification.
    calls: Vec<TranslationRequest>,
}

/// Which call should fail.
#[derive(Debug, Clone)]
pub struct FailOn {
    /// Zero-based call number.
    pub call: usize,
    /// Error to return.
    pub error: TranslateError,
}

impl MockTranslator {
    /// Create a mock with no fixed answers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed answer for an exact input.
    pub fn with_answer(self, input: impl Into<String>, output: impl Into<String>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.answers.insert(input.into(), output.into());
        }
        self
    }

    /// Fail the `call`-th request (zero-based) with `error`.
    ///
    /// # Example
    ///
    /// ```
    /// use refinenb::translate::mock::MockTranslator;
    /// use refinenb::translate::TranslateError;
    ///
    /// let translator = MockTranslator::new().fail_on(0, TranslateError::RateLimited);
    /// ```
    pub fn fail_on(self, call: usize, error: TranslateError) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.fail_on = Some(FailOn { call, error });
        }
        self
    }

    /// Get all recorded requests in call order.
    pub fn calls(&self) -> Vec<TranslationRequest> {
        self.inner.lock().unwrap().calls.clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn translate(&self, request: TranslationRequest) -> Result<Translation, TranslateError> {
        let mut inner = self.inner.lock().unwrap();
        let call = inner.calls.len();
        inner.calls.push(request.clone());

        if let Some(fail) = &inner.fail_on {
            if fail.call == call {
                return Err(fail.error.clone());
            }
        }

        let text = inner
            .answers
            .get(&request.content)
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", request.language.code(), request.content));
        Ok(Translation::text(text))
    }
}
