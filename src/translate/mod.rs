//! translate
//!
//! Cell translation through a language model.
//!
//! # Architecture
//!
//! The [`Translator`] trait is the seam between notebook handling and the
//! remote service. Commands build an [`OpenAiTranslator`] from config; tests
//! use [`MockTranslator`].
//!
//! [`translate_notebook`] walks the cells in order:
//! - markdown cells are always translated
//! - code cells are translated only if they contain comments or docstrings
//! - raw cells and blank cells are left alone
//!
//! Translations are collected first and applied only once every request
//! has succeeded, so a failure leaves the notebook value untouched.
//!
//! # Modules
//!
//! - `traits`: `Translator` trait and request/response types
//! - `language`: supported target languages
//! - `prompts`: prompt templates
//! - [`openai`]: OpenAI chat completions client
//! - [`mock`]: Mock implementation for deterministic testing
//!
//! # Example
//!
//! ```
//! use refinenb::core::notebook::{Cell, CellKind, Notebook};
//! use refinenb::translate::{translate_notebook, Language, MockTranslator};
//!
//! let mut notebook = Notebook::new()
//!     .with_cell(Cell::new(CellKind::Markdown, "# Hello"))
//!     .with_cell(Cell::new(CellKind::Code, "print(1)"));
//!
//! let translator = MockTranslator::new();
//! let summary = tokio_test::block_on(
//!     translate_notebook(&translator, &mut notebook, Language::German),
//! ).unwrap();
//!
//! assert_eq!(summary.translated, vec![0]);
//! assert_eq!(notebook.cells[0].source.text(), "[de] # Hello");
//! assert_eq!(notebook.cells[1].source.text(), "print(1)");
//! ```

mod language;
pub mod mock;
pub mod openai;
pub mod prompts;
mod traits;

pub use language::Language;
pub use mock::MockTranslator;
pub use openai::OpenAiTranslator;
pub use traits::*;

use thiserror::Error;

use crate::core::notebook::{CellKind, Notebook};

/// A cell that could not be translated.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("translation failed for cell {} ({kind})", .index + 1)]
pub struct CellTranslationError {
    /// Zero-based cell index.
    pub index: usize,
    /// Kind of content that was sent.
    pub kind: ContentKind,
    /// Underlying failure.
    pub source: TranslateError,
}

/// What [`translate_notebook`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    /// Indices of translated cells, in order.
    pub translated: Vec<usize>,
    /// Indices of cells left as they were.
    pub skipped: Vec<usize>,
}

/// Decide whether and how a cell is sent for translation.
pub fn content_kind_for(kind: CellKind, content: &str) -> Option<ContentKind> {
    if content.trim().is_empty() {
        return None;
    }
    match kind {
        CellKind::Markdown => Some(ContentKind::Markdown),
        CellKind::Code if prompts::has_translatable_code(content) => Some(ContentKind::Code),
        CellKind::Code | CellKind::Raw => None,
    }
}

/// Translate every eligible cell of `notebook` into `language`.
///
/// Requests are sent one at a time in cell order. The first failure stops
/// the run and the notebook is left exactly as it was.
pub async fn translate_notebook(
    translator: &dyn Translator,
    notebook: &mut Notebook,
    language: Language,
) -> Result<TranslationSummary, CellTranslationError> {
    let mut summary = TranslationSummary::default();
    let mut results = Vec::new();

    for (index, cell) in notebook.cells.iter().enumerate() {
        let content = cell.source.text();
        let Some(kind) = content_kind_for(cell.kind, &content) else {
            tracing::debug!(index, cell_type = %cell.kind, "skipping cell");
            summary.skipped.push(index);
            continue;
        };

        tracing::debug!(index, %kind, translator = translator.name(), "translating cell");
        let translation = translator
            .translate(TranslationRequest {
                content: content.into_owned(),
                kind,
                language,
            })
            .await
            .map_err(|source| CellTranslationError {
                index,
                kind,
                source,
            })?;

        if let Some(notes) = &translation.translation_notes {
            tracing::debug!(index, notes = %notes, "translation notes");
        }
        results.push((index, translation.translated_content));
    }

    for (index, text) in results {
        notebook.cells[index].source.replace_text(text);
        summary.translated.push(index);
    }
    Ok(summary)
}
