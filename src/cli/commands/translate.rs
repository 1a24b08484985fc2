//! translate command - Translate notebook cells into another language

use std::fs;
use std::path::Path;

use crate::core::config::Config;
use crate::engine::{CommitOptions, Context, Transaction};
use crate::translate::{translate_notebook, Language, OpenAiTranslator, Translator};
use crate::ui::output::{self, plural};
use anyhow::{Context as _, Result};

/// Translate a notebook with the configured OpenAI-compatible service.
///
/// The language code and API key are checked before the notebook is opened.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `config` - Loaded configuration
/// * `notebook_path` - Notebook to translate
/// * `language` - Target language code
/// * `destination` - Write here instead of in place
pub fn translate(
    ctx: &Context,
    config: &Config,
    notebook_path: &Path,
    language: &str,
    destination: Option<&Path>,
) -> Result<()> {
    let language: Language = language.parse()?;
    let translator = OpenAiTranslator::from_config(config)?;
    output::debug(
        format!(
            "using model {} at {}",
            translator.model(),
            translator.api_base()
        ),
        ctx.verbosity(),
    );

    // Use tokio runtime to run async code
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(translate_with(
        ctx,
        &translator,
        notebook_path,
        language,
        destination,
    ))
}

/// Translate a notebook with any [`Translator`].
///
/// Nothing is written unless every eligible cell translated successfully.
pub async fn translate_with(
    ctx: &Context,
    translator: &dyn Translator,
    notebook_path: &Path,
    language: Language,
    destination: Option<&Path>,
) -> Result<()> {
    let mut tx = Transaction::begin(notebook_path)?;

    output::print(
        format!("Translating {} to {}...", notebook_path.display(), language),
        ctx.verbosity(),
    );
    let summary = match translate_notebook(translator, tx.notebook_mut(), language).await {
        Ok(summary) => summary,
        Err(e) => {
            if e.source.is_auth() {
                output::warn(
                    "the translation service rejected the API key",
                    ctx.verbosity(),
                );
            }
            return Err(e).with_context(|| format!("{} was not modified", notebook_path.display()));
        }
    };

    let options = match destination {
        Some(path) if !same_file(path, notebook_path) => CommitOptions::to_path(path),
        _ => ctx.in_place(),
    };
    let outcome = tx.commit(&options)?;

    output::success(
        format!(
            "Translated {} ({} skipped); saved to {}",
            plural(summary.translated.len(), "cell"),
            summary.skipped.len(),
            outcome.written.display()
        ),
        ctx.verbosity(),
    );
    if let Some(backup) = outcome.backup {
        output::debug(format!("backup written to {}", backup.display()), ctx.verbosity());
    }
    Ok(())
}

/// Whether two paths name the same file, following symlinks.
fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
