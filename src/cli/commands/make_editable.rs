//! make-editable command - Unlock notebook cells

use std::path::{Path, PathBuf};

use crate::core::editable::{self, EditableReport};
use crate::engine::{CommitOutcome, Context, EngineError, Transaction};
use crate::ui::output::{self, format_list, plural};
use anyhow::{bail, Result};

/// Unlock one notebook in place.
///
/// The notebook is always rewritten, so a run also normalises the file
/// layout; the report says whether any metadata actually changed.
pub fn make_editable_one(
    ctx: &Context,
    path: &Path,
) -> Result<(EditableReport, CommitOutcome), EngineError> {
    let mut tx = Transaction::begin(path)?;
    let report = editable::make_editable(tx.notebook_mut());
    tracing::debug!(
        path = %path.display(),
        cells = report.cells,
        changed = report.changed,
        "unlocked cells"
    );

    let outcome = tx.commit(&ctx.in_place())?;
    Ok((report, outcome))
}

/// Unlock every cell of each notebook.
///
/// Notebooks are processed independently; a failure on one does not stop
/// the others. The command fails if any notebook failed.
pub fn make_editable(ctx: &Context, paths: &[PathBuf]) -> Result<()> {
    let verbosity = ctx.verbosity();
    let mut failed = Vec::new();
    let mut updated = 0;

    for path in paths {
        match make_editable_one(ctx, path) {
            Ok((report, outcome)) => {
                if report.is_noop() {
                    output::print(format!("Already editable: {}", path.display()), verbosity);
                } else {
                    updated += 1;
                    output::success(
                        format!(
                            "Made editable: {} ({} changed)",
                            path.display(),
                            plural(report.changed, "cell")
                        ),
                        verbosity,
                    );
                }
                if let Some(backup) = outcome.backup {
                    output::debug(format!("backup written to {}", backup.display()), verbosity);
                }
            }
            Err(e) if paths.len() == 1 => return Err(e.into()),
            Err(e) => {
                output::error(&e);
                failed.push(path.display().to_string());
            }
        }
    }

    if paths.len() > 1 {
        output::print(
            format!(
                "\n{} processed: {} updated, {} unchanged, {} failed",
                plural(paths.len(), "notebook"),
                updated,
                paths.len() - updated - failed.len(),
                failed.len()
            ),
            verbosity,
        );
    }

    if !failed.is_empty() {
        bail!(
            "{} could not be made editable:\n{}",
            plural(failed.len(), "notebook"),
            format_list(&failed, "  - ")
        );
    }
    Ok(())
}
