//! output command - Extract cell types and contents to JSON

use std::path::Path;

use crate::core::extract::{extract, write_extraction, Selection};
use crate::core::io;
use crate::engine::Context;
use crate::ui::output::{self, plural};
use anyhow::{Context as _, Result};

/// Write the JSON projection of a notebook's cells.
///
/// # Arguments
///
/// * `ctx` - Execution context
/// * `notebook_path` - Notebook to read
/// * `destination` - JSON file to write
/// * `selection` - Which cells to include
pub fn output(
    ctx: &Context,
    notebook_path: &Path,
    destination: &Path,
    selection: Selection,
) -> Result<()> {
    let loaded = io::load(notebook_path)?;
    let records = extract(&loaded.notebook, selection);

    write_extraction(destination, &records)
        .with_context(|| format!("failed to write extraction to {}", destination.display()))?;

    output::success(
        format!(
            "Extracted {} to {}",
            plural(records.len(), "cell"),
            destination.display()
        ),
        ctx.verbosity(),
    );
    Ok(())
}
