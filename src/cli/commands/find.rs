//! find command - List notebooks under a directory

use std::path::Path;

use crate::core::discover::find_notebooks;
use crate::engine::Context;
use crate::ui::output::{self, plural};
use anyhow::{Context as _, Result};

/// Print every notebook under `directory`, one per line.
///
/// Paths go to stdout even in quiet mode so the output can be piped.
pub fn find(ctx: &Context, directory: &Path) -> Result<()> {
    let notebooks = find_notebooks(directory)
        .with_context(|| format!("failed to search {}", directory.display()))?;

    for path in &notebooks {
        println!("{}", path.display());
    }

    output::debug(
        format!("found {} under {}", plural(notebooks.len(), "notebook"), directory.display()),
        ctx.verbosity(),
    );
    Ok(())
}
