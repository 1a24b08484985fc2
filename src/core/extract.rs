//! core::extract
//!
//! JSON projection of notebook cells.
//!
//! The projection lists each cell's type and source text in document order.
//! Line-list sources are joined into one string and code outputs are never
//! included. By default every cell is listed, so the record count always
//! equals the cell count; [`Selection::TextOnly`] keeps only markdown and
//! code cells.
//!
//! # Example
//!
//! ```
//! use refinenb::core::extract::{extract, render, Selection};
//! use refinenb::core::notebook::{Cell, CellKind, Notebook};
//!
//! let nb = Notebook::new()
//!     .with_cell(Cell::new(CellKind::Markdown, "# Title"))
//!     .with_cell(Cell::new(CellKind::Code, "print(1)"));
//!
//! let records = extract(&nb, Selection::AllCells);
//! let json: serde_json::Value = serde_json::from_str(&render(&records).unwrap()).unwrap();
//! assert_eq!(
//!     json,
//!     serde_json::json!([
//!         {"type": "markdown", "source": "# Title"},
//!         {"type": "code", "source": "print(1)"}
//!     ])
//! );
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::io::{self, NotebookError};
use super::notebook::{CellKind, Notebook};

/// Which cells to include.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    /// Every cell, including raw cells.
    #[default]
    AllCells,
    /// Markdown and code cells only.
    TextOnly,
}

impl Selection {
    /// Map the `--text-only` flag.
    pub fn from_flag(text_only: bool) -> Self {
        if text_only {
            Selection::TextOnly
        } else {
            Selection::AllCells
        }
    }

    fn includes(&self, kind: CellKind) -> bool {
        match self {
            Selection::AllCells => true,
            Selection::TextOnly => kind.is_text(),
        }
    }
}

/// One entry in the extraction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    #[serde(rename = "type")]
    pub kind: CellKind,
    pub source: String,
}

/// Project the notebook's cells.
pub fn extract(notebook: &Notebook, selection: Selection) -> Vec<CellRecord> {
    notebook
        .cells
        .iter()
        .filter(|cell| selection.includes(cell.kind))
        .map(|cell| CellRecord {
            kind: cell.kind,
            source: cell.source.text().into_owned(),
        })
        .collect()
}

/// Pretty-printed JSON with a trailing newline.
pub fn render(records: &[CellRecord]) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(records)?;
    out.push('\n');
    Ok(out)
}

/// Write the extraction to `path`, creating parent directories.
///
/// # Errors
///
/// Returns [`NotebookError::Io`] if the destination cannot be written.
pub fn write_extraction(path: &Path, records: &[CellRecord]) -> Result<(), NotebookError> {
    let contents = render(records).map_err(|e| NotebookError::Io {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })?;
    io::write_atomic(path, contents.as_bytes())?;
    tracing::debug!(path = %path.display(), records = records.len(), "wrote extraction");
    Ok(())
}
