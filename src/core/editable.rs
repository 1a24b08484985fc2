//! core::editable
//!
//! Unlock notebook cells for editing.
//!
//! Every cell gets `editable: true` and `deletable: true` in its metadata,
//! overwriting whatever was there, and loses any `locked` key. Applying this
//! twice gives the same document as applying it once.

use serde_json::Value;

use super::notebook::{Cell, Notebook};

/// Metadata key controlling whether a cell may be modified.
pub const EDITABLE_KEY: &str = "editable";
/// Metadata key controlling whether a cell may be removed.
pub const DELETABLE_KEY: &str = "deletable";
/// Legacy lock marker removed alongside.
pub const LOCKED_KEY: &str = "locked";

/// Summary of a [`make_editable`] pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditableReport {
    /// Cells visited.
    pub cells: usize,
    /// Cells whose metadata actually changed.
    pub changed: usize,
}

impl EditableReport {
    /// Whether the pass left the document untouched.
    pub fn is_noop(&self) -> bool {
        self.changed == 0
    }
}

/// Unlock a single cell. Returns whether its metadata changed.
pub fn make_cell_editable(cell: &mut Cell) -> bool {
    let before = cell.metadata.clone();

    let metadata = cell.metadata_mut();
    metadata.insert(EDITABLE_KEY.to_string(), Value::Bool(true));
    metadata.insert(DELETABLE_KEY.to_string(), Value::Bool(true));
    metadata.remove(LOCKED_KEY);

    before.as_ref() != cell.metadata.as_ref()
}

/// Unlock every cell in the notebook.
pub fn make_editable(notebook: &mut Notebook) -> EditableReport {
    let mut report = EditableReport::default();
    for cell in &mut notebook.cells {
        report.cells += 1;
        if make_cell_editable(cell) {
            report.changed += 1;
        }
    }
    report
}

/// Whether every cell is already editable and deletable.
pub fn is_fully_editable(notebook: &Notebook) -> bool {
    notebook.cells.iter().all(|cell| {
        cell.metadata_value(EDITABLE_KEY) == Some(&Value::Bool(true))
            && cell.metadata_value(DELETABLE_KEY) == Some(&Value::Bool(true))
            && cell.metadata_value(LOCKED_KEY).is_none()
    })
}
