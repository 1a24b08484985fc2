//! core::notebook
//!
//! In-memory model of a Jupyter notebook (nbformat v4).
//!
//! # Design
//!
//! The model is deliberately shallow. Only the fields refinenb reads or
//! writes are typed; everything else (outputs, execution counts, cell ids,
//! attachments, unknown keys) rides along in flattened `extra` maps so a
//! load/save cycle never drops data.
//!
//! # Validation
//!
//! [`parse`] checks the structure before deserializing so that errors can
//! name the offending cell. Only nbformat major version 4 is accepted.
//!
//! # Example
//!
//! ```
//! use refinenb::core::notebook::{parse, CellKind};
//!
//! let json = br##"{
//!   "cells": [{"cell_type": "markdown", "metadata": {}, "source": "# Hello"}],
//!   "metadata": {},
//!   "nbformat": 4,
//!   "nbformat_minor": 5
//! }"##;
//!
//! let notebook = parse(json).unwrap();
//! assert_eq!(notebook.cells.len(), 1);
//! assert_eq!(notebook.cells[0].kind, CellKind::Markdown);
//! assert_eq!(notebook.cells[0].source.text(), "# Hello");
//! ```

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// The only nbformat major version refinenb understands.
pub const SUPPORTED_NBFORMAT: u64 = 4;

/// Structural problems found while parsing notebook content.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FormatIssue {
    #[error("invalid JSON in notebook file: {0}")]
    InvalidJson(String),

    #[error("notebook root must be a JSON object")]
    NotAnObject,

    #[error("notebook is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("notebook field '{field}' must be {expected}")]
    WrongFieldType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("unsupported nbformat version {0}; only version 4 notebooks are supported")]
    UnsupportedVersion(u64),

    /// `index` is 1-based to match how editors number cells.
    #[error("cell {index} {reason}")]
    InvalidCell { index: usize, reason: String },
}

/// Cell type as stored in `cell_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    Markdown,
    Code,
    Raw,
}

impl CellKind {
    /// All valid cell types, in schema order.
    pub const ALL: [CellKind; 3] = [CellKind::Markdown, CellKind::Code, CellKind::Raw];

    /// The `cell_type` string for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            CellKind::Markdown => "markdown",
            CellKind::Code => "code",
            CellKind::Raw => "raw",
        }
    }

    /// Parse a `cell_type` string.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }

    /// Markdown and code cells carry human-readable text.
    pub fn is_text(&self) -> bool {
        matches!(self, CellKind::Markdown | CellKind::Code)
    }
}

impl std::fmt::Display for CellKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cell source text.
///
/// Jupyter stores source either as one string or as a list of lines that
/// each keep their trailing newline. The representation is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    Text(String),
    Lines(Vec<String>),
}

impl Source {
    /// The full source as a single string.
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Source::Text(text) => Cow::Borrowed(text),
            Source::Lines(lines) => Cow::Owned(lines.concat()),
        }
    }

    /// Whether the source has no visible content.
    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }

    /// Replace the text, keeping the current representation.
    pub fn replace_text(&mut self, text: String) {
        *self = match self {
            Source::Text(_) => Source::Text(text),
            Source::Lines(_) => Source::Lines(split_lines(&text)),
        };
    }
}

impl Default for Source {
    fn default() -> Self {
        Source::Text(String::new())
    }
}

impl From<&str> for Source {
    fn from(text: &str) -> Self {
        Source::Text(text.to_string())
    }
}

/// Split text into lines that keep their `\n`, the way Jupyter stores them.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}

/// One notebook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "cell_type")]
    pub kind: CellKind,

    pub source: Source,

    /// Absent metadata stays absent on save.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    /// Outputs, execution count, id, attachments and unknown keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Cell {
    /// Create a cell with empty metadata.
    pub fn new(kind: CellKind, source: impl Into<Source>) -> Self {
        Self {
            kind,
            source: source.into(),
            metadata: Some(Map::new()),
            extra: Map::new(),
        }
    }

    /// Metadata map, created if the cell had none.
    pub fn metadata_mut(&mut self) -> &mut Map<String, Value> {
        self.metadata.get_or_insert_with(Map::new)
    }

    /// Look up a metadata value.
    pub fn metadata_value(&self, key: &str) -> Option<&Value> {
        self.metadata.as_ref().and_then(|m| m.get(key))
    }

    /// Code cell outputs, if any.
    pub fn outputs(&self) -> Option<&Vec<Value>> {
        self.extra.get("outputs").and_then(Value::as_array)
    }
}

/// A whole notebook document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<Cell>,

    pub metadata: Map<String, Value>,

    pub nbformat: u64,

    pub nbformat_minor: u64,

    /// Unknown top-level keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notebook {
    /// An empty v4.5 notebook.
    pub fn new() -> Self {
        Self {
            cells: Vec::new(),
            metadata: Map::new(),
            nbformat: SUPPORTED_NBFORMAT,
            nbformat_minor: 5,
            extra: Map::new(),
        }
    }

    /// Builder-style cell append.
    pub fn with_cell(mut self, cell: Cell) -> Self {
        self.cells.push(cell);
        self
    }

    /// Serialize in Jupyter's on-disk layout.
    ///
    /// One-space indent, keys sorted, non-ASCII written literally, and a
    /// trailing newline. Files saved by Jupyter round-trip byte for byte.
    pub fn to_canonical_json(&self) -> Result<String, serde_json::Error> {
        let value = sort_keys(serde_json::to_value(self)?);

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;
        buf.push(b'\n');

        // serde_json only emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

impl Default for Notebook {
    fn default() -> Self {
        Self::new()
    }
}

/// Rebuild every object with its keys in sorted order.
///
/// Holds whether or not serde_json's `preserve_order` feature is enabled
/// somewhere in the dependency graph.
fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_keys(v)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Parse and validate notebook bytes.
///
/// # Errors
///
/// Returns a [`FormatIssue`] describing the first structural problem.
pub fn parse(bytes: &[u8]) -> Result<Notebook, FormatIssue> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|e| FormatIssue::InvalidJson(e.to_string()))?;
    validate(&value)?;
    serde_json::from_value(value).map_err(|e| FormatIssue::InvalidJson(e.to_string()))
}

/// Check the notebook structure of an already-parsed JSON value.
pub fn validate(value: &Value) -> Result<(), FormatIssue> {
    let root = value.as_object().ok_or(FormatIssue::NotAnObject)?;

    let nbformat = root
        .get("nbformat")
        .ok_or(FormatIssue::MissingField("nbformat"))?
        .as_u64()
        .ok_or(FormatIssue::WrongFieldType {
            field: "nbformat",
            expected: "a non-negative integer",
        })?;
    if nbformat != SUPPORTED_NBFORMAT {
        return Err(FormatIssue::UnsupportedVersion(nbformat));
    }

    root.get("nbformat_minor")
        .ok_or(FormatIssue::MissingField("nbformat_minor"))?
        .as_u64()
        .ok_or(FormatIssue::WrongFieldType {
            field: "nbformat_minor",
            expected: "a non-negative integer",
        })?;

    if !root
        .get("metadata")
        .ok_or(FormatIssue::MissingField("metadata"))?
        .is_object()
    {
        return Err(FormatIssue::WrongFieldType {
            field: "metadata",
            expected: "an object",
        });
    }

    let cells = root
        .get("cells")
        .ok_or(FormatIssue::MissingField("cells"))?
        .as_array()
        .ok_or(FormatIssue::WrongFieldType {
            field: "cells",
            expected: "an array",
        })?;

    for (i, cell) in cells.iter().enumerate() {
        validate_cell(cell, i + 1)?;
    }

    Ok(())
}

fn validate_cell(cell: &Value, index: usize) -> Result<(), FormatIssue> {
    let invalid = |reason: &str| FormatIssue::InvalidCell {
        index,
        reason: reason.to_string(),
    };

    let obj = cell
        .as_object()
        .ok_or_else(|| invalid("is not a valid cell object"))?;

    let kind = obj
        .get("cell_type")
        .ok_or_else(|| invalid("is missing cell_type attribute"))?
        .as_str()
        .ok_or_else(|| invalid("has a non-string cell_type"))?;
    if CellKind::from_name(kind).is_none() {
        return Err(invalid(&format!("has invalid type: {}", kind)));
    }

    match obj.get("source") {
        None => return Err(invalid("is missing source content")),
        Some(Value::String(_)) => {}
        Some(Value::Array(lines)) if lines.iter().all(Value::is_string) => {}
        Some(_) => return Err(invalid("has source that is neither a string nor a list of strings")),
    }

    if let Some(metadata) = obj.get("metadata") {
        if !metadata.is_object() {
            return Err(invalid("has metadata that is not an object"));
        }
    }

    Ok(())
}
