//! refinenb - Translate, extract, and unlock Jupyter notebooks
//!
//! refinenb is a single-binary tool for bulk notebook chores: translating
//! markdown and code comments through a language model, dumping cell
//! contents to JSON, and clearing per-cell edit locks.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface layer (parses args, dispatches handlers)
//! - [`engine`] - Locked, verified, atomic notebook rewrites
//! - [`core`] - Notebook model, file I/O, extraction, editability, config
//! - [`translate`] - Translator trait, OpenAI client, and mock
//! - [`ui`] - Output formatting
//!
//! # Correctness Invariants
//!
//! 1. Loading then saving a notebook preserves every field, known or not
//! 2. A failed command never leaves a partially written notebook
//! 3. Cells keep their order through every operation

pub mod cli;
pub mod core;
pub mod engine;
pub mod translate;
pub mod ui;
