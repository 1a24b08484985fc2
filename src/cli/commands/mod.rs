//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Loads notebooks through `core::io` or an engine transaction
//! 3. Formats and displays output
//!
//! Handlers do NOT write notebook files directly.
//!
//! # Async Commands
//!
//! `translate` talks to a remote service, so it builds a tokio runtime and
//! blocks on the async work from the sync dispatch path.

mod completion;
mod find;
mod make_editable;
mod output;
mod translate;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use find::find;
pub use make_editable::{make_editable, make_editable_one};
pub use output::output;
pub use translate::{translate, translate_with};

use crate::cli::args::Command;
use crate::core::config::Config;
use crate::core::extract::Selection;
use crate::engine::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context, config: &Config) -> Result<()> {
    match command {
        Command::Translate {
            notebook_path,
            language,
            output,
        } => translate::translate(ctx, config, &notebook_path, &language, output.as_deref()),
        Command::Output {
            notebook_path,
            output,
            text_only,
        } => output::output(ctx, &notebook_path, &output, Selection::from_flag(text_only)),
        Command::MakeEditable { notebook_path } => make_editable::make_editable(ctx, &notebook_path),
        Command::Find { directory } => find::find(ctx, &directory),
        Command::Completion { shell } => completion::completion(shell),
    }
}
