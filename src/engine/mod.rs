//! engine
//!
//! Execution context and the transactional write path.
//!
//! # Architecture
//!
//! Commands read notebooks freely, but every rewrite of a notebook file
//! flows through a [`Transaction`]:
//!
//! ```text
//! Lock -> Load -> Edit (in memory) -> Verify unchanged -> Backup -> Save
//! ```
//!
//! # Invariants
//!
//! - A notebook is never partially written
//! - A failed command leaves the original file byte-for-byte intact
//! - Two refinenb processes never rewrite the same notebook at once

pub mod transaction;

pub use transaction::{CommitOptions, CommitOutcome, EngineError, Transaction};

use crate::ui::output::Verbosity;

/// Execution context for commands.
///
/// Contains global settings derived from CLI flags and config that affect
/// command behavior.
#[derive(Debug, Clone)]
pub struct Context {
    /// Debug logging enabled.
    pub debug: bool,
    /// Quiet mode (minimal output).
    pub quiet: bool,
    /// Keep a `.bak` copy before in-place rewrites.
    pub backup: bool,
}

impl Context {
    /// Output verbosity implied by the flags.
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.debug)
    }

    /// Commit options for rewriting a notebook in place.
    pub fn in_place(&self) -> CommitOptions {
        CommitOptions::in_place(self.backup)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self {
            debug: false,
            quiet: false,
            backup: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_context_backs_up() {
        let ctx = Context::default();
        assert!(ctx.backup);
        assert_eq!(ctx.verbosity(), Verbosity::Normal);
        assert_eq!(ctx.in_place(), CommitOptions::in_place(true));
    }

    #[test]
    fn quiet_wins_over_debug() {
        let ctx = Context {
            debug: true,
            quiet: true,
            backup: false,
        };
        assert_eq!(ctx.verbosity(), Verbosity::Quiet);
    }
}
