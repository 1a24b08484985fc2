//! cli
//!
//! Command-line interface layer for refinenb.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Initialise logging
//! - Delegate to command handlers
//!
//! # Architecture
//!
//! The CLI layer is thin. It parses arguments via clap and dispatches to
//! handlers in [`commands`]. Notebook rewrites flow through
//! [`crate::engine::Transaction`].

pub mod args;
pub mod commands;

pub use args::{Cli, Shell};

use crate::core::config::Config;
use crate::engine;
use anyhow::{Context as _, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.debug);

    let config = if cli.command.uses_config() {
        let config = Config::load().context("failed to load configuration")?;
        if let Some(path) = config.path() {
            tracing::debug!(path = %path.display(), "using config file");
        }
        config
    } else {
        Config::default()
    };

    // --no-backup beats the config file
    let ctx = engine::Context {
        debug: cli.debug,
        quiet: cli.quiet,
        backup: !cli.no_backup && config.backup(),
    };

    commands::dispatch(cli.command, &ctx, &config)
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` is honoured; otherwise only warnings are shown, or everything
/// down to debug with `--debug`.
fn init_tracing(debug: bool) {
    let default = if debug {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy();

    // A subscriber may already be set when running inside tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
