//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output
//! - `--no-backup`: Do not keep a `.bak` copy when rewriting a notebook

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// refinenb - Translate, extract, and unlock Jupyter notebooks
#[derive(Parser, Debug)]
#[command(name = "refinenb")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Do not keep a .bak copy when rewriting a notebook in place
    #[arg(long, global = true)]
    pub no_backup: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate markdown and code comments into another language
    #[command(
        name = "translate",
        long_about = "Translate a notebook's markdown cells and code comments.\n\n\
            Each markdown cell is sent to an OpenAI-compatible chat completions \
            service and its source is replaced by the translation. Code cells are \
            sent only when they contain comments or docstrings, and only those parts \
            are translated. Raw and empty cells are left alone.\n\n\
            Cells are translated one at a time in order. If any cell fails, nothing \
            is written. The API key is read from OPENAI_API_KEY (or the variable \
            named by `translate.api_key_env` in the config file).",
        after_help = "\
SUPPORTED LANGUAGES:
    es Spanish, fr French, de German, it Italian, pt Portuguese,
    ru Russian, ja Japanese, ko Korean, zh Chinese

WORKFLOW EXAMPLES:
    # Translate in place (keeps analysis.ipynb.bak)
    refinenb translate -n analysis.ipynb -l de

    # Write the translation next to the original
    refinenb translate -n analysis.ipynb -l ja -o analysis.ja.ipynb

    # Use a local OpenAI-compatible server
    OPENAI_BASE_URL=http://localhost:8080/v1 refinenb translate -n nb.ipynb -l fr"
    )]
    Translate {
        /// Notebook to translate
        #[arg(short = 'n', long, value_name = "PATH")]
        notebook_path: PathBuf,

        /// Target language code (case-insensitive)
        #[arg(short = 'l', long, value_name = "CODE")]
        language: String,

        /// Write the result here instead of rewriting the notebook
        #[arg(short = 'o', long, value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Extract cell types and contents to a JSON file
    #[command(
        name = "output",
        long_about = "Extract each cell's type and source text to a JSON file.\n\n\
            The result is an array of {\"type\", \"source\"} objects in notebook \
            order. Multi-line sources are joined into one string. Code cell \
            outputs are never included. The notebook itself is not modified.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Dump every cell
    refinenb output -n analysis.ipynb -o cells.json

    # Only markdown and code cells
    refinenb output -n analysis.ipynb -o cells.json --text-only"
    )]
    Output {
        /// Notebook to read
        #[arg(short = 'n', long, value_name = "PATH")]
        notebook_path: PathBuf,

        /// JSON file to write (parent directories are created)
        #[arg(short = 'o', long, value_name = "PATH")]
        output: PathBuf,

        /// Skip raw cells
        #[arg(long)]
        text_only: bool,
    },

    /// Mark every cell editable and deletable
    #[command(
        name = "make-editable",
        long_about = "Unlock notebook cells.\n\n\
            Sets `editable` and `deletable` to true in every cell's metadata and \
            removes any `locked` flag. All other metadata is preserved. Running \
            it twice gives the same file.\n\n\
            Pass --notebook-path more than once to process several notebooks. \
            Each notebook is handled independently; the command fails if any of \
            them could not be processed.",
        after_help = "\
WORKFLOW EXAMPLES:
    # Unlock one notebook
    refinenb make-editable -n exam.ipynb

    # Unlock every notebook under a directory
    refinenb find -d course/ | xargs -I{} refinenb make-editable -n {}

    # Batch mode with a summary
    refinenb make-editable -n a.ipynb -n b.ipynb -n c.ipynb"
    )]
    MakeEditable {
        /// Notebook(s) to unlock
        #[arg(short = 'n', long, value_name = "PATH", required = true)]
        notebook_path: Vec<PathBuf>,
    },

    /// List notebooks under a directory
    #[command(
        name = "find",
        long_about = "Recursively list every .ipynb file under a directory.\n\n\
            Paths are printed one per line in sorted order. Jupyter checkpoint \
            directories (.ipynb_checkpoints) are skipped.",
        after_help = "\
WORKFLOW EXAMPLES:
    # List notebooks in the current directory tree
    refinenb find -d .

    # Count them
    refinenb find -d course/ | wc -l"
    )]
    Find {
        /// Directory to search
        #[arg(short = 'd', long, value_name = "DIR")]
        directory: PathBuf,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    refinenb completion bash > ~/.local/share/bash-completion/completions/refinenb
    refinenb completion zsh > ~/.zfunc/_refinenb"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Command {
    /// Whether the command reads the config file.
    ///
    /// Only commands that rewrite notebooks or call the translation service
    /// do; the rest never fail on a broken config.
    pub fn uses_config(&self) -> bool {
        matches!(self, Command::Translate { .. } | Command::MakeEditable { .. })
    }
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_short_flags() {
        let cli = Cli::try_parse_from(["refinenb", "translate", "-n", "a.ipynb", "-l", "DE"])
            .unwrap();
        match cli.command {
            Command::Translate {
                notebook_path,
                language,
                output,
            } => {
                assert_eq!(notebook_path, PathBuf::from("a.ipynb"));
                assert_eq!(language, "DE");
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn make_editable_accepts_repeated_paths() {
        let cli = Cli::try_parse_from([
            "refinenb",
            "make-editable",
            "-n",
            "a.ipynb",
            "--notebook-path",
            "b.ipynb",
        ])
        .unwrap();
        match cli.command {
            Command::MakeEditable { notebook_path } => assert_eq!(notebook_path.len(), 2),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn make_editable_requires_a_path() {
        assert!(Cli::try_parse_from(["refinenb", "make-editable"]).is_err());
    }

    #[test]
    fn only_rewriting_commands_use_config() {
        let uses = |args: &[&str]| Cli::try_parse_from(args).unwrap().command.uses_config();
        assert!(uses(&["refinenb", "translate", "-n", "a.ipynb", "-l", "de"]));
        assert!(uses(&["refinenb", "make-editable", "-n", "a.ipynb"]));
        assert!(!uses(&["refinenb", "output", "-n", "a.ipynb", "-o", "o.json"]));
        assert!(!uses(&["refinenb", "find", "-d", "."]));
        assert!(!uses(&["refinenb", "completion", "zsh"]));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "refinenb",
            "output",
            "-n",
            "a.ipynb",
            "-o",
            "out.json",
            "--no-backup",
            "-q",
        ])
        .unwrap();
        assert!(cli.no_backup);
        assert!(cli.quiet);
        assert!(!cli.debug);
    }
}
