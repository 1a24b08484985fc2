//! engine::transaction
//!
//! The single path through which notebooks are rewritten.
//!
//! # Contract
//!
//! A transaction:
//! 1. Acquires the per-notebook lock before reading
//! 2. Loads and validates the notebook, remembering its fingerprint
//! 3. Hands the caller a mutable model to edit in memory
//! 4. On commit, re-fingerprints the file and aborts if it changed
//! 5. Writes a backup when rewriting in place (if enabled)
//! 6. Saves atomically, then releases the lock
//!
//! Dropping a transaction without committing leaves the file untouched.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use refinenb::core::editable::make_editable;
//! use refinenb::engine::transaction::{CommitOptions, Transaction};
//!
//! let mut tx = Transaction::begin(Path::new("analysis.ipynb")).unwrap();
//! make_editable(tx.notebook_mut());
//! let outcome = tx.commit(&CommitOptions::in_place(true)).unwrap();
//! println!("wrote {}", outcome.written.display());
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::io::{self, LoadedNotebook, NotebookError};
use crate::core::lock::{LockError, NotebookLock};
use crate::core::notebook::Notebook;

/// Suffix appended to the notebook file name for backups.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Errors from notebook transactions.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Notebook(#[from] NotebookError),

    #[error(transparent)]
    Lock(#[from] LockError),

    /// The file changed on disk between load and commit.
    #[error("notebook '{}' was modified by another process; no changes written", path.display())]
    Modified { path: PathBuf },

    #[error("failed to write backup '{}': {source}", path.display())]
    Backup {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// How a transaction should be committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// Copy the original to `<name>.ipynb.bak` before an in-place rewrite.
    pub backup: bool,
    /// Write somewhere other than the source path.
    pub destination: Option<PathBuf>,
}

impl CommitOptions {
    /// Rewrite the source file.
    pub fn in_place(backup: bool) -> Self {
        Self {
            backup,
            destination: None,
        }
    }

    /// Write the result to `path`, leaving the source alone.
    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        Self {
            backup: false,
            destination: Some(path.into()),
        }
    }
}

/// What a commit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    /// File that received the new content.
    pub written: PathBuf,
    /// Backup path, if one was made.
    pub backup: Option<PathBuf>,
}

/// A locked, loaded notebook awaiting commit.
#[derive(Debug)]
pub struct Transaction {
    loaded: LoadedNotebook,
    lock: NotebookLock,
}

impl Transaction {
    /// Lock and load the notebook at `path`.
    ///
    /// Existence is checked before locking so a missing file reports
    /// "not found" rather than leaving a stray lock file behind. The lock
    /// is keyed on the resolved file, so a symlink and its target share it.
    pub fn begin(path: &Path) -> Result<Self, EngineError> {
        if !path.exists() {
            return Err(NotebookError::NotFound {
                path: path.to_path_buf(),
            }
            .into());
        }
        let target = io::resolve_target(path).map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let lock = NotebookLock::acquire(&target)?;
        let loaded = io::load(path)?;
        Ok(Self { loaded, lock })
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.loaded.path
    }

    /// The notebook as currently edited.
    pub fn notebook(&self) -> &Notebook {
        &self.loaded.notebook
    }

    /// Mutable access for in-memory edits.
    pub fn notebook_mut(&mut self) -> &mut Notebook {
        &mut self.loaded.notebook
    }

    /// Write the edited notebook and release the lock.
    pub fn commit(self, options: &CommitOptions) -> Result<CommitOutcome, EngineError> {
        let source = self.loaded.path.as_path();

        let current = io::fingerprint_file(source)?;
        if current != self.loaded.fingerprint {
            tracing::warn!(
                path = %source.display(),
                expected = self.loaded.fingerprint.short(),
                found = current.short(),
                "notebook changed since it was loaded"
            );
            return Err(EngineError::Modified {
                path: source.to_path_buf(),
            });
        }

        let (written, backup) = match &options.destination {
            Some(dest) => (dest.clone(), None),
            None => {
                let backup = if options.backup {
                    Some(write_backup(source)?)
                } else {
                    None
                };
                (source.to_path_buf(), backup)
            }
        };

        io::save(&written, &self.loaded.notebook)?;
        tracing::debug!(
            path = %written.display(),
            backup = ?backup,
            "committed notebook"
        );

        drop(self.lock);
        Ok(CommitOutcome { written, backup })
    }
}

/// Backup path for a notebook.
pub fn backup_path_for(path: &Path) -> PathBuf {
    io::sibling_with_suffix(path, BACKUP_SUFFIX)
}

fn write_backup(path: &Path) -> Result<PathBuf, EngineError> {
    let backup = backup_path_for(path);
    std::fs::copy(path, &backup).map_err(|source| EngineError::Backup {
        path: backup.clone(),
        source,
    })?;
    Ok(backup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::lock::lock_path_for;
    use crate::core::notebook::CellKind;
    use std::fs;
    use tempfile::TempDir;

    const ORIGINAL: &str = r#"{"cells": [{"cell_type": "markdown", "metadata": {}, "source": "Hi"}], "metadata": {}, "nbformat": 4, "nbformat_minor": 5}"#;

    fn setup() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nb.ipynb");
        fs::write(&path, ORIGINAL).unwrap();
        (temp, path)
    }

    #[test]
    fn commit_in_place_with_backup() {
        let (_temp, path) = setup();
        let mut tx = Transaction::begin(&path).unwrap();
        tx.notebook_mut().cells[0].source.replace_text("Hallo".into());

        let outcome = tx.commit(&CommitOptions::in_place(true)).unwrap();

        assert_eq!(outcome.written, path);
        let backup = outcome.backup.unwrap();
        assert_eq!(backup, backup_path_for(&path));
        assert_eq!(fs::read_to_string(&backup).unwrap(), ORIGINAL);

        let reloaded = io::load(&path).unwrap();
        assert_eq!(reloaded.notebook.cells[0].source.text(), "Hallo");
        assert!(NotebookLock::acquire(&path).is_ok());
    }

    #[test]
    fn commit_without_backup_writes_no_bak() {
        let (_temp, path) = setup();
        let tx = Transaction::begin(&path).unwrap();
        let outcome = tx.commit(&CommitOptions::in_place(false)).unwrap();
        assert!(outcome.backup.is_none());
        assert!(!backup_path_for(&path).exists());
    }

    #[test]
    fn commit_to_destination_leaves_source_alone() {
        let (temp, path) = setup();
        let dest = temp.path().join("out/translated.ipynb");
        let mut tx = Transaction::begin(&path).unwrap();
        tx.notebook_mut().cells[0].kind = CellKind::Raw;

        let outcome = tx.commit(&CommitOptions::to_path(&dest)).unwrap();

        assert_eq!(outcome.written, dest);
        assert!(outcome.backup.is_none());
        assert_eq!(fs::read_to_string(&path).unwrap(), ORIGINAL);
        assert_eq!(io::load(&dest).unwrap().notebook.cells[0].kind, CellKind::Raw);
    }

    #[test]
    fn drop_without_commit_leaves_file_untouched() {
        let (_temp, path) = setup();
        {
            let mut tx = Transaction::begin(&path).unwrap();
            tx.notebook_mut().cells.clear();
        }
        assert_eq!(fs::read_to_string(&path).unwrap(), ORIGINAL);
        assert!(NotebookLock::acquire(&path).is_ok());
    }

    #[test]
    fn concurrent_modification_aborts_commit() {
        let (_temp, path) = setup();
        let tx = Transaction::begin(&path).unwrap();
        fs::write(&path, ORIGINAL.replace("Hi", "Changed")).unwrap();

        let err = tx.commit(&CommitOptions::in_place(true)).unwrap_err();
        assert!(matches!(err, EngineError::Modified { .. }));
        assert!(fs::read_to_string(&path).unwrap().contains("Changed"));
        assert!(!backup_path_for(&path).exists());
    }

    #[test]
    fn second_transaction_is_refused_while_first_is_open() {
        let (_temp, path) = setup();
        let _first = Transaction::begin(&path).unwrap();
        let err = Transaction::begin(&path).unwrap_err();
        assert!(matches!(err, EngineError::Lock(LockError::AlreadyLocked { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn symlink_and_target_share_one_lock() {
        let (temp, path) = setup();
        let link = temp.path().join("link.ipynb");
        std::os::unix::fs::symlink(&path, &link).unwrap();

        let mut tx = Transaction::begin(&link).unwrap();
        let err = Transaction::begin(&path).unwrap_err();
        assert!(matches!(err, EngineError::Lock(LockError::AlreadyLocked { .. })));

        tx.notebook_mut().cells[0].source.replace_text("Hallo".into());
        tx.commit(&CommitOptions::in_place(false)).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(io::load(&path).unwrap().notebook.cells[0].source.text(), "Hallo");
    }

    #[test]
    fn missing_notebook_reports_not_found_without_lock_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("missing.ipynb");
        let err = Transaction::begin(&path).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Notebook(NotebookError::NotFound { .. })
        ));
        assert!(!lock_path_for(&path).exists());
    }
}
