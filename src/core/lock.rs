//! core::lock
//!
//! Exclusive per-notebook lock for in-place mutations.
//!
//! # Storage
//!
//! - `<dir>/.<name>.ipynb.lock` - sidecar lock file next to the notebook
//!
//! # Invariants
//!
//! - Lock must be held from load until the rewritten file is committed
//! - Lock is automatically released on drop (RAII pattern)
//! - The sidecar file is never deleted, so every process locks the same inode
//! - Lock acquisition is non-blocking (fails fast if locked)
//!
//! # Example
//!
//! ```ignore
//! use refinenb::core::lock::NotebookLock;
//!
//! let lock = NotebookLock::acquire(Path::new("lesson.ipynb"))?;
//! // ... rewrite the notebook ...
//! drop(lock);
//! ```

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

/// Errors from locking operations.
#[derive(Debug, Error)]
pub enum LockError {
    /// Another process already holds the lock.
    #[error("notebook '{}' is locked by another refinenb process", notebook.display())]
    AlreadyLocked { notebook: PathBuf },

    /// Failed to create the lock file.
    #[error("failed to create lock: {0}")]
    CreateFailed(String),

    /// Failed to acquire the OS lock.
    #[error("failed to acquire lock: {0}")]
    AcquireFailed(String),
}

/// An exclusive lock on one notebook file.
#[derive(Debug)]
pub struct NotebookLock {
    /// Path to the lock file.
    path: PathBuf,
    /// The open file handle with the lock held.
    file: Option<File>,
}

impl NotebookLock {
    /// Attempt to lock `notebook`.
    ///
    /// Uses OS-level file locking via `fs2`, which works across processes.
    ///
    /// # Errors
    ///
    /// - [`LockError::AlreadyLocked`] if another process holds the lock
    /// - [`LockError::CreateFailed`] if the lock file cannot be created
    /// - [`LockError::AcquireFailed`] if the OS lock cannot be acquired
    pub fn acquire(notebook: &Path) -> Result<Self, LockError> {
        let path = lock_path_for(notebook);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .map_err(|e| {
                LockError::CreateFailed(format!("cannot open {}: {}", path.display(), e))
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                tracing::debug!(lock = %path.display(), "acquired notebook lock");
                Ok(Self {
                    path,
                    file: Some(file),
                })
            }
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => {
                Err(LockError::AlreadyLocked {
                    notebook: notebook.to_path_buf(),
                })
            }
            Err(e) => Err(LockError::AcquireFailed(e.to_string())),
        }
    }

    /// Check if the lock is currently held.
    pub fn is_held(&self) -> bool {
        self.file.is_some()
    }

    /// Get the path to the lock file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for NotebookLock {
    fn drop(&mut self) {
        // Unlock only; the sidecar stays for the next holder
        if let Some(file) = self.file.take() {
            let _ = file.unlock();
            tracing::debug!(lock = %self.path.display(), "released notebook lock");
        }
    }
}

/// Sidecar lock path for a notebook: `dir/.name.ipynb.lock`.
pub fn lock_path_for(notebook: &Path) -> PathBuf {
    let mut name = std::ffi::OsString::from(".");
    name.push(notebook.file_name().unwrap_or_default());
    name.push(".lock");
    notebook.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn lock_acquire_succeeds() {
        let temp = TempDir::new().unwrap();
        let nb = temp.path().join("nb.ipynb");

        let lock = NotebookLock::acquire(&nb).expect("acquire lock");
        assert!(lock.is_held());
        assert!(lock.path().exists());
    }

    #[test]
    fn second_acquire_fails_fast() {
        let temp = TempDir::new().unwrap();
        let nb = temp.path().join("nb.ipynb");

        let _first = NotebookLock::acquire(&nb).unwrap();
        let second = NotebookLock::acquire(&nb);
        assert!(matches!(second, Err(LockError::AlreadyLocked { .. })));
    }

    #[test]
    fn drop_releases_and_keeps_sidecar() {
        let temp = TempDir::new().unwrap();
        let nb = temp.path().join("nb.ipynb");

        let lock = NotebookLock::acquire(&nb).unwrap();
        let lock_file = lock.path().to_path_buf();
        drop(lock);

        assert!(lock_file.exists());
        assert!(NotebookLock::acquire(&nb).is_ok());
    }

    #[test]
    fn handle_opened_before_release_still_contends_with_next_holder() {
        let temp = TempDir::new().unwrap();
        let nb = temp.path().join("nb.ipynb");

        let first = NotebookLock::acquire(&nb).unwrap();
        let early = OpenOptions::new()
            .read(true)
            .write(true)
            .open(first.path())
            .unwrap();
        drop(first);

        let _second = NotebookLock::acquire(&nb).unwrap();
        assert!(early.try_lock_exclusive().is_err());
    }

    #[test]
    fn lock_path_is_hidden_sidecar() {
        assert_eq!(
            lock_path_for(Path::new("/work/lesson.ipynb")),
            PathBuf::from("/work/.lesson.ipynb.lock")
        );
    }
}
