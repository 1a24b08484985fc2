//! core::io
//!
//! Loading and saving notebook files.
//!
//! # Loading
//!
//! [`load`] checks, in order: the path exists, it has the `.ipynb`
//! extension, the content is JSON, and the JSON is a valid v4 notebook.
//! The bytes read are fingerprinted so callers can detect concurrent edits.
//!
//! # Saving
//!
//! [`save`] and [`write_atomic`] never leave a half-written file behind:
//! content goes to a sibling temp file that is synced and then renamed over
//! the target. Symlinks are resolved first so the link survives and the
//! file it points at is the one rewritten. An existing file keeps its
//! permission bits.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::notebook::{self, FormatIssue, Notebook};
use super::types::Fingerprint;

/// Required notebook file extension.
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Errors from reading or writing notebook files.
#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("notebook not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid notebook '{}': {issue}", path.display())]
    Format { path: PathBuf, issue: FormatIssue },

    #[error("file must be a Jupyter notebook (.ipynb), got: {}", path.display())]
    WrongExtension { path: PathBuf },

    #[error("i/o error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl NotebookError {
    /// Whether this is a format-level problem (bad content or extension).
    pub fn is_format(&self) -> bool {
        matches!(
            self,
            NotebookError::Format { .. } | NotebookError::WrongExtension { .. }
        )
    }

    fn io(path: &Path, source: std::io::Error) -> Self {
        NotebookError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// A notebook together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedNotebook {
    /// Path the notebook was read from.
    pub path: PathBuf,
    /// Parsed document.
    pub notebook: Notebook,
    /// Hash of the bytes as read.
    pub fingerprint: Fingerprint,
}

/// Load and validate a notebook.
///
/// # Errors
///
/// - [`NotebookError::NotFound`] if the path does not exist
/// - [`NotebookError::WrongExtension`] if it is not an `.ipynb` file
/// - [`NotebookError::Format`] if the content is not a valid notebook
/// - [`NotebookError::Io`] for other read failures
pub fn load(path: &Path) -> Result<LoadedNotebook, NotebookError> {
    if !path.exists() {
        return Err(NotebookError::NotFound {
            path: path.to_path_buf(),
        });
    }
    if !has_notebook_extension(path) {
        return Err(NotebookError::WrongExtension {
            path: path.to_path_buf(),
        });
    }

    let bytes = fs::read(path).map_err(|e| NotebookError::io(path, e))?;
    let fingerprint = Fingerprint::of_bytes(&bytes);
    let notebook = notebook::parse(&bytes).map_err(|issue| NotebookError::Format {
        path: path.to_path_buf(),
        issue,
    })?;

    tracing::debug!(
        path = %path.display(),
        cells = notebook.cells.len(),
        fingerprint = fingerprint.short(),
        "loaded notebook"
    );

    Ok(LoadedNotebook {
        path: path.to_path_buf(),
        notebook,
        fingerprint,
    })
}

/// Fingerprint the current on-disk content of a file.
pub fn fingerprint_file(path: &Path) -> Result<Fingerprint, NotebookError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Fingerprint::of_bytes(&bytes)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(NotebookError::NotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(NotebookError::io(path, e)),
    }
}

/// Save a notebook atomically in Jupyter's canonical layout.
pub fn save(path: &Path, notebook: &Notebook) -> Result<(), NotebookError> {
    let contents = notebook.to_canonical_json().map_err(|e| {
        NotebookError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;
    write_atomic(path, contents.as_bytes())?;
    tracing::debug!(path = %path.display(), bytes = contents.len(), "saved notebook");
    Ok(())
}

/// Write bytes to `path` via temp file + rename.
///
/// Creates parent directories if needed.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), NotebookError> {
    let target = resolve_target(path).map_err(|e| NotebookError::io(path, e))?;
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| NotebookError::io(path, e))?;
    }

    let permissions = fs::metadata(&target).ok().map(|m| m.permissions());
    let temp_path = temp_path_for(&target);
    let result = (|| {
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(contents)?;
        file.sync_all()?;
        if let Some(permissions) = permissions {
            fs::set_permissions(&temp_path, permissions)?;
        }
        fs::rename(&temp_path, &target)
    })();

    if let Err(e) = result {
        let _ = fs::remove_file(&temp_path);
        return Err(NotebookError::io(path, e));
    }
    Ok(())
}

/// The file a write to `path` should land in.
///
/// Existing paths are canonicalized, following symlinks. A path that does
/// not exist yet is returned as given.
pub fn resolve_target(path: &Path) -> std::io::Result<PathBuf> {
    match fs::canonicalize(path) {
        Ok(resolved) => Ok(resolved),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(path.to_path_buf()),
        Err(e) => Err(e),
    }
}

/// Sibling temp file used by [`write_atomic`].
pub fn temp_path_for(path: &Path) -> PathBuf {
    sibling_with_suffix(path, ".tmp")
}

/// `path` with `suffix` appended to its file name.
///
/// `nb.ipynb` + `.bak` becomes `nb.ipynb.bak`.
pub fn sibling_with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(suffix);
    path.with_file_name(name)
}

/// Whether the path ends in `.ipynb`.
pub fn has_notebook_extension(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext == NOTEBOOK_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::notebook::{Cell, CellKind};
    use tempfile::TempDir;

    const CANONICAL: &str = r##"{
 "cells": [
  {
   "cell_type": "markdown",
   "metadata": {
    "tags": [
     "header"
    ]
   },
   "source": [
    "# Test Notebook\n",
    "Intro"
   ]
  },
  {
   "cell_type": "code",
   "execution_count": 1,
   "id": "a1b2c3",
   "metadata": {},
   "outputs": [
    {
     "name": "stdout",
     "output_type": "stream",
     "text": "Hello, World!\n"
    }
   ],
   "source": "print('Hello, World!')"
  }
 ],
 "metadata": {
  "kernelspec": {
   "display_name": "Python 3",
   "name": "python3"
  }
 },
 "nbformat": 4,
 "nbformat_minor": 5
}
"##;

    #[test]
    fn load_missing_file_is_not_found() {
        let temp = TempDir::new().unwrap();
        let err = load(&temp.path().join("missing.ipynb")).unwrap_err();
        assert!(matches!(err, NotebookError::NotFound { .. }));
    }

    #[test]
    fn load_rejects_wrong_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.json");
        fs::write(&path, CANONICAL).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, NotebookError::WrongExtension { .. }));
        assert!(err.is_format());
    }

    #[test]
    fn load_rejects_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.ipynb");
        fs::write(&path, "not json").unwrap();

        let err = load(&path).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn canonical_file_round_trips_byte_for_byte() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nb.ipynb");
        fs::write(&path, CANONICAL).unwrap();

        let loaded = load(&path).unwrap();
        save(&path, &loaded.notebook).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), CANONICAL);
        assert_eq!(fingerprint_file(&path).unwrap(), loaded.fingerprint);
    }

    #[test]
    fn save_leaves_no_temp_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nb.ipynb");
        let nb = Notebook::new().with_cell(Cell::new(CellKind::Code, "x = 1"));

        save(&path, &nb).unwrap();

        assert!(path.exists());
        assert!(!temp_path_for(&path).exists());
        assert_eq!(load(&path).unwrap().notebook, nb);
    }

    #[test]
    fn write_atomic_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/out.json");
        write_atomic(&path, b"[]").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"[]");
    }

    #[test]
    fn write_atomic_reports_io_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("file");
        fs::write(&blocker, "x").unwrap();

        let err = write_atomic(&blocker.join("out.json"), b"[]").unwrap_err();
        assert!(matches!(err, NotebookError::Io { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn save_through_symlink_updates_the_target() {
        let temp = TempDir::new().unwrap();
        let real = temp.path().join("real.ipynb");
        let link = temp.path().join("link.ipynb");
        fs::write(&real, CANONICAL).unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let nb = Notebook::new().with_cell(Cell::new(CellKind::Markdown, "updated"));
        save(&link, &nb).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(load(&real).unwrap().notebook, nb);
        assert!(!temp_path_for(&real).exists());
    }

    #[cfg(unix)]
    #[test]
    fn save_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nb.ipynb");
        fs::write(&path, CANONICAL).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600)).unwrap();

        let loaded = load(&path).unwrap();
        save(&path, &loaded.notebook).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }

    #[test]
    fn resolve_target_keeps_missing_paths() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("new/out.ipynb");
        assert_eq!(resolve_target(&missing).unwrap(), missing);
    }

    #[test]
    fn sibling_suffix_appends_to_file_name() {
        let path = Path::new("/tmp/dir/nb.ipynb");
        assert_eq!(
            sibling_with_suffix(path, ".bak"),
            PathBuf::from("/tmp/dir/nb.ipynb.bak")
        );
    }
}
