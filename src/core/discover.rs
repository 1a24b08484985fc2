//! core::discover
//!
//! Recursive notebook discovery for batch runs.

use std::fs;
use std::path::{Path, PathBuf};

use super::io::has_notebook_extension;

/// Directory Jupyter uses for autosave copies; never descended into.
pub const CHECKPOINT_DIR: &str = ".ipynb_checkpoints";

/// Find every `.ipynb` file under `root`, sorted by path.
///
/// Symlinked directories are not followed.
///
/// # Errors
///
/// Fails if `root` is not a readable directory. Unreadable subdirectories
/// and entries are skipped with a warning.
pub fn find_notebooks(root: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("not a directory: {}", root.display()),
        ));
    }

    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if dir == root => return Err(e),
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                continue;
            }
        };

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            let file_type = match entry.file_type() {
                Ok(file_type) => file_type,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping entry of unknown type");
                    continue;
                }
            };

            if file_type.is_dir() {
                if entry.file_name() != CHECKPOINT_DIR {
                    pending.push(path);
                }
            } else if has_notebook_extension(&path) {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[test]
    fn finds_nested_notebooks_sorted() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(&root.join("b/02.ipynb"));
        touch(&root.join("a/01.ipynb"));
        touch(&root.join("top.ipynb"));
        touch(&root.join("a/notes.md"));

        let found = find_notebooks(root).unwrap();
        assert_eq!(
            found,
            vec![
                root.join("a/01.ipynb"),
                root.join("b/02.ipynb"),
                root.join("top.ipynb"),
            ]
        );
    }

    #[test]
    fn skips_checkpoints() {
        let temp = TempDir::new().unwrap();
        touch(&temp.path().join(".ipynb_checkpoints/x-checkpoint.ipynb"));
        touch(&temp.path().join("x.ipynb"));

        let found = find_notebooks(temp.path()).unwrap();
        assert_eq!(found, vec![temp.path().join("x.ipynb")]);
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_does_not_stop_the_search() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let locked = temp.path().join("locked");
        touch(&locked.join("hidden.ipynb"));
        touch(&temp.path().join("open/x.ipynb"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let found = find_notebooks(temp.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let found = found.unwrap();
        assert!(found.contains(&temp.path().join("open/x.ipynb")));
    }

    #[test]
    fn rejects_non_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("x.ipynb");
        touch(&file);

        assert!(find_notebooks(&file).is_err());
    }
}
