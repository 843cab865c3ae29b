//! Filesystem operations
//!
//! Handles file and directory operations.

use std::io::ErrorKind;
use std::path::Path;

use crate::error::FilesystemError;

/// Create a directory and all parent directories
pub fn create_dir_all(path: &Path) -> Result<(), FilesystemError> {
    std::fs::create_dir_all(path).map_err(|e| FilesystemError::CreateDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Remove a directory and all its contents
pub fn remove_dir_all(path: &Path) -> Result<(), FilesystemError> {
    if path.exists() {
        std::fs::remove_dir_all(path).map_err(|e| FilesystemError::RemoveDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
    }
    Ok(())
}

/// Remove everything inside a directory, keeping the directory itself
///
/// Returns the number of top-level entries removed.
pub fn remove_dir_contents(path: &Path) -> Result<usize, FilesystemError> {
    let entries = std::fs::read_dir(path).map_err(|e| FilesystemError::ReadDir {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| FilesystemError::ReadDir {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        let entry_path = entry.path();
        let is_dir = entry
            .file_type()
            .map(|t| t.is_dir())
            .unwrap_or(false);

        if is_dir {
            std::fs::remove_dir_all(&entry_path).map_err(|e| FilesystemError::RemoveDir {
                path: entry_path.clone(),
                error: e.to_string(),
            })?;
        } else {
            std::fs::remove_file(&entry_path).map_err(|e| FilesystemError::RemoveFile {
                path: entry_path.clone(),
                error: e.to_string(),
            })?;
        }
        removed += 1;
    }

    Ok(removed)
}

/// Remove a file, treating "not found" as success
///
/// Returns whether a file was actually removed.
pub fn remove_file_if_exists(path: &Path) -> Result<bool, FilesystemError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(FilesystemError::RemoveFile {
            path: path.to_path_buf(),
            error: e.to_string(),
        }),
    }
}

/// Write content to a file
pub fn write_file(path: &Path, content: &str) -> Result<(), FilesystemError> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    std::fs::write(path, content).map_err(|e| FilesystemError::WriteFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

/// Read content from a file
pub fn read_file(path: &Path) -> Result<String, FilesystemError> {
    std::fs::read_to_string(path).map_err(|e| FilesystemError::ReadFile {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_remove_dir_contents_keeps_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("work/i586")).unwrap();
        std::fs::write(dir.path().join("work/i586/log"), "x").unwrap();
        std::fs::write(dir.path().join("saved_tmpdir"), "x").unwrap();

        let removed = remove_dir_contents(dir.path()).unwrap();

        assert_eq!(removed, 2);
        assert!(dir.path().is_dir());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_remove_dir_contents_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let err = remove_dir_contents(&dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, FilesystemError::ReadDir { .. }));
    }

    #[test]
    fn test_remove_file_if_exists() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("bitbake.lock");
        std::fs::write(&file, "").unwrap();

        assert!(remove_file_if_exists(&file).unwrap());
        assert!(!remove_file_if_exists(&file).unwrap());
    }

    #[test]
    fn test_write_then_read_creates_parents() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a/b/build-info.json");

        write_file(&file, "{}").unwrap();

        assert_eq!(read_file(&file).unwrap(), "{}");
    }

    #[test]
    fn test_remove_dir_all_missing_is_ok() {
        let dir = TempDir::new().unwrap();
        assert!(remove_dir_all(&dir.path().join("missing")).is_ok());
    }
}
