//! Clean logic
//!
//! Wipes bitbake's temporary output and the lock/socket files a previous
//! (possibly interrupted) run left behind. Not transactional: a failure
//! part-way leaves the tree partially cleaned.

use std::path::Path;

use crate::core::layout::TreeLayout;
use crate::error::FilesystemError;
use crate::infra::filesystem;

/// Result of clean operation
#[derive(Debug, Default)]
pub struct CleanResult {
    /// Entries removed from the temporary directory
    pub removed_entries: usize,
    /// Lock files that were removed
    pub removed_locks: Vec<String>,
    /// Lock files that didn't exist (skipped)
    pub skipped_locks: Vec<String>,
}

/// Clean the build tree under a run folder
///
/// Empties the temporary directory and removes known lock files. A missing
/// temporary directory or lock file is skipped; any other failure aborts.
///
/// # Arguments
///
/// * `run_folder` - Root of the Yocto build tree
/// * `layout` - Where the build tool keeps its outputs
///
/// # Returns
///
/// * `Ok(CleanResult)` - Information about what was cleaned
/// * `Err(FilesystemError)` - If removal fails
pub fn clean_build_tree(
    run_folder: &Path,
    layout: &TreeLayout,
) -> Result<CleanResult, FilesystemError> {
    let mut result = CleanResult::default();

    let tmp_dir = layout.tmp_dir(run_folder);
    if tmp_dir.is_dir() {
        tracing::info!("Cleaning tmp folder {}", tmp_dir.display());
        result.removed_entries = filesystem::remove_dir_contents(&tmp_dir)?;
    } else {
        tracing::debug!("No tmp folder at {}, nothing to clean", tmp_dir.display());
    }

    for lock_file in layout.lock_files(run_folder) {
        let name = lock_file.display().to_string();
        if filesystem::remove_file_if_exists(&lock_file)? {
            tracing::debug!("Removed {name}");
            result.removed_locks.push(name);
        } else {
            result.skipped_locks.push(name);
        }
    }

    Ok(result)
}
