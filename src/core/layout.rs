//! Build tree layout
//!
//! Locations inside a Yocto run folder that the pipeline touches. Kept as a
//! value passed into the pipeline so tests can point it anywhere.

use std::path::{Path, PathBuf};

use crate::config::defaults;

/// Relative locations of build tool outputs inside a run folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeLayout {
    /// Temporary build output, wiped by the clean stage
    pub tmp_dir: PathBuf,
    /// Lock and socket files left behind by the build tool
    pub lock_files: Vec<PathBuf>,
    /// Full deploy tree
    pub deploy_dir: PathBuf,
    /// Final images subtree
    pub images_dir: PathBuf,
}

impl Default for TreeLayout {
    fn default() -> Self {
        Self {
            tmp_dir: PathBuf::from(defaults::TMP_DIRECTORY),
            lock_files: defaults::LOCK_FILES.iter().map(PathBuf::from).collect(),
            deploy_dir: PathBuf::from(defaults::DEPLOY_DIRECTORY),
            images_dir: PathBuf::from(defaults::IMAGES_DIRECTORY),
        }
    }
}

impl TreeLayout {
    /// Absolute temporary directory for a run folder
    pub fn tmp_dir(&self, run_folder: &Path) -> PathBuf {
        run_folder.join(&self.tmp_dir)
    }

    /// Absolute lock file paths for a run folder
    pub fn lock_files(&self, run_folder: &Path) -> Vec<PathBuf> {
        self.lock_files
            .iter()
            .map(|lock| run_folder.join(lock))
            .collect()
    }

    /// Absolute deploy directory for a run folder
    pub fn deploy_dir(&self, run_folder: &Path) -> PathBuf {
        run_folder.join(&self.deploy_dir)
    }

    /// Absolute images directory for a run folder
    pub fn images_dir(&self, run_folder: &Path) -> PathBuf {
        run_folder.join(&self.images_dir)
    }

    /// Directory whose content is uploaded as build artifacts
    pub fn artifact_source(&self, run_folder: &Path, only_images: bool) -> PathBuf {
        if only_images {
            self.images_dir(run_folder)
        } else {
            self.deploy_dir(run_folder)
        }
    }
}
