//! Local build-info cache
//!
//! Each build gets a directory under `<data_dir>/builds/<cache key>/`.
//! Uploads drop one partial file per call into `partials/`
//! (`<millis>-<seq>.json`) and read back only the file they wrote; the final
//! record is written to `build-info.json` and read back for publishing.

use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::build_info::{Artifact, BuildIdentity, BuildInfo};
use crate::error::{FilesystemError, GatewayError};
use crate::infra::filesystem;

const PARTIALS_DIR: &str = "partials";
const BUILD_INFO_FILE: &str = "build-info.json";

/// Artifacts recorded by one upload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PartialBuildInfo {
    /// Milliseconds since the epoch when the upload finished
    pub timestamp: i64,
    pub artifacts: Vec<Artifact>,
}

/// Directory-backed build-info cache
#[derive(Debug, Clone)]
pub struct BuildInfoStore {
    root: PathBuf,
}

impl BuildInfoStore {
    /// Create a store rooted at `root` (usually `BakeDirs::builds_dir`)
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Directory holding everything cached for one build
    pub fn build_dir(&self, build: &BuildIdentity) -> PathBuf {
        self.root.join(build.cache_key())
    }

    /// Location of the saved record for one build
    pub fn build_info_path(&self, build: &BuildIdentity) -> PathBuf {
        self.build_dir(build).join(BUILD_INFO_FILE)
    }

    /// Remove all cached data for a build; absence is not an error
    pub fn clear(&self, build: &BuildIdentity) -> Result<(), FilesystemError> {
        let dir = self.build_dir(build);
        debug!("Clearing build-info cache {}", dir.display());
        filesystem::remove_dir_all(&dir)
    }

    /// Record the artifacts of one upload
    pub fn record_partial(
        &self,
        build: &BuildIdentity,
        artifacts: &[Artifact],
    ) -> Result<PathBuf, GatewayError> {
        let partials = self.build_dir(build).join(PARTIALS_DIR);
        filesystem::create_dir_all(&partials)?;

        let timestamp = Utc::now().timestamp_millis();
        // Uploads finishing in the same millisecond keep their order.
        let mut sequence = 0;
        let mut path = partials.join(format!("{timestamp}-{sequence:03}.json"));
        while path.exists() {
            sequence += 1;
            path = partials.join(format!("{timestamp}-{sequence:03}.json"));
        }

        let partial = PartialBuildInfo {
            timestamp,
            artifacts: artifacts.to_vec(),
        };
        let content = serde_json::to_string_pretty(&partial).map_err(|e| GatewayError::Json {
            path: path.clone(),
            error: e.to_string(),
        })?;
        filesystem::write_file(&path, &content)?;
        debug!("Recorded {} artifacts in {}", artifacts.len(), path.display());
        Ok(path)
    }

    /// Artifacts recorded in one partial file
    pub fn read_partial(&self, path: &Path) -> Result<Vec<Artifact>, GatewayError> {
        let content = filesystem::read_file(path)?;
        let partial: PartialBuildInfo =
            serde_json::from_str(&content).map_err(|e| GatewayError::Json {
                path: path.to_path_buf(),
                error: e.to_string(),
            })?;
        Ok(partial.artifacts)
    }

    /// Persist the final record for a build
    pub fn save(&self, info: &BuildInfo) -> Result<PathBuf, GatewayError> {
        let mut build = BuildIdentity::new(&info.name, &info.number);
        build.project.clone_from(&info.project);
        let path = self.build_info_path(&build);

        let content = serde_json::to_string_pretty(info).map_err(|e| GatewayError::Json {
            path: path.clone(),
            error: e.to_string(),
        })?;
        filesystem::write_file(&path, &content)?;
        debug!("Saved build-info to {}", path.display());
        Ok(path)
    }

    /// Read back the saved record for a build
    pub fn load(&self, build: &BuildIdentity) -> Result<BuildInfo, GatewayError> {
        let path = self.build_info_path(build);
        if !path.is_file() {
            return Err(GatewayError::BuildInfoMissing { path });
        }

        let content = filesystem::read_file(&path)?;
        let mut info: BuildInfo = serde_json::from_str(&content).map_err(|e| GatewayError::Json {
            path: path.clone(),
            error: e.to_string(),
        })?;
        info.project.clone_from(&build.project);
        Ok(info)
    }
}
