//! Artifact repository capability
//!
//! Everything the pipeline needs from Artifactory and the local build-info
//! cache goes through [`ArtifactGateway`]. The production implementation
//! lives in [`crate::infra::gateway`]; tests use in-memory fakes.

use std::path::{Path, PathBuf};

use crate::core::build_info::{Artifact, BuildIdentity, BuildInfo};
use crate::core::connection::ServerDetails;
use crate::error::{ConnectionError, GatewayError};

/// What to upload and where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSpec {
    /// Local directory whose content is uploaded
    pub pattern: PathBuf,
    /// `<repo>/<folder>/` in the repository
    pub target: String,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Create remote folders for empty local directories
    pub include_dirs: bool,
    /// Drop the local directory structure
    pub flat: bool,
}

impl UploadSpec {
    /// Repository name, the first segment of the target
    pub fn repo(&self) -> &str {
        self.target.split('/').next().unwrap_or_default()
    }
}

/// Outcome of an upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadSummary {
    /// Files transferred
    pub files: usize,
    /// Remote folders created for empty directories
    pub folders: usize,
    /// Partial build-info written by this upload
    pub partial: PathBuf,
}

/// Artifact repository operations used by the load stage
#[allow(async_fn_in_trait)]
pub trait ArtifactGateway {
    /// Look up a stored connection, or the default one when `server_id` is `None`
    fn resolve_connection(&self, server_id: Option<&str>) -> Result<ServerDetails, ConnectionError>;

    /// Drop any locally cached build-info for a build
    async fn clear_build_info_cache(&self, build: &BuildIdentity) -> Result<(), GatewayError>;

    /// Upload files and record them as a partial build-info for `build`
    ///
    /// All-or-nothing: any file failing after retries fails the whole call.
    async fn upload(
        &self,
        server: &ServerDetails,
        spec: &UploadSpec,
        build: &BuildIdentity,
    ) -> Result<UploadSummary, GatewayError>;

    /// Artifacts recorded in the partial build-info of one upload
    async fn deployed_artifacts(&self, partial: &Path) -> Result<Vec<Artifact>, GatewayError>;

    /// Persist the assembled build-info locally
    async fn save_build_info(&self, info: &BuildInfo) -> Result<(), GatewayError>;

    /// Send the saved build-info for `build` to the repository
    async fn publish_build_info(
        &self,
        server: &ServerDetails,
        build: &BuildIdentity,
    ) -> Result<(), GatewayError>;
}
