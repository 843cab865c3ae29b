//! Production artifact gateway
//!
//! Backs [`ArtifactGateway`] with the stored connections, the local
//! build-info cache and the Artifactory REST client.

use std::path::Path;

use tracing::{debug, info};

use crate::core::build_info::{Artifact, BuildIdentity, BuildInfo};
use crate::core::connection::{ConnectionStore, ServerDetails};
use crate::core::gateway::{ArtifactGateway, UploadSpec, UploadSummary};
use crate::error::{ConnectionError, GatewayError};
use crate::infra::artifactory::ArtifactoryClient;
use crate::infra::build_info_store::BuildInfoStore;
use crate::infra::dirs::BakeDirs;

/// Gateway talking to a real Artifactory instance
#[derive(Debug, Clone)]
pub struct ArtifactoryGateway {
    dirs: BakeDirs,
    store: BuildInfoStore,
    client: ArtifactoryClient,
}

impl ArtifactoryGateway {
    /// Create a gateway using the given directories and client
    pub fn new(dirs: BakeDirs, client: ArtifactoryClient) -> Self {
        let store = BuildInfoStore::new(&dirs.builds_dir());
        Self {
            dirs,
            store,
            client,
        }
    }

    /// The local build-info cache
    pub fn store(&self) -> &BuildInfoStore {
        &self.store
    }
}

impl ArtifactGateway for ArtifactoryGateway {
    fn resolve_connection(&self, server_id: Option<&str>) -> Result<ServerDetails, ConnectionError> {
        let server = ConnectionStore::load(&self.dirs)?.resolve(server_id)?;
        debug!("Using Artifactory server '{}' at {}", server.server_id, server.url);
        Ok(server)
    }

    async fn clear_build_info_cache(&self, build: &BuildIdentity) -> Result<(), GatewayError> {
        self.store.clear(build)?;
        Ok(())
    }

    async fn upload(
        &self,
        server: &ServerDetails,
        spec: &UploadSpec,
        build: &BuildIdentity,
    ) -> Result<UploadSummary, GatewayError> {
        let outcome = self.client.upload(server, spec, build).await?;
        let partial = self.store.record_partial(build, &outcome.artifacts)?;
        info!(
            "Uploaded {} files to {} ({} empty folders)",
            outcome.artifacts.len(),
            spec.target,
            outcome.folders
        );
        debug!("Partial build-info written to {}", partial.display());

        Ok(UploadSummary {
            files: outcome.artifacts.len(),
            folders: outcome.folders,
            partial,
        })
    }

    async fn deployed_artifacts(&self, partial: &Path) -> Result<Vec<Artifact>, GatewayError> {
        self.store.read_partial(partial)
    }

    async fn save_build_info(&self, info: &BuildInfo) -> Result<(), GatewayError> {
        let path = self.store.save(info)?;
        info!("Build-info saved to {}", path.display());
        Ok(())
    }

    async fn publish_build_info(
        &self,
        server: &ServerDetails,
        build: &BuildIdentity,
    ) -> Result<(), GatewayError> {
        let info = self.store.load(build)?;
        self.client.publish_build_info(server, &info).await
    }
}
