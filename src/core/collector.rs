//! Artifact collection
//!
//! Uploads the build outputs and reads back what the upload recorded. The
//! artifact list always comes from the partial build-info written by this
//! upload, never from earlier uploads of the same build.

use std::path::PathBuf;

use crate::core::bake_config::BakeConfiguration;
use crate::core::build_info::{Artifact, BuildIdentity};
use crate::core::connection::ServerDetails;
use crate::core::gateway::{ArtifactGateway, UploadSpec};
use crate::core::layout::TreeLayout;
use crate::error::{ArtifactError, BakeError};

/// Upload spec for a run: images only and flattened, or the whole deploy tree
pub fn upload_spec(config: &BakeConfiguration, layout: &TreeLayout) -> UploadSpec {
    UploadSpec {
        pattern: layout.artifact_source(&config.run_folder, config.only_images),
        target: config.upload_target(),
        recursive: true,
        include_dirs: true,
        flat: config.only_images,
    }
}

/// Resolve the artifact source directory, failing when it does not exist
pub fn artifact_source(
    config: &BakeConfiguration,
    layout: &TreeLayout,
) -> Result<PathBuf, ArtifactError> {
    let source = layout.artifact_source(&config.run_folder, config.only_images);
    if source.is_dir() {
        Ok(source)
    } else {
        Err(ArtifactError::SourceNotFound { path: source })
    }
}

/// Upload the build outputs and return the deployed artifacts
///
/// An upload that records no artifacts is an error.
pub async fn collect<G: ArtifactGateway>(
    gateway: &G,
    config: &BakeConfiguration,
    layout: &TreeLayout,
    build: &BuildIdentity,
    server: &ServerDetails,
) -> Result<Vec<Artifact>, BakeError> {
    let source = artifact_source(config, layout)?;
    let spec = upload_spec(config, layout);
    tracing::info!("Uploading {} to {}", source.display(), spec.target);

    let summary = gateway
        .upload(server, &spec, build)
        .await
        .map_err(BakeError::Upload)?;
    tracing::debug!(
        "Upload finished: {} files, {} folders",
        summary.files,
        summary.folders
    );

    let artifacts = gateway
        .deployed_artifacts(&summary.partial)
        .await
        .map_err(ArtifactError::Partial)?;
    if artifacts.is_empty() {
        return Err(ArtifactError::NothingDeployed {
            build_name: build.name.clone(),
            build_number: build.number.clone(),
        }
        .into());
    }

    Ok(artifacts)
}
