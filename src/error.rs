//! Error types for yocto-bake
//!
//! Domain-specific error types using thiserror. Each pipeline stage owns one
//! error enum; [`BakeError`] wraps them and names the stage that failed.

use std::path::PathBuf;
use thiserror::Error;

/// Invocation configuration errors, detected before any stage runs
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Target is empty
    #[error("A bake target is required. Examples: core-image-base, core-image-minimal")]
    MissingTarget,

    /// `--scan` without `--load`
    #[error("scanning can only be done after loading the result to Artifactory")]
    ScanRequiresLoad,

    /// Run folder missing
    #[error("run-folder does not exist: {path}")]
    RunFolderNotFound { path: PathBuf },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to remove file
    #[error("Failed to remove file '{path}': {error}")]
    RemoveFile { path: PathBuf, error: String },

    /// Failed to list directory
    #[error("Failed to list directory '{path}': {error}")]
    ReadDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },
}

/// Build tool subprocess errors
#[derive(Error, Debug)]
pub enum BuildError {
    /// Shell used to source the build environment is missing
    #[error("Shell '{shell}' not found in PATH")]
    ShellNotFound { shell: String },

    /// Subprocess could not be started
    #[error("Failed to start '{command}': {error}")]
    SpawnFailed { command: String, error: String },

    /// Subprocess exited unsuccessfully
    #[error("bitbake failed for target '{target}' ({})", describe_exit(.code))]
    ToolFailed { target: String, code: Option<i32> },
}

#[allow(clippy::ref_option)]
fn describe_exit(code: &Option<i32>) -> String {
    code.map_or_else(
        || "terminated by signal".to_string(),
        |code| format!("exit status {code}"),
    )
}

/// Manifest discovery and parsing errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Walk over the images directory failed
    #[error("Failed to search '{path}' for manifest files: {error}")]
    Search { path: PathBuf, error: String },

    /// No manifest file present
    #[error("was unable to locate the manifest file under '{path}'")]
    NotFound { path: PathBuf },

    /// Manifest file unreadable
    #[error("Failed to read manifest '{path}': {error}")]
    Read { path: PathBuf, error: String },
}

/// Repository connection errors
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// No server configured at all
    #[error("artifactory details are not set. please use 'config' command first")]
    NotConfigured,

    /// Requested server id is not stored
    #[error("Artifactory server '{server_id}' is not configured. please use 'config' command first")]
    ServerNotFound { server_id: String },

    /// Store file unreadable
    #[error("Failed to read server configuration '{path}': {error}")]
    Read { path: String, error: String },

    /// Store file malformed
    #[error("Failed to parse server configuration '{path}': {error}")]
    Parse { path: String, error: String },

    /// Store file could not be written
    #[error("Failed to write server configuration '{path}': {error}")]
    Write { path: String, error: String },
}

/// Artifact collection errors
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Source directory missing
    #[error("Artifact directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// Upload finished but no artifacts were recorded
    #[error("No deployed artifacts recorded for build '{build_name}/{build_number}'")]
    NothingDeployed {
        build_name: String,
        build_number: String,
    },

    /// Partial build-info written by the upload could not be read back
    #[error("Failed to read deployed artifacts: {0}")]
    Partial(#[source] GatewayError),
}

/// Errors raised by the artifact repository collaborator
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Network error
    #[error("Network error for '{url}': {error}")]
    Network { url: String, error: String },

    /// Non-success HTTP status
    #[error("Request to '{url}' failed with HTTP {status}: {body}")]
    Http {
        url: String,
        status: u16,
        body: String,
    },

    /// One or more files failed after all retries
    #[error("Failed uploading {failed} of {total} files: {first}")]
    UploadFailed {
        failed: usize,
        total: usize,
        first: String,
    },

    /// Local build-info store failure
    #[error("Build-info store error: {0}")]
    Store(#[from] FilesystemError),

    /// Build-info (de)serialization failure
    #[error("Invalid build-info '{path}': {error}")]
    Json { path: PathBuf, error: String },

    /// Build-info has not been saved locally
    #[error("No saved build-info found at '{path}'")]
    BuildInfoMissing { path: PathBuf },
}

/// Top-level bake error
///
/// Each variant names the stage or operation that failed.
#[derive(Error, Debug)]
pub enum BakeError {
    /// Invalid invocation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Clean stage failure
    #[error("Clean stage failed: {0}")]
    Clean(#[from] FilesystemError),

    /// Build stage failure
    #[error("Build stage failed: {0}")]
    Build(#[from] BuildError),

    /// Connection lookup failure
    #[error("Load stage failed: {0}")]
    Connection(#[from] ConnectionError),

    /// Artifact collection failure
    #[error("Artifact collection failed: {0}")]
    Artifacts(#[from] ArtifactError),

    /// Manifest parsing failure
    #[error("Manifest parsing failed: {0}")]
    Manifest(#[from] ManifestError),

    /// Remote build-info cache clean failure
    #[error("Build-info clean failed: {0}")]
    BuildInfoClean(#[source] GatewayError),

    /// Upload failure
    #[error("Artifact upload failed: {0}")]
    Upload(#[source] GatewayError),

    /// Local build-info save failure
    #[error("Build-info save failed: {0}")]
    BuildInfoSave(#[source] GatewayError),

    /// Build-info publish failure
    #[error("Build-info publish failed: {0}")]
    Publish(#[source] GatewayError),

    /// Scan stage placeholder
    #[error("Scan stage failed: xray scanning is not yet supported")]
    ScanNotSupported,
}
