//! Bake invocation configuration
//!
//! One immutable [`BakeConfiguration`] is built per invocation and validated
//! before the pipeline touches anything.

use std::path::PathBuf;

use crate::config::defaults;
use crate::core::build_info::BuildIdentity;
use crate::error::ConfigError;

/// Everything one bake run needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BakeConfiguration {
    /// Folder the build tool runs from
    pub run_folder: PathBuf,
    /// Script sourced before invoking bitbake
    pub build_env: String,
    /// bitbake target, e.g. `core-image-minimal`
    pub target: String,
    /// Wipe build outputs and the build-info cache first
    pub clean: bool,
    /// Run the build tool
    pub build: bool,
    /// Upload artifacts and publish build-info
    pub load: bool,
    /// Scan the published build
    pub scan: bool,
    /// Destination repository
    pub repo: String,
    /// Remote folder name; derived from the build identity when unset
    pub artifact_name: Option<String>,
    /// Build name
    pub build_name: String,
    /// Build number
    pub build_number: String,
    /// Upload only the images subtree, flattened
    pub only_images: bool,
    /// Stored repository connection to use; the default one when unset
    pub server_id: Option<String>,
}

impl BakeConfiguration {
    /// Configuration with the documented defaults for a target
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            run_folder: PathBuf::from("."),
            build_env: defaults::DEFAULT_BUILD_ENV.to_string(),
            target: target.into(),
            clean: true,
            build: true,
            load: true,
            scan: false,
            repo: defaults::DEFAULT_REPO.to_string(),
            artifact_name: None,
            build_name: defaults::DEFAULT_BUILD_NAME.to_string(),
            build_number: defaults::DEFAULT_BUILD_NUMBER.to_string(),
            only_images: true,
            server_id: None,
        }
    }

    /// Check invariants that must hold before any stage runs
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.trim().is_empty() {
            return Err(ConfigError::MissingTarget);
        }

        if self.scan && !self.load {
            return Err(ConfigError::ScanRequiresLoad);
        }

        if !self.run_folder.is_dir() {
            return Err(ConfigError::RunFolderNotFound {
                path: self.run_folder.clone(),
            });
        }

        Ok(())
    }

    /// Remote folder name: `--artifact-name` or `<build-name>:<build-num>`
    pub fn artifact_name(&self) -> String {
        match self.artifact_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{}:{}", self.build_name, self.build_number),
        }
    }

    /// Upload target: `<repo>/<artifact-name>/`
    pub fn upload_target(&self) -> String {
        format!("{}/{}/", self.repo, self.artifact_name())
    }

    /// Build-info key for this run
    pub fn build_identity(&self) -> BuildIdentity {
        BuildIdentity::new(&self.build_name, &self.build_number)
    }
}
