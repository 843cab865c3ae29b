//! Bake pipeline orchestration
//!
//! Runs the clean, build, load and scan stages in order, each gated by its
//! flag in [`BakeConfiguration`]. The first failing stage stops the run and
//! its error is returned as-is.
//!
//! # Stages
//!
//! 1. **Clean** - empty bitbake's tmp directory and remove stale lock files
//!    (only when the build stage will run afterwards)
//! 2. **Build** - `source <build-env> && bitbake <target>`
//! 3. **Load** - clear cached build-info, upload artifacts, parse manifests,
//!    assemble and save build-info, publish it
//! 4. **Scan** - not supported yet, always fails

use chrono::Local;
use tracing::{debug, info};

use crate::core::bake_config::BakeConfiguration;
use crate::core::build_info::{self, BuildInfo};
use crate::core::clean::clean_build_tree;
use crate::core::collector;
use crate::core::executor::{CommandExecutor, ShellCommand};
use crate::core::gateway::ArtifactGateway;
use crate::core::layout::TreeLayout;
use crate::core::manifest;
use crate::error::{BakeError, BuildError};

/// The bake pipeline with its collaborators
#[derive(Debug)]
pub struct Pipeline<G, E> {
    layout: TreeLayout,
    gateway: G,
    executor: E,
}

impl<G: ArtifactGateway, E: CommandExecutor> Pipeline<G, E> {
    /// Create a pipeline over a tree layout
    pub fn new(layout: TreeLayout, gateway: G, executor: E) -> Self {
        Self {
            layout,
            gateway,
            executor,
        }
    }

    /// The gateway in use
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The executor in use
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Run every enabled stage
    pub async fn run(&self, config: &BakeConfiguration) -> Result<(), BakeError> {
        config.validate()?;
        let started = build_info::format_started(&Local::now());
        debug!("Bake of '{}' started at {started}", config.target);

        if config.clean && config.build {
            self.clean(config)?;
        } else {
            debug!("Skipping clean stage");
        }

        if config.build {
            self.build(config).await?;
        } else {
            info!("Skipping build stage");
        }

        if config.load {
            self.load(config, &started).await?;
        } else {
            info!("Skipping load stage");
        }

        if config.scan {
            return Err(BakeError::ScanNotSupported);
        }

        Ok(())
    }

    fn clean(&self, config: &BakeConfiguration) -> Result<(), BakeError> {
        info!("Cleaning build tree in {}", config.run_folder.display());
        let result = clean_build_tree(&config.run_folder, &self.layout)?;
        debug!(
            "Removed {} tmp entries and {} lock files",
            result.removed_entries,
            result.removed_locks.len()
        );
        Ok(())
    }

    async fn build(&self, config: &BakeConfiguration) -> Result<(), BakeError> {
        let command = ShellCommand::bitbake(config);
        info!("Building '{}': {}", config.target, command.script);

        let status = self.executor.execute(&command).await?;
        if !status.success() {
            return Err(BuildError::ToolFailed {
                target: config.target.clone(),
                code: status.code,
            }
            .into());
        }

        info!("Build of '{}' finished", config.target);
        Ok(())
    }

    async fn load(&self, config: &BakeConfiguration, started: &str) -> Result<(), BakeError> {
        let server = self
            .gateway
            .resolve_connection(config.server_id.as_deref())?;
        let build = config.build_identity();

        if config.clean {
            info!("Clearing cached build-info for {}/{}", build.name, build.number);
            self.gateway
                .clear_build_info_cache(&build)
                .await
                .map_err(BakeError::BuildInfoClean)?;
        }

        let artifacts = collector::collect(&self.gateway, config, &self.layout, &build, &server).await?;
        let dependencies = manifest::parse_dependencies_from_manifest(config, &self.layout)?;
        let record: BuildInfo = build_info::assemble(config, artifacts, dependencies, started);

        self.gateway
            .save_build_info(&record)
            .await
            .map_err(BakeError::BuildInfoSave)?;
        self.gateway
            .publish_build_info(&server, &build)
            .await
            .map_err(BakeError::Publish)?;

        info!(
            "Published build {}/{} to {}",
            record.name,
            record.number,
            server.base_url()
        );
        Ok(())
    }
}
