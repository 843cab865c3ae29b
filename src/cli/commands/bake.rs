//! Bake command implementation
//!
//! Implements `yocto-bake bake <target>`: clean, build, upload and publish.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{ArgAction, Args};

use crate::cli::output::{create_upload_bar, status};
use crate::config::defaults;
use crate::core::bake_config::BakeConfiguration;
use crate::core::layout::TreeLayout;
use crate::core::pipeline::Pipeline;
use crate::infra::artifactory::ArtifactoryClient;
use crate::infra::dirs::BakeDirs;
use crate::infra::gateway::ArtifactoryGateway;
use crate::infra::shell::ShellExecutor;

/// Bake options
///
/// Boolean switches take an optional value: `--clean` and `--clean=true`
/// enable, `--clean=false` disables.
#[derive(Args, Debug, Clone)]
pub struct BakeArgs {
    /// Image or recipe to build, e.g. core-image-minimal
    pub target: String,

    /// Root of the Yocto build tree
    #[arg(long, default_value = ".")]
    pub run_folder: PathBuf,

    /// Script sourced before running bitbake
    #[arg(long, default_value = defaults::DEFAULT_BUILD_ENV)]
    pub build_env: String,

    /// Wipe tmp output and lock files before building, and cached build-info before loading
    #[arg(long, default_value_t = true, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", action = ArgAction::Set)]
    pub clean: bool,

    /// Run bitbake
    #[arg(long, default_value_t = true, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", action = ArgAction::Set)]
    pub build: bool,

    /// Upload artifacts and publish build-info
    #[arg(long, default_value_t = true, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", action = ArgAction::Set)]
    pub load: bool,

    /// Scan the published build (requires --load)
    #[arg(long, default_value_t = false, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", action = ArgAction::Set)]
    pub scan: bool,

    /// Destination repository
    #[arg(long, default_value = defaults::DEFAULT_REPO)]
    pub repo: String,

    /// Remote folder name [default: <build-name>:<build-num>]
    #[arg(long)]
    pub artifact_name: Option<String>,

    /// Build name recorded in build-info
    #[arg(long, default_value = defaults::DEFAULT_BUILD_NAME)]
    pub build_name: String,

    /// Build number recorded in build-info
    #[arg(long = "build-num", default_value = defaults::DEFAULT_BUILD_NUMBER)]
    pub build_number: String,

    /// Upload only the images directory, flattened
    #[arg(long, default_value_t = true, num_args = 0..=1, require_equals = true,
          default_missing_value = "true", action = ArgAction::Set)]
    pub only_images: bool,

    /// Stored Artifactory server to use [default: the default server]
    #[arg(long = "art-id")]
    pub server_id: Option<String>,
}

impl BakeArgs {
    /// Turn the flags into a pipeline configuration
    pub fn to_config(&self) -> BakeConfiguration {
        BakeConfiguration {
            run_folder: self.run_folder.clone(),
            build_env: self.build_env.clone(),
            target: self.target.clone(),
            clean: self.clean,
            build: self.build,
            load: self.load,
            scan: self.scan,
            repo: self.repo.clone(),
            artifact_name: self.artifact_name.clone().filter(|name| !name.is_empty()),
            build_name: self.build_name.clone(),
            build_number: self.build_number.clone(),
            only_images: self.only_images,
            server_id: self.server_id.clone().filter(|id| !id.is_empty()),
        }
    }
}

/// Execute the bake command
pub async fn execute(args: BakeArgs, quiet: bool) -> Result<()> {
    let config = args.to_config();

    let bar = create_upload_bar(quiet);
    let progress = bar.clone();
    let client = ArtifactoryClient::new().with_progress(Arc::new(move |done, total| {
        progress.set_length(total);
        progress.set_position(done);
    }));

    let gateway = ArtifactoryGateway::new(BakeDirs::new(), client);
    let pipeline = Pipeline::new(TreeLayout::default(), gateway, ShellExecutor::new());

    let result = pipeline.run(&config).await;
    bar.finish_and_clear();
    result?;

    println!("{} Bake of '{}' finished", status::SUCCESS, config.target);
    Ok(())
}
