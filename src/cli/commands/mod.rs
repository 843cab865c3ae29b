//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod bake;
pub mod config;

use anyhow::Result;
use clap::Subcommand;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a Yocto target and publish the result to Artifactory
    #[command(visible_alias = "build")]
    Bake(bake::BakeArgs),

    /// Store Artifactory connection details
    #[command(visible_alias = "conf")]
    Config(config::ConfigArgs),
}

impl Commands {
    /// Execute the command
    pub async fn run(self, quiet: bool) -> Result<()> {
        match self {
            Self::Bake(args) => bake::execute(args, quiet).await,
            Self::Config(args) => config::execute(args).await,
        }
    }
}
