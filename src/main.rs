//! yocto-bake CLI - Bake Yocto images and publish them to Artifactory
//!
//! Entry point for the yocto-bake command-line application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use yocto_bake::cli::output::display_error;
use yocto_bake::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbosity flags
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_directive()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Run the command and handle errors
    match cli.run().await {
        Ok(()) => Ok(()),
        Err(e) => {
            display_error(&e);
            std::process::exit(1);
        }
    }
}
