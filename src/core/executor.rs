//! Build tool invocation
//!
//! The build stage runs `source <env> && bitbake <target>` in a shell. The
//! shell is reached through [`CommandExecutor`] so the pipeline can run
//! against a fake in tests.

use std::path::PathBuf;

use crate::core::bake_config::BakeConfiguration;
use crate::error::BuildError;

/// A shell script to run in a working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// Directory the shell starts in
    pub working_dir: PathBuf,
    /// Script passed to the shell
    pub script: String,
}

impl ShellCommand {
    /// The bitbake invocation for a bake configuration
    pub fn bitbake(config: &BakeConfiguration) -> Self {
        Self {
            working_dir: config.run_folder.clone(),
            script: format!("source {} && bitbake {}", config.build_env, config.target),
        }
    }
}

/// How a finished command exited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
}

impl CommandStatus {
    /// Status for a given exit code
    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs shell commands to completion
///
/// Implementations block until the command exits and let it write straight
/// to the caller's stdout/stderr.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor {
    /// Run a command and report how it exited
    async fn execute(&self, command: &ShellCommand) -> Result<CommandStatus, BuildError>;
}
