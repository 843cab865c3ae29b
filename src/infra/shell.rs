//! Shell subprocess execution
//!
//! Runs scripts through `bash -c` with inherited stdio so bitbake's own
//! progress output reaches the terminal unchanged.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::core::executor::{CommandExecutor, CommandStatus, ShellCommand};
use crate::error::BuildError;

/// Shell used to source the build environment
const SHELL: &str = "bash";

/// Production [`CommandExecutor`] backed by `bash`
#[derive(Debug, Clone, Default)]
pub struct ShellExecutor;

impl ShellExecutor {
    /// Create a new executor
    pub fn new() -> Self {
        Self
    }

    fn shell_path() -> Result<PathBuf, BuildError> {
        which::which(SHELL).map_err(|_| BuildError::ShellNotFound {
            shell: SHELL.to_string(),
        })
    }
}

impl CommandExecutor for ShellExecutor {
    async fn execute(&self, command: &ShellCommand) -> Result<CommandStatus, BuildError> {
        let shell = Self::shell_path()?;
        debug!(
            "Running '{}' in {} with {}",
            command.script,
            command.working_dir.display(),
            shell.display()
        );

        let status = Command::new(&shell)
            .arg("-c")
            .arg(&command.script)
            .current_dir(&command.working_dir)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| BuildError::SpawnFailed {
                command: command.script.clone(),
                error: e.to_string(),
            })?;

        Ok(CommandStatus { code: status.code() })
    }
}
