//! Shell executor - runs command lines through `sh -c`

use crate::process::{CommandExecutor, CommandOutput, ExecutorError};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Runs command lines through a POSIX shell with stderr folded into stdout
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    /// Path to the shell executable
    shell: String,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::new("sh")
    }
}

impl ShellExecutor {
    /// Create a new shell executor
    ///
    /// # Arguments
    /// * `shell` - Path to a POSIX shell (e.g., "sh", "/bin/bash")
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    /// Calls `<shell> -c '<command>'` and waits for it to exit.
    ///
    /// The whole script runs with stderr redirected into stdout so the
    /// captured text keeps the tool's own interleaving. A non-zero exit is
    /// not an error here; only a shell that cannot be spawned is.
    async fn run(&self, command: &str) -> Result<CommandOutput, ExecutorError> {
        debug!("Spawning {} -c {}", self.shell, command);

        let script = format!("exec 2>&1\n{}", command);
        let output = Command::new(&self.shell)
            .arg("-c")
            .arg(&script)
            .output()
            .await
            .map_err(|source| ExecutorError::Launch {
                command: command.to_string(),
                source,
            })?;

        let exit_code = output.status.code();
        debug!(
            "{} exited with {:?} after {} bytes of output",
            command,
            exit_code,
            output.stdout.len()
        );

        Ok(CommandOutput {
            exit_code,
            output: output.stdout,
        })
    }
}
