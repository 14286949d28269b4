//! External process execution for tool command lines

pub mod shell;

use async_trait::async_trait;
use thiserror::Error;

pub use shell::ShellExecutor;

/// Error types for process execution
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("failed to launch '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// What a finished process left behind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,

    /// Combined stdout and stderr, exactly as the process wrote it
    pub output: Vec<u8>,
}

impl CommandOutput {
    pub fn new(exit_code: Option<i32>, output: impl Into<Vec<u8>>) -> Self {
        Self {
            exit_code,
            output: output.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Trait for running one command line - allows swapping in test doubles
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run the command to completion and capture its output
    async fn run(&self, command: &str) -> Result<CommandOutput, ExecutorError>;
}

#[async_trait]
impl<E: CommandExecutor + ?Sized> CommandExecutor for std::sync::Arc<E> {
    async fn run(&self, command: &str) -> Result<CommandOutput, ExecutorError> {
        (**self).run(command).await
    }
}
