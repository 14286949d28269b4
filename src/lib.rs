//! ci-runner - runs a project's QA tools as configured in ci-runner.config.yaml

pub mod cli;
pub mod core;
pub mod execution;
pub mod process;

// Re-export commonly used types
pub use crate::core::{ConfigError, ConfigLocator, RunConfig, RunReport, Step, StepOutcome, StepRegistry, StepStatus};
pub use crate::execution::{PipelineRunner, RunEvent};
pub use crate::process::{CommandExecutor, CommandOutput, ExecutorError, ShellExecutor};
