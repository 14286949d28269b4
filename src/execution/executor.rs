//! Step executor - runs the command lines of one step

use crate::{
    core::{RunConfig, Step, StepOutcome},
    process::CommandExecutor,
};
use chrono::Utc;
use tracing::{debug, info};

/// Executes a single step through a [`CommandExecutor`]
pub struct StepExecutor<E> {
    executor: E,
}

impl<E: CommandExecutor> StepExecutor<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Run every command of the step in order and classify the result.
    ///
    /// Output of all commands is concatenated. The first command that exits
    /// non-zero, or cannot be launched, ends the step as failed.
    pub async fn execute(&self, step: &Step, config: &RunConfig) -> StepOutcome {
        let started_at = Utc::now();
        let mut output = Vec::new();
        let mut exit_code = Some(0);

        for command in step.render_commands(config.vendor_root()) {
            info!("Executing step {}: {}", step.name, command);

            match self.executor.run(&command).await {
                Ok(result) => {
                    output.extend_from_slice(&result.output);
                    exit_code = result.exit_code;
                    if !result.success() {
                        info!("Step {} exited with {:?}", step.name, result.exit_code);
                        break;
                    }
                }
                Err(e) => {
                    info!("Step {} could not run: {}", step.name, e);
                    output.extend_from_slice(format!("{}\n", e).as_bytes());
                    exit_code = None;
                    break;
                }
            }
        }

        debug!("Step {} captured {} bytes", step.name, output.len());
        StepOutcome::executed(step.name.clone(), exit_code, output, started_at)
    }
}
