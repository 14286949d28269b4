//! Pipeline runner - applies a run config to every registered step

use crate::{
    core::{FailurePolicy, Gate, RunConfig, RunReport, RunStatus, Step, StepOutcome, StepRegistry, StepStatus},
    execution::StepExecutor,
    process::CommandExecutor,
};
use std::sync::Arc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

/// Events that can occur during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunEvent {
    RunStarted {
        run_id: Uuid,
        total_steps: usize,
        no_mods: bool,
    },
    StepIgnored {
        step: String,
        title: String,
    },
    StepBypassed {
        step: String,
        title: String,
    },
    StepStarted {
        step: String,
        title: String,
    },
    StepOutput {
        step: String,
        output: Vec<u8>,
    },
    StepEnded {
        step: String,
        title: String,
        exit_code: Option<i32>,
    },
    RunFinished {
        run_id: Uuid,
        status: RunStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&RunEvent) + Send + Sync>;

/// Runs the registry's steps one at a time, in order
pub struct PipelineRunner<E> {
    executor: StepExecutor<E>,
    event_handlers: Vec<EventHandler>,
}

impl<E: CommandExecutor> PipelineRunner<E> {
    pub fn new(executor: E) -> Self {
        Self {
            executor: StepExecutor::new(executor),
            event_handlers: Vec::new(),
        }
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&RunEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: RunEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute the registry against the config.
    ///
    /// Always returns a report with one outcome per registry step. Under
    /// [`FailurePolicy::Abort`] the first failed step ends the run and the
    /// remaining steps are recorded as skipped without being attempted.
    pub async fn run(&self, registry: &StepRegistry, config: &RunConfig) -> RunReport {
        let mut report = RunReport::new();
        let run_id = report.run_id;

        let span = info_span!("run", run_id = %run_id);
        async {
            info!(
                "Starting run of {} steps (no-mods: {})",
                registry.len(),
                config.no_mods()
            );
            for key in config.flag_keys() {
                if registry.get(key).is_none() {
                    warn!("Config enables unknown step '{}'", key);
                }
            }

            self.emit_event(RunEvent::RunStarted {
                run_id,
                total_steps: registry.len(),
                no_mods: config.no_mods(),
            });

            let mut aborted = false;
            for step in registry.steps() {
                if aborted {
                    report
                        .outcomes
                        .push(StepOutcome::not_run(step.name.clone(), StepStatus::Skipped));
                    continue;
                }

                let outcome = self.run_step(step, config).await;
                if outcome.status == StepStatus::Failed && config.on_failure() == FailurePolicy::Abort {
                    info!("Step {} failed, aborting run", step.name);
                    aborted = true;
                }
                report.outcomes.push(outcome);
            }

            report.finish();
            info!("Run finished: {:?}", report.status);
        }
        .instrument(span)
        .await;

        self.emit_event(RunEvent::RunFinished {
            run_id,
            status: report.status,
        });

        report
    }

    /// Gate, execute and report a single step
    async fn run_step(&self, step: &Step, config: &RunConfig) -> StepOutcome {
        match config.gate(step) {
            Gate::Ignore => {
                info!("Ignoring mutating step {} (no-mods)", step.name);
                self.emit_event(RunEvent::StepIgnored {
                    step: step.name.clone(),
                    title: step.title.clone(),
                });
                StepOutcome::not_run(step.name.clone(), StepStatus::Ignored)
            }
            Gate::Bypass => {
                info!("Bypassing disabled step {}", step.name);
                self.emit_event(RunEvent::StepBypassed {
                    step: step.name.clone(),
                    title: step.title.clone(),
                });
                StepOutcome::not_run(step.name.clone(), StepStatus::Bypassed)
            }
            Gate::Run => {
                self.emit_event(RunEvent::StepStarted {
                    step: step.name.clone(),
                    title: step.title.clone(),
                });

                let outcome = self.executor.execute(step, config).await;

                self.emit_event(RunEvent::StepOutput {
                    step: step.name.clone(),
                    output: outcome.output.clone(),
                });
                self.emit_event(RunEvent::StepEnded {
                    step: step.name.clone(),
                    title: step.title.clone(),
                    exit_code: outcome.exit_code,
                });

                outcome
            }
        }
    }
}
