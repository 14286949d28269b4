//! Test utility functions for ci-runner

#![allow(dead_code)]

use async_trait::async_trait;
use ci_runner::core::{RunConfig, RunReport, RunStatus, StepRegistry, StepStatus};
use ci_runner::execution::{PipelineRunner, RunEvent};
use ci_runner::process::{CommandExecutor, CommandOutput, ExecutorError};
use std::sync::{Arc, Mutex};

/// Mock executor that records every command and answers from a script
#[derive(Default)]
pub struct MockExecutor {
    /// (fragment, exit code); the first fragment contained in the command wins
    exit_codes: Vec<(String, i32)>,
    /// Fragments whose commands fail to launch
    unlaunchable: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands containing `fragment` exit with `code`
    pub fn exits(mut self, fragment: &str, code: i32) -> Self {
        self.exit_codes.push((fragment.to_string(), code));
        self
    }

    /// Commands containing `fragment` cannot be launched
    pub fn unlaunchable(mut self, fragment: &str) -> Self {
        self.unlaunchable.push(fragment.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn run(&self, command: &str) -> Result<CommandOutput, ExecutorError> {
        self.calls.lock().unwrap().push(command.to_string());

        if self.unlaunchable.iter().any(|f| command.contains(f.as_str())) {
            return Err(ExecutorError::Launch {
                command: command.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
            });
        }

        let code = self
            .exit_codes
            .iter()
            .find(|(fragment, _)| command.contains(fragment.as_str()))
            .map(|(_, code)| *code)
            .unwrap_or(0);

        Ok(CommandOutput::new(Some(code), format!("output of {}\n", command)))
    }
}

/// Test result from running the standard registry
pub struct RunTestResult {
    pub report: RunReport,
    pub calls: Vec<String>,
    pub events: Vec<RunEvent>,
}

impl RunTestResult {
    /// Names of steps that reached the executor, in order
    pub fn executed_steps(&self) -> Vec<String> {
        self.report
            .outcomes
            .iter()
            .filter(|o| o.was_executed())
            .map(|o| o.step.clone())
            .collect()
    }

    pub fn status_of(&self, step: &str) -> StepStatus {
        self.report
            .outcome(step)
            .unwrap_or_else(|| panic!("no outcome for step {}", step))
            .status
    }

    /// Event labels in console order, e.g. "BYPASS RECTOR"
    pub fn status_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                RunEvent::StepIgnored { title, .. } => Some(format!("IGNORE {}", title)),
                RunEvent::StepBypassed { title, .. } => Some(format!("BYPASS {}", title)),
                RunEvent::StepStarted { title, .. } => Some(format!("START {}", title)),
                RunEvent::StepEnded { title, .. } => Some(format!("END {}", title)),
                _ => None,
            })
            .collect()
    }
}

/// Parse the config and run the standard registry against a mock executor
pub async fn run_standard(yaml: &str, no_mods: bool, executor: MockExecutor) -> RunTestResult {
    let config = RunConfig::from_yaml(yaml)
        .expect("config should parse")
        .with_no_mods(no_mods);
    run_with_config(&config, executor).await
}

pub async fn run_with_config(config: &RunConfig, executor: MockExecutor) -> RunTestResult {
    let executor = Arc::new(executor);
    let events = Arc::new(Mutex::new(Vec::new()));

    let mut runner = PipelineRunner::new(executor.clone());
    let sink = events.clone();
    runner.add_event_handler(move |event| sink.lock().unwrap().push(event.clone()));

    let report = runner.run(&StepRegistry::standard(), config).await;
    let events = events.lock().unwrap().clone();

    RunTestResult {
        report,
        calls: executor.calls(),
        events,
    }
}

pub fn assert_run_succeeded(result: &RunTestResult) {
    assert_eq!(
        result.report.status,
        RunStatus::Succeeded,
        "expected success, outcomes: {:?}",
        result.report.outcomes
    );
    assert_eq!(result.report.exit_code(), 0);
}

pub fn assert_run_failed(result: &RunTestResult, exit_code: i32) {
    assert_eq!(result.report.status, RunStatus::Failed);
    assert_eq!(result.report.exit_code(), exit_code);
}

pub fn assert_execution_order(result: &RunTestResult, expected: &[&str]) {
    assert_eq!(
        result.executed_steps(),
        expected.iter().map(|s| s.to_string()).collect::<Vec<_>>()
    );
}
