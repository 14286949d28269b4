//! Step outcomes and run results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;

/// Overall run status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    /// Steps are still being processed
    Running,
    /// Every executed step exited 0
    Succeeded,
    /// At least one executed step failed
    Failed,
}

/// Terminal status of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// Never reached because an earlier step aborted the run
    Skipped,
    /// Disabled by config
    Bypassed,
    /// Mutating step during a no-mods run
    Ignored,
    Completed,
    Failed,
}

/// Result of attempting one step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Step name
    pub step: String,

    pub status: StepStatus,

    /// Process exit code; `None` if nothing ran, the launch failed, or a signal killed it
    pub exit_code: Option<i32>,

    /// Captured combined output; written to reports as lossy UTF-8 text
    #[serde(with = "lossy_text")]
    pub output: Vec<u8>,

    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl StepOutcome {
    /// Outcome for a step that was not executed
    pub fn not_run(step: impl Into<String>, status: StepStatus) -> Self {
        Self {
            step: step.into(),
            status,
            exit_code: None,
            output: Vec::new(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Outcome for an executed step, classified by its exit code
    pub fn executed(
        step: impl Into<String>,
        exit_code: Option<i32>,
        output: Vec<u8>,
        started_at: DateTime<Utc>,
    ) -> Self {
        let status = if exit_code == Some(0) {
            StepStatus::Completed
        } else {
            StepStatus::Failed
        };

        Self {
            step: step.into(),
            status,
            exit_code,
            output,
            started_at: Some(started_at),
            finished_at: Some(Utc::now()),
        }
    }

    /// Whether a process was actually attempted for this step
    pub fn was_executed(&self) -> bool {
        matches!(self.status, StepStatus::Completed | StepStatus::Failed)
    }

    /// Captured output as text, with invalid UTF-8 replaced
    pub fn output_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}

mod lossy_text {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&String::from_utf8_lossy(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        String::deserialize(deserializer).map(String::into_bytes)
    }
}

/// Full record of one run, one outcome per registry step in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub status: RunStatus,
    pub outcomes: Vec<StepOutcome>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunReport {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            status: RunStatus::Running,
            outcomes: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Record the final status
    pub fn finish(&mut self) {
        self.status = if self.first_failure().is_some() {
            RunStatus::Failed
        } else {
            RunStatus::Succeeded
        };
        self.finished_at = Some(Utc::now());
    }

    pub fn is_success(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    /// The earliest failed step, if any
    pub fn first_failure(&self) -> Option<&StepOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.status == StepStatus::Failed)
    }

    /// Outcome of the named step
    pub fn outcome(&self, step: &str) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.step == step)
    }

    /// Process exit code: 0 on success, otherwise the first failed step's
    /// code, or 1 if that step has none
    pub fn exit_code(&self) -> i32 {
        match self.first_failure() {
            None => 0,
            Some(failed) => match failed.exit_code {
                Some(code) if code != 0 => code,
                _ => 1,
            },
        }
    }

    /// Count outcomes with the given status
    pub fn count(&self, status: StepStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }
}

impl Default for RunReport {
    fn default() -> Self {
        Self::new()
    }
}
