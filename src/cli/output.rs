//! CLI output formatting
//!
//! The `BYPASS` / `IGNORE` / `START` / `END` lines are what CI logs and
//! scripts grep for, so their wording stays fixed: a blank line, the label,
//! a space, the step title.

use crate::{
    core::{RunReport, StepStatus},
    execution::RunEvent,
};
use console::{Emoji, StyledObject};
use std::borrow::Cow;

// Re-export style
pub use console::style;

pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");

/// Bytes to write to stdout for an event, if it has a console form.
///
/// Step output is handed back untouched, whatever its encoding.
pub fn render_event(event: &RunEvent) -> Option<Cow<'_, [u8]>> {
    match event {
        RunEvent::StepIgnored { title, .. } => {
            Some(status_line(style(format!("IGNORE {}", title)).red().bold()))
        }
        RunEvent::StepBypassed { title, .. } => {
            Some(status_line(style(format!("BYPASS {}", title)).red().bold()))
        }
        RunEvent::StepStarted { title, .. } => {
            Some(status_line(style(format!("START {}", title)).green()))
        }
        RunEvent::StepOutput { output, .. } => Some(Cow::Borrowed(output.as_slice())),
        RunEvent::StepEnded { title, .. } => {
            Some(status_line(style(format!("END {}", title)).green()))
        }
        RunEvent::RunStarted { .. } | RunEvent::RunFinished { .. } => None,
    }
}

fn status_line(label: StyledObject<String>) -> Cow<'static, [u8]> {
    Cow::Owned(format!("\n{}\n", label).into_bytes())
}

/// One-line summary of a finished run
pub fn format_summary(report: &RunReport) -> String {
    let counts = format!(
        "{} completed, {} failed, {} bypassed, {} ignored, {} skipped",
        report.count(StepStatus::Completed),
        report.count(StepStatus::Failed),
        report.count(StepStatus::Bypassed),
        report.count(StepStatus::Ignored),
        report.count(StepStatus::Skipped),
    );

    match report.first_failure() {
        None => format!("{}{} ({})", CHECK, style("QA run passed").green(), counts),
        Some(failed) => format!(
            "{}{} at {} ({})",
            CROSS,
            style("QA run failed").red(),
            style(&failed.step).bold(),
            counts
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StepOutcome;
    use chrono::Utc;
    use uuid::Uuid;

    fn plain() {
        console::set_colors_enabled(false);
    }

    #[test]
    fn test_status_lines() {
        plain();
        let bypass = RunEvent::StepBypassed {
            step: "rector".to_string(),
            title: "RECTOR".to_string(),
        };
        let ignore = RunEvent::StepIgnored {
            step: "code-style-fixer".to_string(),
            title: "PHP-CS-FIXER".to_string(),
        };
        let start = RunEvent::StepStarted {
            step: "unit-tests".to_string(),
            title: "PHPUNIT".to_string(),
        };
        let end = RunEvent::StepEnded {
            step: "unit-tests".to_string(),
            title: "PHPUNIT".to_string(),
            exit_code: Some(1),
        };

        assert_eq!(render_event(&bypass).unwrap().as_ref(), b"\nBYPASS RECTOR\n");
        assert_eq!(render_event(&ignore).unwrap().as_ref(), b"\nIGNORE PHP-CS-FIXER\n");
        assert_eq!(render_event(&start).unwrap().as_ref(), b"\nSTART PHPUNIT\n");
        assert_eq!(render_event(&end).unwrap().as_ref(), b"\nEND PHPUNIT\n");
    }

    #[test]
    fn test_output_is_passed_through_verbatim() {
        let event = RunEvent::StepOutput {
            step: "unit-tests".to_string(),
            output: b"OK (3 tests)\n\x1b[32mgr\xfcn\x1b[0m".to_vec(),
        };
        assert_eq!(
            render_event(&event).unwrap().as_ref(),
            b"OK (3 tests)\n\x1b[32mgr\xfcn\x1b[0m"
        );
    }

    #[test]
    fn test_run_events_have_no_console_form() {
        let started = RunEvent::RunStarted {
            run_id: Uuid::new_v4(),
            total_steps: 9,
            no_mods: false,
        };
        assert!(render_event(&started).is_none());
    }

    #[test]
    fn test_summary() {
        plain();
        let mut report = RunReport::new();
        report.outcomes.push(StepOutcome::not_run("rector", StepStatus::Ignored));
        report
            .outcomes
            .push(StepOutcome::executed("unit-tests", Some(0), Vec::new(), Utc::now()));
        report.finish();

        let summary = format_summary(&report);
        assert!(summary.contains("QA run passed"));
        assert!(summary.contains("1 completed, 0 failed, 0 bypassed, 1 ignored, 0 skipped"));

        report
            .outcomes
            .push(StepOutcome::executed("psalm", Some(2), Vec::new(), Utc::now()));
        report.finish();
        let summary = format_summary(&report);
        assert!(summary.contains("QA run failed at psalm"));
    }
}
