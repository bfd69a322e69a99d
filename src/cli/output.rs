//! CLI output formatting

use crate::core::{RunStatus, StepName};
use crate::execution::{RunEvent, SkipReason};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "- ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a run status for display
pub fn format_status(status: RunStatus) -> String {
    match status {
        RunStatus::Idle => style("IDLE").dim().to_string(),
        RunStatus::Running => style("RUNNING").yellow().to_string(),
        RunStatus::Completed => style("COMPLETED").green().to_string(),
        RunStatus::Failed => style("FAILED").red().to_string(),
    }
}

fn format_step(step: StepName) -> String {
    style(step.as_str()).bold().to_string()
}

/// Format a run event as a console line
pub fn format_run_event(event: &RunEvent) -> String {
    match event {
        RunEvent::PipelineStarted {
            run_id,
            project,
            active_steps,
        } => format!(
            "{} Run {} for {} ({} active steps)",
            ROCKET,
            style(&run_id.to_string()[..8]).dim(),
            style(project).bold(),
            style(active_steps).cyan()
        ),
        RunEvent::StepStarted { step } => {
            format!("{} Running {}", INFO, format_step(*step))
        }
        RunEvent::StepSkipped { step, reason } => {
            let why = match reason {
                SkipReason::Inactive => "not selected",
                SkipReason::NotImplemented => "not implemented",
            };
            format!("{} Skipping {} ({})", SKIP, format_step(*step), style(why).dim())
        }
        RunEvent::StepCompleted { step } => {
            format!("{} {} completed", CHECK, format_step(*step))
        }
        RunEvent::StepFailed { step, error } => {
            format!("{} {} failed: {}", CROSS, format_step(*step), style(error).red())
        }
        RunEvent::PipelineCompleted { run_id, status } => format!(
            "{} Run {} {}",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            format_status(*status)
        ),
    }
}
