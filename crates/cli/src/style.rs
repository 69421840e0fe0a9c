//! Shared styling utilities for CLI output.

use console::Style;

use terminal_sync_core::sync::SyncOutcome;

/// Create a success-styled string (green with checkmark).
pub fn success(msg: &str) -> String {
    let style = Style::new().green();
    format!("{} {}", style.apply_to("✓"), msg)
}

/// Create an error-styled string (red with cross).
pub fn error(msg: &str) -> String {
    let style = Style::new().red();
    format!("{} {}", style.apply_to("✗"), msg)
}

/// Create a warning-styled string (yellow).
pub fn warn(msg: &str) -> String {
    let style = Style::new().yellow();
    format!("{} {}", style.apply_to("⚠"), msg)
}

/// Create a header-styled string (bold).
pub fn header(msg: &str) -> String {
    Style::new().bold().apply_to(msg).to_string()
}

/// Create a dim-styled string.
pub fn dim(msg: &str) -> String {
    Style::new().dim().apply_to(msg).to_string()
}

/// One-line description of a sync outcome.
pub fn outcome(outcome: &SyncOutcome) -> String {
    match outcome {
        SyncOutcome::NoChange => dim("no change: external text already matches"),
        SyncOutcome::Rejected(e) => error(&format!("rejected: {e}")),
        SyncOutcome::Accepted => warn("accepted: external edit kept as written"),
        SyncOutcome::Synchronized => success("synchronized: canonical text written back"),
    }
}
