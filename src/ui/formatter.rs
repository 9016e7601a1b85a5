//! Pure formatting functions for UI output.
//!
//! Messages are built by `format_*` functions, which are testable, and
//! printed by the matching `display_*` functions.

use crate::boundary::BoundaryWarning;
use console::style;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✔").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Checkpoint printed for each bumped file
pub fn format_bump(file: &str, from: &str, to: &str) -> String {
    format!(
        "bumping version in {} from {} to {}",
        file,
        style(from).bold(),
        style(to).bold()
    )
}

/// Checkpoint printed for the resolved version
pub fn format_release(current: &str, next: &str, tag: &str) -> String {
    format!(
        "releasing {} (from {}) as tag {}",
        style(next).bold(),
        current,
        style(tag).cyan()
    )
}

/// Show the command that publishes a release.
pub fn format_publish_instruction(tag: &str) -> String {
    format!(
        "Run `{}` to publish {}",
        style("git push --follow-tags origin HEAD").cyan(),
        tag
    )
}
