//! User interface module - checkpoints and formatting.
//!
//! Separates concerns:
//! - `formatter` - Message formatting and raw printing
//! - This module - [Reporter], which applies the `silent` setting

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_boundary_warning, display_error, display_status, display_success, format_bump,
    format_publish_instruction, format_release,
};

use crate::boundary::BoundaryWarning;

/// Prints operator-facing checkpoints unless running silently.
///
/// Errors are always printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    silent: bool,
}

impl Reporter {
    pub fn new(silent: bool) -> Self {
        Reporter { silent }
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// A completed step
    pub fn checkpoint(&self, message: &str) {
        if !self.silent {
            display_success(message);
        }
    }

    /// An informational line
    pub fn status(&self, message: &str) {
        if !self.silent {
            display_status(message);
        }
    }

    pub fn warning(&self, warning: &BoundaryWarning) {
        if !self.silent {
            display_boundary_warning(warning);
        }
    }

    pub fn error(&self, message: &str) {
        display_error(message);
    }
}
