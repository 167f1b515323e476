// ABOUTME: Centralized CLI output utilities for consistent user-facing messages
// ABOUTME: Provides standardized formatting for errors, warnings, hints and color detection

use oembed_sdk::OembedError;
use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::constants::env;

/// Whether colored output should be used for stdout
pub fn should_use_color(no_color_flag: bool) -> bool {
    !no_color_flag
        && std::env::var_os(env::NO_COLOR).is_none()
        && std::env::var(env::TERM).unwrap_or_default() != env::DUMB_TERM
        && std::io::stdout().is_terminal()
}

/// Centralized CLI output utilities for consistent formatting
pub struct CliOutput {
    use_color: bool,
}

impl CliOutput {
    /// Create new CLI output utility with TTY detection
    pub fn new() -> Self {
        Self {
            use_color: std::io::stderr().is_terminal(),
        }
    }

    /// Create CLI output utility with explicit color setting
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Display an error message
    pub fn error(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "error:".red().bold(), message);
        } else {
            eprintln!("error: {}", message);
        }
    }

    /// Display a warning message
    pub fn warning(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "warning:".yellow().bold(), message);
        } else {
            eprintln!("warning: {}", message);
        }
    }

    /// Display a hint for resolving the previous message
    pub fn hint(&self, message: &str) {
        if self.use_color {
            eprintln!("{} {}", "hint:".cyan().bold(), message);
        } else {
            eprintln!("hint: {}", message);
        }
    }

    /// Report a failed command with its cause chain and any SDK hint
    pub fn report_error(&self, error: &anyhow::Error) {
        self.error(&format!("{:#}", error));

        if let Some(help) = help_for(error) {
            self.hint(help);
        }
    }
}

impl Default for CliOutput {
    fn default() -> Self {
        Self::new()
    }
}

/// Help text of the first SDK error in the cause chain
pub fn help_for(error: &anyhow::Error) -> Option<&'static str> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<OembedError>())
        .and_then(OembedError::help_text)
}
