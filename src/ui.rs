//! Centralized console output helpers.
//!
//! Everything here writes to stderr so that stdout stays free for command
//! output such as versions and JSON. Info and success lines honour quiet mode.

use colored::Colorize;

/// Check if quiet mode is enabled via the `AGBUILD_QUIET` environment variable
pub fn is_quiet() -> bool {
    std::env::var("AGBUILD_QUIET")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Progress line, e.g. `-- Building version 1.2.0b20240101`
pub fn info(message: &str) {
    if !is_quiet() {
        eprintln!("{} {}", "--".cyan(), message);
    }
}

/// Non-fatal condition worth mentioning, such as a skipped hook
pub fn notice(message: &str) {
    eprintln!("{} {}", "→".blue(), message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub fn success(message: &str) {
    if !is_quiet() {
        eprintln!("{} {}", "✓".green(), message);
    }
}

/// Color scheme for status-related text output
pub mod colors {
    use colored::{ColoredString, Colorize};

    pub fn success(text: &str) -> ColoredString {
        text.green()
    }

    pub fn error(text: &str) -> ColoredString {
        text.red()
    }

    /// Cyan for identifiers (package names, paths)
    pub fn identifier(text: &str) -> ColoredString {
        text.cyan()
    }
}
