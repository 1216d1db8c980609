//! User-friendly diagnostic messages.
//!
//! Errors are printed with their full context chain plus, where the cause
//! is recognizable, a concrete next step.

use std::fmt;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when meta.json is missing.
    pub const NO_META: &str =
        "Run from Stargate's `src/` directory or pass `--source-dir <DIR>`";

    /// Suggestion when meta.json cannot be interpreted.
    pub const BAD_META: &str =
        "meta.json must contain {\"version\": {\"major\": ..., \"minor\": ...}}";

    /// Suggestion when a host tool is missing or failing.
    pub const CHECK_TOOLS: &str = "Run `stargate-deb doctor` to check the required host tools";

    /// Suggestion when the native build fails.
    pub const BUILD_FAILED: &str =
        "Re-run with `--verbose`, or build with `make` directly to see the failing step";
}

/// An error message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            suggestions: Vec::new(),
        }
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let (error_prefix, help_prefix) = if color {
            ("\x1b[1;31merror\x1b[0m", "\x1b[1;32mhelp\x1b[0m")
        } else {
            ("error", "help")
        };

        output.push_str(&format!("{}: {}\n", error_prefix, self.message));
        for suggestion in &self.suggestions {
            output.push_str(&format!("{}: {}\n", help_prefix, suggestion));
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
