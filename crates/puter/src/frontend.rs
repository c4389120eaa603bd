//! Language frontend trait
//!
//! The frontend turns source text into a [`Program`] and presents
//! errors and values back to the user. The evaluator core never sees
//! source text.
//!
//! ```text
//! Source Code → [Frontend] → Program → [Evaluator] → Value
//! ```

use crate::ast::Program;
use crate::{EvalError, Value};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// ERROR TYPES
// ═══════════════════════════════════════════════════════════════════════

/// Error that occurred during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// Human-readable error message
    pub message: String,

    /// Optional source location
    pub location: Option<SourceLocation>,

    /// The offending source fragment
    pub snippet: Option<String>,
}

impl ParseError {
    /// Create a new parse error with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            snippet: None,
        }
    }

    /// Add location information to the error.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Add the offending fragment.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Syntax error: {}", self.message)?;
        if let Some(snippet) = &self.snippet {
            write!(f, " near `{}`", snippet)?;
        }
        if let Some(loc) = &self.location {
            write!(f, " (line {}, column {})", loc.line, loc.column)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Source code location for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-indexed)
    pub line: usize,

    /// Column number (1-indexed, in characters)
    pub column: usize,
}

impl SourceLocation {
    /// Create a new source location.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// LANGUAGE FRONTEND TRAIT
// ═══════════════════════════════════════════════════════════════════════

/// Language frontend interface.
///
/// The frontend is responsible for:
/// - **Parsing:** Convert source text to a [`Program`]
/// - **Error formatting:** Present errors with source context
/// - **Value formatting:** Display values in the language's syntax
pub trait LanguageFrontend: Send + Sync {
    /// Parse source code into a program.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the source cannot be parsed.
    fn parse(&self, source: &str) -> Result<Program, ParseError>;

    /// Format an evaluation error for display, using `source` for context.
    fn format_error(&self, error: &EvalError, source: &str) -> String;

    /// Format a value, eliding containers nested deeper than `depth`
    /// (0 = unlimited).
    fn format_value(&self, value: &Value, depth: usize) -> String;

    /// Return the name of this language frontend.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_creation() {
        let err = ParseError::new("unexpected token");
        assert_eq!(err.message, "unexpected token");
        assert!(err.location.is_none());
        assert!(err.snippet.is_none());
    }

    #[test]
    fn test_parse_error_with_location() {
        let err = ParseError::new("unexpected token").with_location(SourceLocation::new(10, 5));
        assert_eq!(err.location.unwrap().line, 10);
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError::new("unexpected token")
            .with_snippet(")")
            .with_location(SourceLocation::new(2, 7));
        let display = format!("{}", err);
        assert!(display.contains("Syntax error"));
        assert!(display.contains("unexpected token"));
        assert!(display.contains("`)`"));
        assert!(display.contains("line 2, column 7"));
    }
}
