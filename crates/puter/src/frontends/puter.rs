//! Expression-language frontend
//!
//! Parses the Python-like expression language and formats errors and
//! values the way Python would print them.

use crate::ast::Program;
use crate::error::ErrorKind;
use crate::frontend::{LanguageFrontend, ParseError};
use crate::{parser, EvalError, Value};

/// Frontend for the Power Puter expression language.
///
/// # Example
///
/// ```
/// use puter::frontends::PuterFrontend;
/// use puter::LanguageFrontend;
///
/// let frontend = PuterFrontend::new();
/// let program = frontend.parse("a = 1\na + 1").unwrap();
/// assert_eq!(program.body.len(), 2);
/// assert_eq!(frontend.name(), "Puter");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PuterFrontend;

impl PuterFrontend {
    /// Create a new frontend.
    pub fn new() -> Self {
        Self
    }
}

impl LanguageFrontend for PuterFrontend {
    fn parse(&self, source: &str) -> Result<Program, ParseError> {
        parser::parse_program(source)
    }

    fn format_error(&self, error: &EvalError, source: &str) -> String {
        match error {
            EvalError::Parse(err) => format_parse_error(err, source),
            other => format!("{}: {}", python_name(other), other),
        }
    }

    fn format_value(&self, value: &Value, depth: usize) -> String {
        format_value_python(value, depth, 0)
    }

    fn name(&self) -> &str {
        "Puter"
    }
}

/// Exception name Python would raise for this error.
fn python_name(error: &EvalError) -> &'static str {
    match error {
        EvalError::DivisionByZero => "ZeroDivisionError",
        EvalError::IntegerOverflow => "OverflowError",
        EvalError::IndexOutOfBounds { .. } => "IndexError",
        EvalError::AttributeNotFound { .. } => "AttributeError",
        _ => match error.kind() {
            ErrorKind::Syntax => "SyntaxError",
            ErrorKind::Name => "NameError",
            ErrorKind::Type => "TypeError",
            ErrorKind::OperatorUnsupported => "NotImplementedError",
            ErrorKind::Lookup => "LookupError",
            ErrorKind::Value => "ValueError",
        },
    }
}

/// Message, then the offending line with a caret under the column.
fn format_parse_error(err: &ParseError, source: &str) -> String {
    let mut out = format!("SyntaxError: {}", err.message);
    let Some(loc) = err.location else {
        return out;
    };
    if let Some(line) = source.lines().nth(loc.line.saturating_sub(1)) {
        out.push_str(&format!("\n  line {}\n    {}\n    ", loc.line, line));
        out.push_str(&" ".repeat(loc.column.saturating_sub(1)));
        out.push('^');
    }
    out
}

/// Python `repr` with containers nested deeper than `max_depth` elided.
fn format_value_python(value: &Value, max_depth: usize, current_depth: usize) -> String {
    let nested = matches!(value, Value::List(_) | Value::Tuple(_) | Value::Dict(_));
    if nested && max_depth > 0 && current_depth >= max_depth {
        return "...".to_string();
    }

    let inner = |v: &Value| format_value_python(v, max_depth, current_depth + 1);
    match value {
        Value::List(items) => {
            let parts: Vec<_> = items.iter().map(inner).collect();
            format!("[{}]", parts.join(", "))
        }
        Value::Tuple(items) if items.len() == 1 => format!("({},)", inner(&items[0])),
        Value::Tuple(items) => {
            let parts: Vec<_> = items.iter().map(inner).collect();
            format!("({})", parts.join(", "))
        }
        Value::Dict(map) => {
            let parts: Vec<_> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", Value::string(k.as_str()).repr(), inner(v)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
        other => other.repr(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_points_at_column() {
        let frontend = PuterFrontend::new();
        let source = "a = 1\nb = (1 +";
        let err = EvalError::from(frontend.parse(source).unwrap_err());
        let text = frontend.format_error(&err, source);
        assert!(text.starts_with("SyntaxError: "), "{}", text);
        assert!(text.contains("b = (1 +"), "{}", text);
        assert!(text.ends_with('^'), "{}", text);
    }

    #[test]
    fn test_runtime_error_names() {
        let frontend = PuterFrontend::new();
        assert_eq!(
            frontend.format_error(&EvalError::DivisionByZero, ""),
            "ZeroDivisionError: division by zero"
        );
        let err = EvalError::UndefinedVariable { name: "x".into() };
        assert_eq!(frontend.format_error(&err, ""), "NameError: Name not found: x");
    }

    #[test]
    fn test_format_value_depth() {
        let frontend = PuterFrontend::new();
        let nested = Value::list(vec![
            Value::Int(1),
            Value::list(vec![Value::list(vec![Value::Int(2)])]),
        ]);
        assert_eq!(frontend.format_value(&nested, 0), "[1, [[2]]]");
        assert_eq!(frontend.format_value(&nested, 2), "[1, [...]]");
        assert_eq!(frontend.format_value(&Value::string("a"), 1), "'a'");
    }
}
