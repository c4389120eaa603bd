//! Error types for Puter evaluation

use thiserror::Error;

use crate::eval::ControlFlow;
use crate::frontend::ParseError;
use crate::value::Value;

/// Coarse classification of an [`EvalError`].
///
/// Hosts use this to decide how to present a failure; tests use it to
/// assert the category without matching on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed source, or a builtin called with the wrong argument count
    Syntax,
    /// Identifier or function not present
    Name,
    /// Construct or operand types with no evaluation rule
    Type,
    /// Comparison operator outside the supported set
    OperatorUnsupported,
    /// Attribute/index lookup failure on a non-mapping value
    Lookup,
    /// Runtime value errors (division by zero, failing casts, ...)
    Value,
}

/// Main error type for evaluation.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Source text could not be parsed
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Builtin invoked with an out-of-range argument count
    #[error("Invalid function call: {name} requires {}", arity_text(.min, .max))]
    ArityMismatch {
        /// Function name
        name: String,
        /// Minimum accepted arguments
        min: usize,
        /// Maximum accepted arguments (`None` for unbounded)
        max: Option<usize>,
        /// Arguments supplied
        got: usize,
    },

    /// Identifier not present in the context
    #[error("Name not found: {name}")]
    UndefinedVariable {
        /// Variable name
        name: String,
    },

    /// Call to a name that isn't a registered builtin
    #[error("Function not found: {name}")]
    UndefinedFunction {
        /// Function name
        name: String,
    },

    /// A parsed construct that has no evaluation rule
    #[error("Unsupported construct: {kind}")]
    UnsupportedExpr {
        /// Construct description
        kind: String,
    },

    /// Comparison operator outside ==, !=, <, <=, >, >=, in
    #[error("Operator {op} not supported.")]
    UnsupportedOperator {
        /// Operator name
        op: String,
    },

    /// Binary operator applied to incompatible operands
    #[error("unsupported operand type(s) for {op}: '{left_type}' and '{right_type}'")]
    InvalidBinaryOperands {
        /// The operator
        op: String,
        /// Left operand type
        left_type: String,
        /// Right operand type
        right_type: String,
    },

    /// Unary operator applied to an incompatible operand
    #[error("bad operand type for unary {op}: '{operand_type}'")]
    InvalidUnaryOperand {
        /// The operator
        op: String,
        /// Operand type
        operand_type: String,
    },

    /// Calling something that isn't callable
    #[error("'{type_name}' object is not callable")]
    NotCallable {
        /// Type of the callee
        type_name: String,
    },

    /// Iterating something that isn't iterable
    #[error("'{type_name}' object is not iterable")]
    NotIterable {
        /// Type of the iterated value
        type_name: String,
    },

    /// Comprehension target could not be destructured
    #[error("cannot unpack {got} into {expected} names")]
    UnpackMismatch {
        /// Number of target names
        expected: usize,
        /// What was found instead
        got: String,
    },

    /// Mapping key that isn't a string
    #[error("mapping keys must be str, not '{type_name}'")]
    InvalidKey {
        /// Type of the key
        type_name: String,
    },

    /// Attribute lookup failed on a non-mapping value
    #[error("'{type_name}' object has no attribute '{attr}'")]
    AttributeNotFound {
        /// Requested attribute
        attr: String,
        /// Type of the base value
        type_name: String,
    },

    /// Sequence index out of range
    #[error("index {index} out of range for length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: i64,
        /// Sequence length
        len: usize,
    },

    /// Division or modulo by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Integer result does not fit in 64 bits
    #[error("integer overflow")]
    IntegerOverflow,

    /// A builtin, method or accessor reported a failure
    #[error("{name}: {message}")]
    BuiltinError {
        /// Function name
        name: String,
        /// Error message
        message: String,
    },

    /// Result could not be rendered as JSON
    #[error("cannot serialize value: {0}")]
    Serialization(String),

    /// Non-local control flow (return). Never escapes a program run.
    #[error("control flow outside of a program")]
    ControlFlow(ControlFlow),
}

impl EvalError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Parse(_) | EvalError::ArityMismatch { .. } => ErrorKind::Syntax,
            EvalError::UndefinedVariable { .. } | EvalError::UndefinedFunction { .. } => {
                ErrorKind::Name
            }
            EvalError::UnsupportedExpr { .. }
            | EvalError::InvalidBinaryOperands { .. }
            | EvalError::InvalidUnaryOperand { .. }
            | EvalError::NotCallable { .. }
            | EvalError::NotIterable { .. }
            | EvalError::InvalidKey { .. } => ErrorKind::Type,
            EvalError::UnsupportedOperator { .. } => ErrorKind::OperatorUnsupported,
            EvalError::AttributeNotFound { .. } | EvalError::IndexOutOfBounds { .. } => {
                ErrorKind::Lookup
            }
            EvalError::UnpackMismatch { .. }
            | EvalError::DivisionByZero
            | EvalError::IntegerOverflow
            | EvalError::BuiltinError { .. }
            | EvalError::Serialization(_)
            | EvalError::ControlFlow(_) => ErrorKind::Value,
        }
    }

    /// Shorthand for an operand type error.
    pub(crate) fn operands(op: &str, left: &Value, right: &Value) -> Self {
        EvalError::InvalidBinaryOperands {
            op: op.to_string(),
            left_type: type_name(left).to_string(),
            right_type: type_name(right).to_string(),
        }
    }

    /// Shorthand for a builtin failure.
    pub(crate) fn builtin(name: &str, message: impl Into<String>) -> Self {
        EvalError::BuiltinError {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

fn arity_text(min: &usize, max: &Option<usize>) -> String {
    match *max {
        None => format!("{} or more args", min),
        Some(max) if max == *min => format!("{} args", min),
        Some(max) => format!("{} to {} args", min, max),
    }
}

/// Result type alias for evaluation.
pub type Result<T> = std::result::Result<T, EvalError>;

/// Get the user-facing type name of a value.
pub fn type_name(value: &Value) -> &str {
    match value {
        Value::None => "NoneType",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::Str(_) => "str",
        Value::List(_) => "list",
        Value::Tuple(_) => "tuple",
        Value::Dict(_) => "dict",
        Value::Opaque(handle) => handle.type_name(),
        Value::Method(_) => "builtin_function_or_method",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message_unbounded() {
        let err = EvalError::ArityMismatch {
            name: "min".to_string(),
            min: 2,
            max: None,
            got: 1,
        };
        assert_eq!(
            err.to_string(),
            "Invalid function call: min requires 2 or more args"
        );
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn test_arity_message_range() {
        let err = EvalError::ArityMismatch {
            name: "round".to_string(),
            min: 1,
            max: Some(2),
            got: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid function call: round requires 1 to 2 args"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(
            EvalError::UndefinedVariable { name: "x".into() }.kind(),
            ErrorKind::Name
        );
        assert_eq!(
            EvalError::UnsupportedOperator { op: "Is".into() }.kind(),
            ErrorKind::OperatorUnsupported
        );
        assert_eq!(EvalError::DivisionByZero.kind(), ErrorKind::Value);
    }
}
