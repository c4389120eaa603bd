//! # Puter
//!
//! A restricted tree-walking evaluator for a small Python-like expression
//! language, evaluated against the values flowing through a node-based
//! image-generation workflow.
//!
//! Programs are short statement sequences: arithmetic, comparisons,
//! boolean logic, attribute and subscript access on workflow records,
//! f-strings, list comprehensions, builtin calls and assignment. There is
//! no access to an unrestricted host `eval`: every construct has an
//! explicit rule, and anything else is rejected.
//!
//! ## Architecture
//!
//! - **Frontend**: lex and parse source into an [`ast::Program`]
//! - **Evaluator**: walk the tree against an [`Environment`]
//! - **Registries**: fixed builtins, bound methods and special accessors
//! - **Node**: [`PowerPuter`] binds inputs, runs the program and coerces
//!   the result for the host
//!
//! ```
//! use puter::{EvalContext, OutputType, PowerPuter, Value};
//! use puter::value::Map;
//!
//! let node = PowerPuter::new(EvalContext::default());
//! let mut inputs = Map::new();
//! inputs.insert("a".into(), Value::Int(20));
//! let out = node.run("f'{a + 1} steps'", inputs, OutputType::Raw).unwrap();
//! assert_eq!(out, Value::string("21 steps"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod accessors;
pub mod ast;
pub mod builtins;
pub mod change;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod frontend;
pub mod frontends;
mod lexer;
pub mod methods;
pub mod node;
mod parser;
pub mod value;
pub mod workflow;

// Re-export main types
pub use accessors::AccessorRegistry;
pub use change::ChangeTracker;
pub use context::EvalContext;
pub use environment::{Binding, Environment, ScopeGuard};
pub use error::{ErrorKind, EvalError, Result};
pub use eval::{eval_expr, run_program, ControlFlow, Evaluate};
pub use frontend::{LanguageFrontend, ParseError, SourceLocation};
pub use node::{coerce_output, OutputType, PowerPuter};
pub use value::{HostHandle, Value};
pub use workflow::{Prompt, PromptError};

/// Parse source text into a program.
///
/// # Errors
///
/// Returns `ParseError` for malformed source.
pub fn parse(source: &str) -> std::result::Result<ast::Program, ParseError> {
    parser::parse_program(source)
}

/// Parse and run `source` in `env`, returning the program's value.
///
/// # Errors
///
/// Parse errors and the first evaluation error.
pub fn eval_source(source: &str, env: &mut Environment, ctx: &EvalContext) -> Result<Value> {
    let program = parse(source)?;
    run_program(&program, env, ctx)
}

/// Puter version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }
}
