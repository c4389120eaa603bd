//! Host-facing entry point: the Power Puter node
//!
//! The host hands over the program text, the node's connected inputs by
//! name and an output selector. The program runs in a fresh environment
//! seeded with the inputs, and its result is coerced to the selected type.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::builtins::{to_float, to_int};
use crate::change::ChangeTracker;
use crate::eval::run_program;
use crate::frontend::LanguageFrontend;
use crate::frontends::PuterFrontend;
use crate::value::Map;
use crate::{Environment, EvalContext, EvalError, Value};

/// Output type selected on the node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputType {
    /// Text; lists and dicts become indented JSON
    #[default]
    Raw,
    /// `int(result)`
    Int,
    /// `float(result)`
    Float,
    /// `bool(result)`
    Bool,
}

impl FromStr for OutputType {
    type Err = Infallible;

    /// Unrecognised selectors (`STRING`, `*`, ...) mean raw output.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_uppercase().as_str() {
            "INT" => OutputType::Int,
            "FLOAT" => OutputType::Float,
            "BOOL" | "BOOLEAN" => OutputType::Bool,
            _ => OutputType::Raw,
        })
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputType::Raw => "STRING",
            OutputType::Int => "INT",
            OutputType::Float => "FLOAT",
            OutputType::Bool => "BOOL",
        })
    }
}

/// Coerce a program result to the selected output type.
///
/// `None` passes through unchanged whatever the selector.
///
/// # Errors
///
/// Cast failures (`int('abc')`) and unserializable containers.
pub fn coerce_output(value: Value, output: OutputType) -> Result<Value, EvalError> {
    if value.is_none() {
        return Ok(value);
    }
    match output {
        OutputType::Int => to_int(&value),
        OutputType::Float => to_float(&value),
        OutputType::Bool => Ok(Value::Bool(value.is_truthy())),
        OutputType::Raw => match &value {
            Value::List(_) | Value::Dict(_) => Ok(Value::string(value.to_json_pretty()?)),
            Value::Str(_) => Ok(value),
            other => Ok(Value::string(other.to_string())),
        },
    }
}

/// The expression-evaluator node.
#[derive(Debug, Clone, Default)]
pub struct PowerPuter {
    frontend: PuterFrontend,
    ctx: EvalContext,
}

impl PowerPuter {
    /// A node evaluating against `ctx`.
    pub fn new(ctx: EvalContext) -> Self {
        Self {
            frontend: PuterFrontend::new(),
            ctx,
        }
    }

    /// The evaluation context in use.
    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }

    /// Parse and run `code` with `inputs` bound as variables; the raw result.
    ///
    /// # Errors
    ///
    /// Parse errors and the first evaluation error.
    pub fn evaluate(&self, code: &str, inputs: Map) -> Result<Value, EvalError> {
        let program = self.frontend.parse(code)?;
        let mut env = match self.ctx.seed {
            Some(seed) => Environment::with_seed(seed),
            None => Environment::new(),
        };
        env.extend_from(inputs);

        if self.ctx.trace {
            debug!(statements = program.body.len(), "running program");
        }
        run_program(&program, &mut env, &self.ctx)
    }

    /// Run `code` and coerce the result to `output`.
    ///
    /// # Errors
    ///
    /// As [`evaluate`](Self::evaluate), plus coercion failures.
    pub fn run(&self, code: &str, inputs: Map, output: OutputType) -> Result<Value, EvalError> {
        coerce_output(self.evaluate(code, inputs)?, output)
    }

    /// Change fingerprint for the host cache, from the process-wide counter.
    pub fn is_changed(code: &str) -> u64 {
        ChangeTracker::global().fingerprint(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_output_type_parsing() {
        assert_eq!("INT".parse::<OutputType>().unwrap(), OutputType::Int);
        assert_eq!("boolean".parse::<OutputType>().unwrap(), OutputType::Bool);
        assert_eq!("*".parse::<OutputType>().unwrap(), OutputType::Raw);
        assert_eq!(OutputType::Float.to_string(), "FLOAT");
    }

    #[test]
    fn test_coerce_int_from_float() {
        assert_eq!(
            coerce_output(Value::Float(3.0), OutputType::Int).unwrap(),
            Value::Int(3)
        );
    }

    #[test]
    fn test_coerce_none_passes_through() {
        assert_eq!(coerce_output(Value::None, OutputType::Int).unwrap(), Value::None);
    }

    #[test]
    fn test_coerce_raw() {
        assert_eq!(
            coerce_output(Value::Int(3), OutputType::Raw).unwrap(),
            Value::string("3")
        );
        let tuple = Value::tuple(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(
            coerce_output(tuple, OutputType::Raw).unwrap(),
            Value::string("(1, 2)")
        );
        let dict = Value::from(serde_json::json!({"a": [1]}));
        assert_eq!(
            coerce_output(dict, OutputType::Raw).unwrap(),
            Value::string("{\n  \"a\": [\n    1\n  ]\n}")
        );
    }
}
