//! Interpolated string evaluation
//!
//! Each field is stringified plainly; conversion flags and format specs
//! were already dropped by the lexer.

use std::fmt::Write;

use crate::ast::{ExprFString, FStringPart};
use crate::{Environment, EvalContext, EvalError, Value};

use super::Evaluate;

impl Evaluate for ExprFString {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        let mut out = String::new();
        for part in &self.parts {
            match part {
                FStringPart::Literal(text) => out.push_str(text),
                FStringPart::Expr(expr) => {
                    let value = expr.eval(env, ctx)?;
                    let _ = write!(out, "{}", value);
                }
            }
        }
        Ok(Value::string(out))
    }
}
