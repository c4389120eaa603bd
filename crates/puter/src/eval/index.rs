//! Subscript evaluation

use crate::ast::ExprSubscript;
use crate::{Environment, EvalContext, EvalError, Value};

use super::field::lookup;
use super::Evaluate;

impl Evaluate for ExprSubscript {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        let base = self.value.eval(env, ctx)?;
        let key = self.index.eval(env, ctx)?;
        lookup(&base, &key, ctx)
    }
}
