//! Assignment evaluation

use crate::ast::{StmtAssign, StmtAugAssign};
use crate::{Environment, EvalContext, EvalError, Value};

use super::Evaluate;

/// `name = value` stores into the top-level scope and yields the value.
impl Evaluate for StmtAssign {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        let value = self.value.eval(env, ctx)?;
        env.assign(self.target.as_str(), value.clone());
        Ok(value)
    }
}

impl Evaluate for StmtAugAssign {
    fn eval(&self, _env: &mut Environment, _ctx: &EvalContext) -> Result<Value, EvalError> {
        Err(EvalError::UnsupportedExpr {
            kind: format!("augmented assignment ({}=)", self.op.symbol()),
        })
    }
}
