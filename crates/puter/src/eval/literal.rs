//! Literal and display evaluation

use crate::ast::{Constant, ExprDict, ExprList, ExprTuple};
use crate::error::type_name;
use crate::value::Map;
use crate::{Environment, EvalContext, EvalError, Value};

use super::Evaluate;

impl Evaluate for Constant {
    fn eval(&self, _env: &mut Environment, _ctx: &EvalContext) -> Result<Value, EvalError> {
        Ok(match self {
            Constant::None => Value::None,
            Constant::Bool(b) => Value::Bool(*b),
            Constant::Int(n) => Value::Int(*n),
            Constant::Float(n) => Value::Float(*n),
            Constant::Str(s) => Value::string(s.as_str()),
        })
    }
}

impl Evaluate for ExprList {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        Ok(Value::list(eval_all(&self.elts, env, ctx)?))
    }
}

impl Evaluate for ExprTuple {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        Ok(Value::tuple(eval_all(&self.elts, env, ctx)?))
    }
}

impl Evaluate for ExprDict {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        let mut map = Map::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            let key = match key.eval(env, ctx)? {
                Value::Str(s) => s.to_string(),
                other => {
                    return Err(EvalError::InvalidKey {
                        type_name: type_name(&other).to_string(),
                    })
                }
            };
            let value = value.eval(env, ctx)?;
            map.insert(key, value);
        }
        Ok(Value::dict(map))
    }
}

/// Evaluate expressions left to right.
pub fn eval_all(
    exprs: &[crate::ast::Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Vec<Value>, EvalError> {
    exprs.iter().map(|e| e.eval(env, ctx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Expr;

    #[test]
    fn test_constants() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        assert_eq!(
            Constant::Float(1.5).eval(&mut env, &ctx).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(Constant::None.eval(&mut env, &ctx).unwrap(), Value::None);
    }

    #[test]
    fn test_dict_key_must_be_str() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        let dict = ExprDict {
            entries: vec![(
                Expr::Constant(Constant::Int(1)),
                Expr::Constant(Constant::Int(2)),
            )],
        };
        let err = dict.eval(&mut env, &ctx).unwrap_err();
        assert!(matches!(err, EvalError::InvalidKey { .. }));
    }
}
