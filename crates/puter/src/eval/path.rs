//! Name evaluation (variable lookup)

use crate::ast::ExprName;
use crate::{Environment, EvalContext, EvalError, Value};

use super::Evaluate;

impl Evaluate for ExprName {
    fn eval(&self, env: &mut Environment, _ctx: &EvalContext) -> Result<Value, EvalError> {
        env.get(&self.id)
            .cloned()
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: self.id.clone(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_name_found() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        env.assign("x", Value::Int(42));

        let expr = ExprName { id: "x".into() };
        assert_eq!(expr.eval(&mut env, &ctx).unwrap(), Value::Int(42));
    }

    #[test]
    fn test_eval_name_missing() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();

        let expr = ExprName { id: "y".into() };
        let err = expr.eval(&mut env, &ctx).unwrap_err();
        assert_eq!(err.to_string(), "Name not found: y");
    }
}
