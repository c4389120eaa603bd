//! Function and method call evaluation

use tracing::debug;

use crate::ast::{Expr, ExprCall};
use crate::builtins::global_registry;
use crate::error::type_name;
use crate::{Environment, EvalContext, EvalError, Value};

use super::literal::eval_all;
use super::Evaluate;

impl Evaluate for ExprCall {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        if let Expr::Name(name) = self.func.as_ref() {
            if let Some(function) = global_registry().get(&name.id) {
                function.check_arity(self.args.len())?;
                let args = eval_all(&self.args, env, ctx)?;
                if ctx.trace {
                    debug!(function = function.name, args = ?args, "builtin call");
                }
                return function.invoke(env, ctx, &args);
            }
            if !env.contains(&name.id) {
                return Err(EvalError::UndefinedFunction {
                    name: name.id.clone(),
                });
            }
        }

        let callee = self.func.eval(env, ctx)?;
        let args = eval_all(&self.args, env, ctx)?;
        call_value(&callee, &args)
    }
}

/// Call an evaluated callee.
///
/// # Errors
///
/// `NotCallable` for anything but a bound method; the method's own failure
/// as `BuiltinError`.
pub fn call_value(callee: &Value, args: &[Value]) -> Result<Value, EvalError> {
    match callee {
        Value::Method(method) => method
            .call(args)
            .map_err(|message| EvalError::builtin(method.name, message)),
        other => Err(EvalError::NotCallable {
            type_name: type_name(other).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_call_non_callable() {
        let err = call_value(&Value::Int(1), &[]).unwrap_err();
        assert_eq!(err.to_string(), "'int' object is not callable");
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn test_unknown_function() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        let call = ExprCall {
            func: Box::new(Expr::name("frobnicate")),
            args: vec![],
        };
        let err = call.eval(&mut env, &ctx).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Name);
    }
}
