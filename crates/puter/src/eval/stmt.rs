//! Statement evaluation

use tracing::debug;

use crate::ast::{Program, Stmt};
use crate::{Environment, EvalContext, EvalError, Value};

use super::{ControlFlow, Evaluate};

impl Evaluate for Stmt {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        match self {
            Stmt::Expr(expr) => expr.eval(env, ctx),
            Stmt::Assign(assign) => assign.eval(env, ctx),
            Stmt::AugAssign(assign) => assign.eval(env, ctx),
            Stmt::Return(ret) => {
                let value = match &ret.value {
                    Some(expr) => expr.eval(env, ctx)?,
                    None => Value::None,
                };
                Err(EvalError::ControlFlow(ControlFlow::return_value(value)))
            }
        }
    }
}

/// Run a program's statements in order.
///
/// The result is the value of the last statement executed, `None` for an
/// empty program. A `return` ends the run with its value.
///
/// # Errors
///
/// The first error any statement raises.
pub fn run_program(
    program: &Program,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let mut last_value = Value::None;

    for (index, stmt) in program.body.iter().enumerate() {
        if ctx.trace {
            debug!(index, kind = stmt_kind(stmt), "statement");
        }

        match stmt.eval(env, ctx) {
            Ok(value) => last_value = value,
            Err(EvalError::ControlFlow(ControlFlow::Return { value })) => return Ok(value),
            Err(e) => return Err(e),
        }
    }

    Ok(last_value)
}

fn stmt_kind(stmt: &Stmt) -> &'static str {
    match stmt {
        Stmt::Expr(expr) => expr.kind_name(),
        Stmt::Assign(_) => "assignment",
        Stmt::AugAssign(_) => "augmented assignment",
        Stmt::Return(_) => "return",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Constant, Expr, StmtReturn};

    fn int(n: i64) -> Stmt {
        Stmt::Expr(Expr::Constant(Constant::Int(n)))
    }

    #[test]
    fn test_last_value_wins() {
        let program = Program {
            body: vec![int(1), int(2)],
        };
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        assert_eq!(run_program(&program, &mut env, &ctx).unwrap(), Value::Int(2));
    }

    #[test]
    fn test_return_stops_sequence() {
        let program = Program {
            body: vec![
                int(1),
                Stmt::Return(StmtReturn {
                    value: Some(Expr::Constant(Constant::Int(7))),
                }),
                Stmt::Expr(Expr::name("undefined")),
            ],
        };
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        assert_eq!(run_program(&program, &mut env, &ctx).unwrap(), Value::Int(7));
    }

    #[test]
    fn test_empty_program_is_none() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        assert_eq!(
            run_program(&Program::default(), &mut env, &ctx).unwrap(),
            Value::None
        );
    }
}
