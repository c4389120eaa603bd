//! Unary operation evaluation

use crate::ast::{ExprUnaryOp, UnaryOp};
use crate::error::type_name;
use crate::{Environment, EvalContext, EvalError, Value};

use super::Evaluate;

impl Evaluate for ExprUnaryOp {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        let operand = self.operand.eval(env, ctx)?;
        match self.op {
            UnaryOp::Neg => eval_neg(operand),
            UnaryOp::Invert => eval_invert(operand),
            UnaryOp::Not => Ok(Value::flag(!operand.is_truthy())),
        }
    }
}

fn eval_neg(value: Value) -> Result<Value, EvalError> {
    match value {
        Value::Int(n) => n.checked_neg().map(Value::Int).ok_or(EvalError::IntegerOverflow),
        Value::Bool(b) => Ok(Value::Int(-(b as i64))),
        Value::Float(n) => Ok(Value::Float(-n)),
        other => Err(invalid("-", &other)),
    }
}

fn eval_invert(value: Value) -> Result<Value, EvalError> {
    match value.as_int() {
        Some(n) => Ok(Value::Int(!n)),
        None => Err(invalid("~", &value)),
    }
}

fn invalid(op: &str, operand: &Value) -> EvalError {
    EvalError::InvalidUnaryOperand {
        op: op.to_string(),
        operand_type: type_name(operand).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neg_and_invert() {
        assert_eq!(eval_neg(Value::Float(1.5)).unwrap(), Value::Float(-1.5));
        assert_eq!(eval_invert(Value::Int(5)).unwrap(), Value::Int(-6));
        assert!(matches!(
            eval_neg(Value::Int(i64::MIN)).unwrap_err(),
            EvalError::IntegerOverflow
        ));
    }

    #[test]
    fn test_neg_rejects_strings() {
        let err = eval_neg(Value::string("a")).unwrap_err();
        assert_eq!(err.to_string(), "bad operand type for unary -: 'str'");
    }
}
