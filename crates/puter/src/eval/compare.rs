//! Comparison evaluation
//!
//! Comparisons are strictly binary and produce 1 or 0.

use std::cmp::Ordering;

use crate::ast::{CompareOp, ExprCompare};
use crate::error::type_name;
use crate::{Environment, EvalContext, EvalError, Value};

use super::Evaluate;

impl Evaluate for ExprCompare {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        let left = self.left.eval(env, ctx)?;
        let right = self.right.eval(env, ctx)?;
        compare(self.op, &left, &right)
    }
}

/// Apply a comparison operator to two evaluated operands.
pub fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let result = match op {
        CompareOp::Eq => left == right,
        CompareOp::NotEq => left != right,
        CompareOp::Lt => ordered(op, left, right)? == Ordering::Less,
        CompareOp::LtE => ordered(op, left, right)? != Ordering::Greater,
        CompareOp::Gt => ordered(op, left, right)? == Ordering::Greater,
        CompareOp::GtE => ordered(op, left, right)? != Ordering::Less,
        CompareOp::In => membership(left, right)?,
        CompareOp::NotIn | CompareOp::Is | CompareOp::IsNot => {
            return Err(EvalError::UnsupportedOperator {
                op: op.name().to_string(),
            })
        }
    };
    Ok(Value::flag(result))
}

fn symbol(op: CompareOp) -> &'static str {
    match op {
        CompareOp::Lt => "<",
        CompareOp::LtE => "<=",
        CompareOp::Gt => ">",
        _ => ">=",
    }
}

fn ordered(op: CompareOp, left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    left.compare(right)
        .ok_or_else(|| EvalError::operands(symbol(op), left, right))
}

fn membership(needle: &Value, haystack: &Value) -> Result<bool, EvalError> {
    match haystack.contains(needle) {
        Some(found) => Ok(found),
        None if haystack.is_string() => Err(EvalError::operands("in", needle, haystack)),
        None => Err(EvalError::NotIterable {
            type_name: type_name(haystack).to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_results_are_flags() {
        assert_eq!(
            compare(CompareOp::Lt, &Value::Int(1), &Value::Float(1.5)).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            compare(CompareOp::Eq, &Value::Int(1), &Value::Float(1.0)).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            compare(CompareOp::GtE, &Value::string("a"), &Value::string("b")).unwrap(),
            Value::Int(0)
        );
    }

    #[test]
    fn test_membership() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(
            compare(CompareOp::In, &Value::Int(2), &list).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            compare(CompareOp::In, &Value::string("ell"), &Value::string("hello")).unwrap(),
            Value::Int(1)
        );
        assert!(compare(CompareOp::In, &Value::Int(1), &Value::Int(1)).is_err());
    }

    #[test]
    fn test_unsupported_operators() {
        for op in [CompareOp::NotIn, CompareOp::Is, CompareOp::IsNot] {
            let err = compare(op, &Value::Int(1), &Value::Int(1)).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OperatorUnsupported);
        }
        let err = compare(CompareOp::IsNot, &Value::None, &Value::None).unwrap_err();
        assert_eq!(err.to_string(), "Operator IsNot not supported.");
    }

    #[test]
    fn test_unorderable() {
        let err = compare(CompareOp::Lt, &Value::Int(1), &Value::string("a")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}
