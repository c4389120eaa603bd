//! Binary arithmetic, bitwise and boolean operation evaluation

use crate::ast::{BinOp, BoolOp, ExprBinOp, ExprBoolOp};
use crate::{Environment, EvalContext, EvalError, Value};

use super::Evaluate;

impl Evaluate for ExprBinOp {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        let left = self.left.eval(env, ctx)?;
        let right = self.right.eval(env, ctx)?;
        apply(self.op, &left, &right)
    }
}

/// `and` returns a falsy left operand untouched without evaluating the
/// right. `or` always evaluates both sides. Otherwise the result is 1 or 0.
impl Evaluate for ExprBoolOp {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        let left = self.left.eval(env, ctx)?;
        match self.op {
            BoolOp::And => {
                if !left.is_truthy() {
                    return Ok(left);
                }
                let right = self.right.eval(env, ctx)?;
                Ok(Value::flag(right.is_truthy()))
            }
            BoolOp::Or => {
                let right = self.right.eval(env, ctx)?;
                Ok(Value::flag(left.is_truthy() || right.is_truthy()))
            }
        }
    }
}

/// Apply a binary operator to two evaluated operands.
pub fn apply(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinOp::Add => eval_add(left, right),
        BinOp::Sub => arith(op, left, right, i64::checked_sub, |a, b| a - b),
        BinOp::Mult => eval_mul(left, right),
        BinOp::Div => eval_div(left, right),
        BinOp::FloorDiv => eval_floordiv(left, right),
        BinOp::Mod => eval_mod(left, right),
        BinOp::Pow => eval_pow(left, right),
        BinOp::BitAnd => bitwise(op, left, right, |a, b| a & b),
        BinOp::BitOr => bitwise(op, left, right, |a, b| a | b),
        BinOp::BitXor => bitwise(op, left, right, |a, b| a ^ b),
        BinOp::LShift => eval_shift(op, left, right),
        BinOp::RShift => eval_shift(op, left, right),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Operand classification
// ═══════════════════════════════════════════════════════════════════════

/// Both operands as integers (bool counts, float does not).
fn ints(left: &Value, right: &Value) -> Option<(i64, i64)> {
    match (left, right) {
        (Value::Int(_) | Value::Bool(_), Value::Int(_) | Value::Bool(_)) => {
            Some((left.as_int()?, right.as_int()?))
        }
        _ => None,
    }
}

/// Both operands as floats, when at least one is numeric and neither isn't.
fn floats(left: &Value, right: &Value) -> Option<(f64, f64)> {
    match (left, right) {
        (
            Value::Int(_) | Value::Bool(_) | Value::Float(_),
            Value::Int(_) | Value::Bool(_) | Value::Float(_),
        ) => Some((left.as_f64()?, right.as_f64()?)),
        _ => None,
    }
}

fn arith(
    op: BinOp,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    if let Some((a, b)) = ints(left, right) {
        return int_op(a, b).map(Value::Int).ok_or(EvalError::IntegerOverflow);
    }
    if let Some((a, b)) = floats(left, right) {
        return Ok(Value::Float(float_op(a, b)));
    }
    Err(EvalError::operands(op.symbol(), left, right))
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

fn eval_add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::string(format!("{}{}", a, b))),
        (Value::List(a), Value::List(b)) => Ok(Value::list(concat(a, b))),
        (Value::Tuple(a), Value::Tuple(b)) => Ok(Value::tuple(concat(a, b))),
        _ => arith(BinOp::Add, left, right, i64::checked_add, |a, b| a + b),
    }
}

fn concat(a: &[Value], b: &[Value]) -> Vec<Value> {
    a.iter().chain(b.iter()).cloned().collect()
}

fn eval_mul(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Str(s), Value::Int(n)) | (Value::Int(n), Value::Str(s)) => {
            Ok(Value::string(s.repeat(repeat_count(*n, s.len())?)))
        }
        (Value::List(items), Value::Int(n)) | (Value::Int(n), Value::List(items)) => {
            Ok(Value::list(repeat(items, *n)?))
        }
        (Value::Tuple(items), Value::Int(n)) | (Value::Int(n), Value::Tuple(items)) => {
            Ok(Value::tuple(repeat(items, *n)?))
        }
        _ => arith(BinOp::Mult, left, right, i64::checked_mul, |a, b| a * b),
    }
}

fn repeat_count(n: i64, len: usize) -> Result<usize, EvalError> {
    let n = usize::try_from(n.max(0)).map_err(|_| EvalError::IntegerOverflow)?;
    n.checked_mul(len).ok_or(EvalError::IntegerOverflow)?;
    Ok(n)
}

fn repeat(items: &[Value], n: i64) -> Result<Vec<Value>, EvalError> {
    let n = repeat_count(n, items.len())?;
    Ok(items.iter().cloned().cycle().take(items.len() * n).collect())
}

/// True division: always a float.
fn eval_div(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (a, b) =
        floats(left, right).ok_or_else(|| EvalError::operands("/", left, right))?;
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Float(a / b))
}

fn eval_floordiv(left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let Some((a, b)) = ints(left, right) {
        if b == 0 {
            return Err(EvalError::DivisionByZero);
        }
        let q = a.checked_div(b).ok_or(EvalError::IntegerOverflow)?;
        let adjust = (a % b != 0) && ((a < 0) != (b < 0));
        return Ok(Value::Int(if adjust { q - 1 } else { q }));
    }
    let (a, b) =
        floats(left, right).ok_or_else(|| EvalError::operands("//", left, right))?;
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    Ok(Value::Float((a / b).floor()))
}

/// Modulo with the sign of the divisor.
fn eval_mod(left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let Some((a, b)) = ints(left, right) {
        if b == 0 {
            return Err(EvalError::DivisionByZero);
        }
        let r = a.checked_rem(b).unwrap_or(0);
        let adjust = r != 0 && ((r < 0) != (b < 0));
        return Ok(Value::Int(if adjust { r + b } else { r }));
    }
    let (a, b) = floats(left, right).ok_or_else(|| EvalError::operands("%", left, right))?;
    if b == 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    let r = a % b;
    let adjust = r != 0.0 && ((r < 0.0) != (b < 0.0));
    Ok(Value::Float(if adjust { r + b } else { r }))
}

fn eval_pow(left: &Value, right: &Value) -> Result<Value, EvalError> {
    if let Some((base, exp)) = ints(left, right) {
        if exp >= 0 {
            let exp = u32::try_from(exp).map_err(|_| EvalError::IntegerOverflow)?;
            return base
                .checked_pow(exp)
                .map(Value::Int)
                .ok_or(EvalError::IntegerOverflow);
        }
        if base == 0 {
            return Err(EvalError::DivisionByZero);
        }
        return Ok(Value::Float((base as f64).powf(exp as f64)));
    }
    let (base, exp) =
        floats(left, right).ok_or_else(|| EvalError::operands("**", left, right))?;
    if base == 0.0 && exp < 0.0 {
        return Err(EvalError::DivisionByZero);
    }
    if base < 0.0 && exp.fract() != 0.0 {
        return Err(EvalError::builtin(
            "**",
            "negative number cannot be raised to a fractional power",
        ));
    }
    Ok(Value::Float(base.powf(exp)))
}

// ═══════════════════════════════════════════════════════════════════════
// Bitwise
// ═══════════════════════════════════════════════════════════════════════

fn bitwise(
    op: BinOp,
    left: &Value,
    right: &Value,
    f: fn(i64, i64) -> i64,
) -> Result<Value, EvalError> {
    let (a, b) = ints(left, right).ok_or_else(|| EvalError::operands(op.symbol(), left, right))?;
    Ok(Value::Int(f(a, b)))
}

fn eval_shift(op: BinOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (a, n) = ints(left, right).ok_or_else(|| EvalError::operands(op.symbol(), left, right))?;
    if n < 0 {
        return Err(EvalError::builtin(op.symbol(), "negative shift count"));
    }
    match op {
        BinOp::LShift => {
            if a == 0 {
                return Ok(Value::Int(0));
            }
            if n >= 64 {
                return Err(EvalError::IntegerOverflow);
            }
            let shifted = a << n;
            if shifted >> n != a {
                return Err(EvalError::IntegerOverflow);
            }
            Ok(Value::Int(shifted))
        }
        _ => Ok(Value::Int(if n >= 64 { if a < 0 { -1 } else { 0 } } else { a >> n })),
    }
}
