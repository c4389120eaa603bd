//! Attribute access evaluation and the shared lookup rule
//!
//! `a.b` and `a['b']` resolve the same way:
//!
//! 1. item lookup: mapping key, sequence index (negative from the end),
//!    string character
//! 2. attribute lookup: a method of the base's type, bound to the base
//! 3. special accessor registered for the base's node type
//! 4. a mapping with no match yields `None`; anything else is an error

use crate::ast::ExprAttribute;
use crate::error::type_name;
use crate::methods;
use crate::{Environment, EvalContext, EvalError, Value};

use super::Evaluate;

impl Evaluate for ExprAttribute {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        let base = self.value.eval(env, ctx)?;
        lookup(&base, &Value::string(self.attr.as_str()), ctx)
    }
}

/// Resolve `base[key]` / `base.key`.
pub fn lookup(base: &Value, key: &Value, ctx: &EvalContext) -> Result<Value, EvalError> {
    if let Some(found) = item(base, key) {
        return Ok(found);
    }

    if let Some(name) = key.as_str() {
        if let Some(method) = methods::lookup(base, name) {
            return Ok(method);
        }
        if let Some(accessor) = ctx.accessors.resolve(base, name) {
            return accessor(base).map_err(|message| EvalError::builtin(name, message));
        }
    }

    if base.is_mapping() {
        return Ok(Value::None);
    }
    Err(miss(base, key))
}

fn item(base: &Value, key: &Value) -> Option<Value> {
    match (base, key) {
        (Value::Dict(map), Value::Str(k)) => map.get(k.as_str()).cloned(),
        (Value::List(items) | Value::Tuple(items), Value::Int(_) | Value::Bool(_)) => {
            let i = resolve_index(key.as_int()?, items.len())?;
            items.get(i).cloned()
        }
        (Value::Str(s), Value::Int(_) | Value::Bool(_)) => {
            let len = s.chars().count();
            let i = resolve_index(key.as_int()?, len)?;
            s.chars().nth(i).map(|c| Value::string(c.to_string()))
        }
        _ => None,
    }
}

/// Map a possibly negative index onto `0..len`.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    let len = i64::try_from(len).ok()?;
    let i = if index < 0 { index + len } else { index };
    (0..len).contains(&i).then_some(i as usize)
}

fn miss(base: &Value, key: &Value) -> EvalError {
    match (base, key) {
        (Value::List(items) | Value::Tuple(items), Value::Int(_) | Value::Bool(_)) => {
            EvalError::IndexOutOfBounds {
                index: key.as_int().unwrap_or_default(),
                len: items.len(),
            }
        }
        (Value::Str(s), Value::Int(_) | Value::Bool(_)) => EvalError::IndexOutOfBounds {
            index: key.as_int().unwrap_or_default(),
            len: s.chars().count(),
        },
        (_, Value::Str(attr)) => EvalError::AttributeNotFound {
            attr: attr.to_string(),
            type_name: type_name(base).to_string(),
        },
        _ => EvalError::operands("[]", base, key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn get(base: &Value, key: impl Into<Value>) -> Result<Value, EvalError> {
        lookup(base, &key.into(), &EvalContext::default())
    }

    #[test]
    fn test_mapping_key_then_none() {
        let d = Value::from(serde_json::json!({"a": 1}));
        assert_eq!(get(&d, "a").unwrap(), Value::Int(1));
        assert_eq!(get(&d, "missing").unwrap(), Value::None);
        assert_eq!(get(&d, 3i64).unwrap(), Value::None);
    }

    #[test]
    fn test_key_shadows_method() {
        let d = Value::from(serde_json::json!({"items": "mine"}));
        assert_eq!(get(&d, "items").unwrap(), Value::string("mine"));
    }

    #[test]
    fn test_sequence_index() {
        let l = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(get(&l, 0i64).unwrap(), Value::Int(1));
        assert_eq!(get(&l, -1i64).unwrap(), Value::Int(3));
        let err = get(&l, 3i64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Lookup);
        assert_eq!(err.to_string(), "index 3 out of range for length 3");
    }

    #[test]
    fn test_string_index() {
        assert_eq!(get(&Value::string("héllo"), 1i64).unwrap(), Value::string("é"));
    }

    #[test]
    fn test_method_binding() {
        assert!(matches!(get(&Value::string("a"), "upper").unwrap(), Value::Method(_)));
    }

    #[test]
    fn test_missing_attribute_on_non_mapping() {
        let err = get(&Value::Int(1), "real").unwrap_err();
        assert_eq!(err.to_string(), "'int' object has no attribute 'real'");
        assert_eq!(err.kind(), ErrorKind::Lookup);
    }
}
