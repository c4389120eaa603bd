//! List comprehension evaluation

use crate::ast::{ExprListComp, Target};
use crate::error::type_name;
use crate::{Environment, EvalContext, EvalError, Value};

use super::Evaluate;

impl Evaluate for ExprListComp {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        let generator = &self.generator;
        let iterable = generator.iter.eval(env, ctx)?;
        let items = iterate(&iterable)?;

        let mut out = Vec::new();
        let mut scope = env.scope_guard();

        'items: for item in items {
            bind(&mut scope, &generator.target, item)?;
            for cond in &generator.ifs {
                if !cond.eval(&mut scope, ctx)?.is_truthy() {
                    continue 'items;
                }
            }
            out.push(self.elt.eval(&mut scope, ctx)?);
        }

        Ok(Value::list(out))
    }
}

/// Elements produced by iterating `value`: sequence items, mapping keys
/// or string characters.
pub fn iterate(value: &Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::List(items) | Value::Tuple(items) => Ok(items.to_vec()),
        Value::Dict(map) => Ok(map.keys().map(|k| Value::string(k.as_str())).collect()),
        Value::Str(s) => Ok(s.chars().map(|c| Value::string(c.to_string())).collect()),
        other => Err(EvalError::NotIterable {
            type_name: type_name(other).to_string(),
        }),
    }
}

fn bind(env: &mut Environment, target: &Target, item: Value) -> Result<(), EvalError> {
    match target {
        Target::Name(name) => env.set_local(name.as_str(), item),
        Target::Pair(first, second) => {
            let pair = match item.as_sequence() {
                Some([a, b]) => (a.clone(), b.clone()),
                Some(items) => {
                    return Err(EvalError::UnpackMismatch {
                        expected: 2,
                        got: format!("{} values", items.len()),
                    })
                }
                None => {
                    return Err(EvalError::UnpackMismatch {
                        expected: 2,
                        got: format!("'{}'", type_name(&item)),
                    })
                }
            };
            env.set_local(first.as_str(), pair.0);
            env.set_local(second.as_str(), pair.1);
        }
    }
    Ok(())
}
