//! Attribute-style callables on built-in value types
//!
//! `d.items()` is an attribute lookup that yields a bound method followed
//! by a call. Lookup happens here; the call goes through
//! [`BoundMethod::call`](crate::value::BoundMethod::call).

use crate::error::type_name;
use crate::value::{MethodFnPtr, Value};

type MethodTable = &'static [(&'static str, MethodFnPtr)];

const DICT_METHODS: MethodTable = &[
    ("get", dict_get),
    ("items", dict_items),
    ("keys", dict_keys),
    ("values", dict_values),
];

const STR_METHODS: MethodTable = &[
    ("endswith", str_endswith),
    ("join", str_join),
    ("lower", str_lower),
    ("replace", str_replace),
    ("split", str_split),
    ("startswith", str_startswith),
    ("strip", str_strip),
    ("upper", str_upper),
];

const SEQ_METHODS: MethodTable = &[("count", seq_count), ("index", seq_index)];

fn table_for(value: &Value) -> MethodTable {
    match value {
        Value::Dict(_) => DICT_METHODS,
        Value::Str(_) => STR_METHODS,
        Value::List(_) | Value::Tuple(_) => SEQ_METHODS,
        _ => &[],
    }
}

/// Bind method `name` to `receiver`, if the receiver's type has one.
pub fn lookup(receiver: &Value, name: &str) -> Option<Value> {
    table_for(receiver)
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(n, f)| Value::method(*n, receiver.clone(), *f))
}

/// Method names available on `value`, sorted.
pub fn names(value: &Value) -> impl Iterator<Item = &'static str> {
    table_for(value).iter().map(|(n, _)| *n)
}

fn arity(name: &str, args: &[Value], min: usize, max: usize) -> Result<(), String> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(format!(
            "{}() takes {} argument(s) ({} given)",
            name,
            expected,
            args.len()
        ));
    }
    Ok(())
}

fn str_arg<'a>(name: &str, value: &'a Value) -> Result<&'a str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("{}() argument must be str, not {}", name, type_name(value)))
}

// ═══════════════════════════════════════════════════════════════════════
// dict
// ═══════════════════════════════════════════════════════════════════════

fn dict_items(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("items", args, 0, 0)?;
    let map = receiver.as_map().ok_or("items() needs a dict")?;
    Ok(Value::list(
        map.iter()
            .map(|(k, v)| Value::tuple(vec![Value::string(k.as_str()), v.clone()]))
            .collect(),
    ))
}

fn dict_keys(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("keys", args, 0, 0)?;
    let map = receiver.as_map().ok_or("keys() needs a dict")?;
    Ok(Value::list(
        map.keys().map(|k| Value::string(k.as_str())).collect(),
    ))
}

fn dict_values(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("values", args, 0, 0)?;
    let map = receiver.as_map().ok_or("values() needs a dict")?;
    Ok(Value::list(map.values().cloned().collect()))
}

fn dict_get(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("get", args, 1, 2)?;
    let default = args.get(1).cloned().unwrap_or(Value::None);
    Ok(match args[0].as_str() {
        Some(key) => receiver.get(key).cloned().unwrap_or(default),
        None => default,
    })
}

// ═══════════════════════════════════════════════════════════════════════
// str
// ═══════════════════════════════════════════════════════════════════════

fn receiver_str(receiver: &Value) -> Result<&str, String> {
    receiver.as_str().ok_or_else(|| "method needs a str".to_string())
}

fn str_lower(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("lower", args, 0, 0)?;
    Ok(Value::string(receiver_str(receiver)?.to_lowercase()))
}

fn str_upper(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("upper", args, 0, 0)?;
    Ok(Value::string(receiver_str(receiver)?.to_uppercase()))
}

fn str_strip(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("strip", args, 0, 1)?;
    let s = receiver_str(receiver)?;
    let stripped = match args.first() {
        None | Some(Value::None) => s.trim(),
        Some(chars) => {
            let chars: Vec<char> = str_arg("strip", chars)?.chars().collect();
            s.trim_matches(|c| chars.contains(&c))
        }
    };
    Ok(Value::string(stripped))
}

/// `prefix` may be a str or a tuple of str.
fn affix_matches(
    name: &str,
    affix: &Value,
    test: impl Fn(&str) -> bool,
) -> Result<bool, String> {
    match affix {
        Value::Tuple(options) => {
            for option in options.iter() {
                if test(str_arg(name, option)?) {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        other => Ok(test(str_arg(name, other)?)),
    }
}

fn str_startswith(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("startswith", args, 1, 1)?;
    let s = receiver_str(receiver)?;
    Ok(Value::Bool(affix_matches("startswith", &args[0], |p| {
        s.starts_with(p)
    })?))
}

fn str_endswith(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("endswith", args, 1, 1)?;
    let s = receiver_str(receiver)?;
    Ok(Value::Bool(affix_matches("endswith", &args[0], |p| {
        s.ends_with(p)
    })?))
}

fn str_split(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("split", args, 0, 1)?;
    let s = receiver_str(receiver)?;
    let parts: Vec<Value> = match args.first() {
        None | Some(Value::None) => s.split_whitespace().map(Value::string).collect(),
        Some(sep) => {
            let sep = str_arg("split", sep)?;
            if sep.is_empty() {
                return Err("empty separator".to_string());
            }
            s.split(sep).map(Value::string).collect()
        }
    };
    Ok(Value::list(parts))
}

fn str_replace(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("replace", args, 2, 2)?;
    let s = receiver_str(receiver)?;
    let old = str_arg("replace", &args[0])?;
    let new = str_arg("replace", &args[1])?;
    Ok(Value::string(s.replace(old, new)))
}

fn str_join(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("join", args, 1, 1)?;
    let sep = receiver_str(receiver)?;
    let items = args[0]
        .as_sequence()
        .ok_or_else(|| format!("can only join a list or tuple, not {}", type_name(&args[0])))?;
    let parts = items
        .iter()
        .map(|item| str_arg("join", item))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::string(parts.join(sep)))
}

// ═══════════════════════════════════════════════════════════════════════
// list / tuple
// ═══════════════════════════════════════════════════════════════════════

fn seq_index(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("index", args, 1, 1)?;
    let items = receiver.as_sequence().ok_or("index() needs a sequence")?;
    items
        .iter()
        .position(|v| *v == args[0])
        .map(|i| Value::Int(i as i64))
        .ok_or_else(|| format!("{} is not in {}", args[0].repr(), type_name(receiver)))
}

fn seq_count(receiver: &Value, args: &[Value]) -> Result<Value, String> {
    arity("count", args, 1, 1)?;
    let items = receiver.as_sequence().ok_or("count() needs a sequence")?;
    Ok(Value::Int(
        items.iter().filter(|v| **v == args[0]).count() as i64,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn call(receiver: Value, name: &str, args: &[Value]) -> Result<Value, String> {
        match lookup(&receiver, name) {
            Some(Value::Method(m)) => m.call(args),
            _ => panic!("no method {}", name),
        }
    }

    #[test]
    fn test_dict_items_are_pairs() {
        let d = Value::from(serde_json::json!({"a": 1, "b": 2}));
        assert_eq!(
            call(d, "items", &[]).unwrap(),
            Value::list(vec![
                Value::tuple(vec![Value::string("a"), Value::Int(1)]),
                Value::tuple(vec![Value::string("b"), Value::Int(2)]),
            ])
        );
    }

    #[test]
    fn test_dict_get_default() {
        let d = Value::from(serde_json::json!({"a": 1}));
        assert_eq!(call(d.clone(), "get", &["a".into()]).unwrap(), Value::Int(1));
        assert_eq!(call(d.clone(), "get", &["z".into()]).unwrap(), Value::None);
        assert_eq!(
            call(d, "get", &["z".into(), Value::Int(0)]).unwrap(),
            Value::Int(0)
        );
    }

    #[test]
    fn test_str_methods() {
        let s = Value::string("  Lora_One  ");
        assert_eq!(call(s.clone(), "strip", &[]).unwrap(), Value::string("Lora_One"));
        assert_eq!(
            call(Value::string("Lora"), "lower", &[]).unwrap(),
            Value::string("lora")
        );
        assert_eq!(
            call(Value::string("lora_1"), "startswith", &["lora_".into()]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call(Value::string("a,b"), "split", &[",".into()]).unwrap(),
            Value::list(vec!["a".into(), "b".into()])
        );
        assert_eq!(
            call(
                Value::string("-"),
                "join",
                &[Value::list(vec!["a".into(), "b".into()])]
            )
            .unwrap(),
            Value::string("a-b")
        );
    }

    #[test]
    fn test_startswith_tuple() {
        let prefixes = Value::tuple(vec!["B".into(), "F".into()]);
        assert_eq!(
            call(Value::string("Foo"), "startswith", &[prefixes]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn test_seq_methods() {
        let l = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(1)]);
        assert_eq!(call(l.clone(), "count", &[Value::Int(1)]).unwrap(), Value::Int(2));
        assert_eq!(call(l.clone(), "index", &[Value::Int(2)]).unwrap(), Value::Int(1));
        assert!(call(l, "index", &[Value::Int(9)]).is_err());
    }

    #[test]
    fn test_arity_errors() {
        let err = call(Value::string("a"), "lower", &[Value::Int(1)]).unwrap_err();
        assert_eq!(err, "lower() takes 0 argument(s) (1 given)");
    }

    #[test]
    fn test_no_methods_on_numbers() {
        assert!(lookup(&Value::Int(1), "lower").is_none());
        assert_eq!(names(&Value::Int(1)).count(), 0);
    }
}
