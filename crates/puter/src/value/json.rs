//! Conversion between runtime values and JSON

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::{type_name, EvalError};

use super::*;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::None,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::string(s),
            serde_json::Value::Array(items) => {
                Value::list(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::dict(
                fields
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    /// Tuples serialize as arrays. Non-finite floats, opaque handles and
    /// bound methods have no JSON form and fail.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::None => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(n) if n.is_finite() => serializer.serialize_f64(*n),
            Value::Float(n) => Err(S::Error::custom(format!("float {} is not JSON", n))),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(items) | Value::Tuple(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Dict(map) => {
                let mut fields = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map.iter() {
                    fields.serialize_entry(k, v)?;
                }
                fields.end()
            }
            Value::Opaque(_) | Value::Method(_) => Err(S::Error::custom(format!(
                "object of type '{}' is not JSON serializable",
                type_name(self)
            ))),
        }
    }
}

impl Value {
    /// Convert to a JSON tree.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` for values with no JSON form.
    pub fn to_json(&self) -> Result<serde_json::Value, EvalError> {
        serde_json::to_value(self).map_err(|e| EvalError::Serialization(e.to_string()))
    }

    /// Render as indented (two-space) JSON text, non-ASCII characters
    /// escaped as `\uXXXX`.
    pub fn to_json_pretty(&self) -> Result<String, EvalError> {
        serde_json::to_string_pretty(self)
            .map(|text| escape_non_ascii(&text))
            .map_err(|e| EvalError::Serialization(e.to_string()))
    }
}

/// Non-ASCII only occurs inside string literals in serialized JSON, so
/// escaping every such char as UTF-16 units keeps the document valid.
fn escape_non_ascii(text: &str) -> String {
    if text.is_ascii() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut units = [0u16; 2];
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        for unit in c.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", unit));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_from_json_preserves_order() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"b": 1, "a": [true, null, 2.5, "x"]}"#).unwrap();
        let value = Value::from(json);
        let map = value.as_map().unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(
            map["a"],
            Value::list(vec![
                Value::Bool(true),
                Value::None,
                Value::Float(2.5),
                Value::string("x")
            ])
        );
    }

    #[test]
    fn test_to_json_pretty() {
        let value = Value::list(vec![Value::Int(1), Value::string("two")]);
        assert_eq!(value.to_json_pretty().unwrap(), "[\n  1,\n  \"two\"\n]");
    }

    #[test]
    fn test_opaque_not_serializable() {
        let value = Value::Opaque(HostHandle::new("MODEL", ()));
        let err = value.to_json().unwrap_err();
        assert!(err.to_string().contains("MODEL"));
    }

    #[test]
    fn test_pretty_json_escapes_non_ascii() {
        let value = Value::list(vec![
            Value::string("é"),
            Value::Float(1.0),
            Value::string("😀"),
        ]);
        assert_eq!(
            value.to_json_pretty().unwrap(),
            "[\n  \"\\u00e9\",\n  1.0,\n  \"\\ud83d\\ude00\"\n]"
        );
    }

    #[test]
    fn test_non_finite_float_not_serializable() {
        assert!(Value::Float(f64::INFINITY).to_json_pretty().is_err());
    }
}
