//! Value trait implementations: constructors, predicates, extractors, From traits, PartialEq

use std::cmp::Ordering;
use std::sync::Arc;

use super::*;

// ═══════════════════════════════════════════════════════════════════
// Convenience Constructors
// ═══════════════════════════════════════════════════════════════════

impl Value {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Arc::new(s.into()))
    }

    /// Create a list value
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Arc::new(items))
    }

    /// Create a tuple value
    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Arc::new(items))
    }

    /// Create a dict value
    pub fn dict(map: Map) -> Self {
        Value::Dict(Arc::new(map))
    }

    /// Create a bound method value
    pub fn method(name: &'static str, receiver: Value, func: MethodFnPtr) -> Self {
        Value::Method(Arc::new(BoundMethod {
            name,
            receiver,
            func,
        }))
    }

    /// Boolean as the 1/0 integer comparisons and logic operators produce
    pub fn flag(b: bool) -> Self {
        Value::Int(b as i64)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Type Predicates
    // ═══════════════════════════════════════════════════════════════════

    /// Check if value is `None`
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    /// Check if value is int or float (bool excluded)
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Check if value is a string
    pub fn is_string(&self) -> bool {
        matches!(self, Value::Str(_))
    }

    /// Check if value is a dict
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Dict(_))
    }

    /// Check if value is callable
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Method(_))
    }

    /// Truthiness: `None`, zero, and empty containers are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Dict(map) => !map.is_empty(),
            Value::Opaque(_) | Value::Method(_) => true,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Extractors (return Option for safe access)
    // ═══════════════════════════════════════════════════════════════════

    /// Extract as i64 (bools count as 0/1)
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(*b as i64),
            _ => None,
        }
    }

    /// Extract as f64 (converts from int and bool)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            Value::Int(n) => Some(*n as f64),
            Value::Bool(b) => Some(*b as i64 as f64),
            _ => None,
        }
    }

    /// Extract string slice
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract list or tuple elements
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Extract mapping
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Dict(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key if this is a dict.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.get(key))
    }

    // ═══════════════════════════════════════════════════════════════════
    // Ordering and Membership
    // ═══════════════════════════════════════════════════════════════════

    /// Ordering between two values, `None` when they aren't comparable.
    ///
    /// Numbers compare across int/float/bool, strings lexicographically,
    /// lists with lists and tuples with tuples element-wise.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::Str(a), Value::Str(b)) => Some(a.as_str().cmp(b.as_str())),
            (Value::List(a), Value::List(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    if x != y {
                        return x.compare(y);
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => {
                let a = numeric(self)?;
                let b = numeric(other)?;
                a.partial_cmp(&b)
            }
        }
    }

    /// Membership test for `needle in self`, `None` if `self` isn't a container.
    pub fn contains(&self, needle: &Value) -> Option<bool> {
        match self {
            Value::List(items) | Value::Tuple(items) => Some(items.iter().any(|v| v == needle)),
            Value::Str(s) => needle.as_str().map(|sub| s.contains(sub)),
            Value::Dict(map) => Some(needle.as_str().is_some_and(|k| map.contains_key(k))),
            _ => None,
        }
    }
}

fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Int(_) | Value::Float(_) | Value::Bool(_) => value.as_f64(),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════
// From Implementations
// ═══════════════════════════════════════════════════════════════════

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::dict(map)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::None, Into::into)
    }
}

// ═══════════════════════════════════════════════════════════════════
// PartialEq Implementation
// ═══════════════════════════════════════════════════════════════════

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Opaque(a), Value::Opaque(b)) => a.ptr_eq(b),
            (Value::Method(a), Value::Method(b)) => Arc::ptr_eq(a, b),
            // Cross-type numeric equality: 1 == 1.0 == True
            _ => match (numeric(self), numeric(other)) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::None.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(!Value::list(vec![]).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::string("x").is_truthy());
    }

    #[test]
    fn test_cross_numeric_equality() {
        assert_eq!(Value::Int(1), Value::Float(1.0));
        assert_eq!(Value::Bool(true), Value::Int(1));
        assert_ne!(Value::Int(1), Value::string("1"));
        assert_ne!(
            Value::list(vec![Value::Int(1)]),
            Value::tuple(vec![Value::Int(1)])
        );
    }

    #[test]
    fn test_compare() {
        assert_eq!(
            Value::Int(1).compare(&Value::Float(1.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            Value::string("b").compare(&Value::string("a")),
            Some(Ordering::Greater)
        );
        assert_eq!(Value::Int(1).compare(&Value::string("a")), None);
        assert_eq!(
            Value::list(vec![Value::Int(1), Value::Int(2)])
                .compare(&Value::list(vec![Value::Int(1)])),
            Some(Ordering::Greater)
        );
    }

    #[test]
    fn test_contains() {
        let list = Value::list(vec![Value::Int(1), Value::Int(2)]);
        assert_eq!(list.contains(&Value::Float(2.0)), Some(true));
        assert_eq!(
            Value::string("hello").contains(&Value::string("ell")),
            Some(true)
        );
        assert_eq!(Value::Int(3).contains(&Value::Int(3)), None);
    }
}
