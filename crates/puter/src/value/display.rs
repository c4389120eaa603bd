//! Display and Debug implementations for Value
//!
//! `Display` renders the way `str()` does in the expression language
//! (strings unquoted), `Value::repr` the way containers render their
//! elements (strings quoted). `Debug` is `repr`.

use std::fmt;

use super::*;

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.repr())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s), // No quotes for Display
            _ => f.write_str(&self.repr()),
        }
    }
}

impl Value {
    /// Quoted, unambiguous representation.
    pub fn repr(&self) -> String {
        let mut out = String::new();
        write_repr(self, &mut out);
        out
    }
}

fn write_repr(value: &Value, out: &mut String) {
    match value {
        Value::None => out.push_str("None"),
        Value::Bool(true) => out.push_str("True"),
        Value::Bool(false) => out.push_str("False"),
        Value::Int(n) => out.push_str(&n.to_string()),
        Value::Float(n) => out.push_str(&format_float(*n)),
        Value::Str(s) => write_str_repr(s, out),

        Value::List(items) => {
            out.push('[');
            write_items(items, out);
            out.push(']');
        }

        Value::Tuple(items) => {
            out.push('(');
            write_items(items, out);
            if items.len() == 1 {
                out.push(','); // Single-element tuple needs trailing comma
            }
            out.push(')');
        }

        Value::Dict(map) => {
            out.push('{');
            for (i, (k, v)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_str_repr(k, out);
                out.push_str(": ");
                write_repr(v, out);
            }
            out.push('}');
        }

        Value::Opaque(handle) => {
            out.push_str(&format!("<{} object>", handle.type_name()));
        }
        Value::Method(m) => {
            out.push_str(&format!("<built-in method {}>", m.name));
        }
    }
}

fn write_items(items: &[Value], out: &mut String) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_repr(item, out);
    }
}

fn write_str_repr(s: &str, out: &mut String) {
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

/// Format a float the way the expression language prints it.
///
/// Integral values keep a trailing `.0`, very large or very small
/// magnitudes switch to exponent form with a signed, two-digit exponent.
pub fn format_float(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = n.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let formatted = format!("{:e}", n);
        return match formatted.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => formatted,
        };
    }

    if n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(1.0), "1.0");
        assert_eq!(format_float(1.5), "1.5");
        assert_eq!(format_float(-0.25), "-0.25");
        assert_eq!(format_float(1e20), "1e+20");
        assert_eq!(format_float(1.5e-5), "1.5e-05");
        assert_eq!(format_float(f64::INFINITY), "inf");
        assert_eq!(format_float(f64::NAN), "nan");
    }

    #[test]
    fn test_str_repr_quotes() {
        assert_eq!(Value::string("abc").repr(), "'abc'");
        assert_eq!(Value::string("it's").repr(), "\"it's\"");
        assert_eq!(Value::string("a\nb").repr(), "'a\\nb'");
    }

    #[test]
    fn test_container_display() {
        let list = Value::list(vec![Value::Int(1), Value::string("a"), Value::None]);
        assert_eq!(list.to_string(), "[1, 'a', None]");

        let single = Value::tuple(vec![Value::Int(1)]);
        assert_eq!(single.to_string(), "(1,)");

        let mut map = Map::new();
        map.insert("k".to_string(), Value::Bool(true));
        assert_eq!(Value::dict(map).to_string(), "{'k': True}");
    }

    #[test]
    fn test_string_display_unquoted() {
        assert_eq!(Value::string("plain").to_string(), "plain");
    }
}
