//! Coercions between value kinds
//!
//! These never fail: values with no sensible numeric reading become zero.

use super::Value;

impl Value {
    /// Integer reading of a value.
    ///
    /// Floats truncate toward zero, booleans are 0/1, strings parse or
    /// fall back to 0, everything else is 0.
    pub fn to_int(&self) -> i64 {
        match self {
            Value::Int(n) => *n,
            Value::Float(n) => n.trunc() as i64,
            Value::Bool(b) => *b as i64,
            Value::String(s) => parse_int(s.trim()),
            _ => 0,
        }
    }

    /// Float reading of a value.
    pub fn to_float(&self) -> f64 {
        match self {
            Value::Int(n) => *n as f64,
            Value::Float(n) => *n,
            Value::Bool(b) => *b as i64 as f64,
            Value::String(s) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// Canonical text form (same as `Display`).
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Truthiness used by conditions and logical operators.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Array(items) | Value::Tuple(items) => !items.is_empty(),
            Value::Object(fields) => !fields.is_empty(),
            _ => true,
        }
    }
}

// "3.7" reads as 3, matching the float path.
fn parse_int(s: &str) -> i64 {
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        .unwrap_or(0)
}
