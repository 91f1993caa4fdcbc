//! Display and Debug implementations for Value
//!
//! `Display` is the canonical text form used by string concatenation,
//! `str()` and `print`. Top-level strings print raw; strings nested inside
//! containers print quoted so `["a, b"]` stays distinguishable from
//! `["a", "b"]`.

use std::fmt;

use super::*;

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{:?}", other),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            // f64's Display is the shortest round-trip form and never uses
            // an exponent; whole floats print without a fraction.
            Value::Float(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{:?}", s.as_str()),

            Value::Array(items) => {
                write!(f, "[")?;
                write_list(f, items)?;
                write!(f, "]")
            }

            Value::Tuple(items) => {
                write!(f, "(")?;
                write_list(f, items)?;
                write!(f, ")")
            }

            Value::Object(fields) => {
                write!(f, "{{")?;
                for (i, (k, v)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {:?}", k, v)?;
                }
                write!(f, "}}")
            }

            Value::Struct(s) => {
                write!(f, "{} {{", s.type_name)?;
                for (i, (k, v)) in s.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, " {}: {:?}", k, v)?;
                }
                write!(f, " }}")
            }

            Value::Result(r) => match r.as_ref() {
                Ok(v) => write!(f, "Ok({:?})", v),
                Err(e) => write!(f, "Err({:?})", e),
            },

            Value::Callable(c) => write!(f, "<function {}>", c.name()),
            Value::Promise(p) => write!(f, "<promise {}>", p.state_name()),
            Value::Channel(c) => write!(f, "<channel cap={}>", c.capacity()),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{:?}", item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;

    #[test]
    fn test_display_primitives() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Int(-7).to_string(), "-7");
        assert_eq!(Value::Float(1.0).to_string(), "1");
        assert_eq!(Value::Float(2.5).to_string(), "2.5");
        assert_eq!(Value::Float(1e21).to_string(), "1000000000000000000000");
        assert_eq!(Value::string("raw").to_string(), "raw");
    }

    #[test]
    fn test_display_containers_quote_nested_strings() {
        let v = Value::array(vec![Value::Int(1), Value::string("a")]);
        assert_eq!(v.to_string(), "[1, \"a\"]");

        let mut fields = IndexMap::new();
        fields.insert("k".to_string(), Value::Bool(false));
        assert_eq!(Value::object(fields).to_string(), "{k: false}");

        assert_eq!(
            Value::tuple(vec![Value::Int(1), Value::Nil]).to_string(),
            "(1, nil)"
        );
    }

    #[test]
    fn test_display_struct_and_result() {
        let p = Value::structure(StructValue::new("Point").with_field("x", Value::Int(1)));
        assert_eq!(p.to_string(), "Point { x: 1 }");
        assert_eq!(Value::ok(Value::Int(1)).to_string(), "Ok(1)");
        assert_eq!(Value::err(Value::string("bad")).to_string(), "Err(\"bad\")");
    }
}
