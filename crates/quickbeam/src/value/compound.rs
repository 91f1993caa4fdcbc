//! Compound value types: structs

use indexmap::IndexMap;

use super::Value;

/// A struct instance with named fields.
///
/// Uses IndexMap to preserve field order for predictable display.
#[derive(Debug, Clone, PartialEq)]
pub struct StructValue {
    /// The struct's type name (e.g., "Point", "Person")
    pub type_name: String,

    /// The struct's fields in definition order
    pub fields: IndexMap<String, Value>,
}

impl StructValue {
    /// Create a new struct with no fields
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: IndexMap::new(),
        }
    }

    /// Add a field (builder pattern)
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Get a field by name
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_struct_fields_keep_order() {
        let point = StructValue::new("Point")
            .with_field("y", Value::Int(2))
            .with_field("x", Value::Int(1));
        let names: Vec<&str> = point.fields.keys().map(|k| k.as_str()).collect();
        assert_eq!(names, vec!["y", "x"]);
        assert_eq!(point.get("x"), Some(&Value::Int(1)));
        assert_eq!(point.get("z"), None);
    }
}
