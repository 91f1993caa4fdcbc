//! Tests for value construction, display, equality and operators

use indexmap::IndexMap;
use pretty_assertions::assert_eq;
use quickbeam::ast::{BinaryOp, UnaryOp};
use quickbeam::value::ops;
use quickbeam::*;

// ═══════════════════════════════════════════════════════════════════════
// Display
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_display_primitives() {
    assert_eq!(Value::Nil.to_string(), "nil");
    assert_eq!(Value::Bool(true).to_string(), "true");
    assert_eq!(Value::Int(-7).to_string(), "-7");
    assert_eq!(Value::Float(2.5).to_string(), "2.5");
    assert_eq!(Value::string("raw").to_string(), "raw");
}

#[test]
fn test_display_nested_strings_are_quoted() {
    let array = Value::array(vec![Value::string("a, b"), Value::Int(1)]);
    assert_eq!(array.to_string(), r#"["a, b", 1]"#);

    let tuple = Value::tuple(vec![Value::Int(1), Value::Nil]);
    assert_eq!(tuple.to_string(), "(1, nil)");
}

#[test]
fn test_display_object_keeps_insertion_order() {
    let mut fields = IndexMap::new();
    fields.insert("z".to_string(), Value::Int(1));
    fields.insert("a".to_string(), Value::string("x"));
    assert_eq!(Value::object(fields).to_string(), r#"{z: 1, a: "x"}"#);
}

#[test]
fn test_display_struct_and_results() {
    let point = StructValue::new("Point")
        .with_field("x", Value::Int(1))
        .with_field("y", Value::Int(2));
    assert_eq!(Value::structure(point).to_string(), "Point { x: 1, y: 2 }");
    assert_eq!(Value::ok(Value::Int(1)).to_string(), "Ok(1)");
    assert_eq!(Value::err(Value::string("bad")).to_string(), r#"Err("bad")"#);
}

#[test]
fn test_display_runtime_objects() {
    let builtin = BuiltinFn::new("noop", 0, |_, _, _| Ok(Value::Nil));
    assert_eq!(Value::callable(builtin).to_string(), "<function noop>");

    let promise = Value::Promise(Promise::resolved(Value::Nil));
    assert_eq!(promise.to_string(), "<promise fulfilled>");
}

// ═══════════════════════════════════════════════════════════════════════
// Equality
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_value_equality_is_kind_exact() {
    assert_eq!(Value::Int(1), Value::Int(1));
    assert_ne!(Value::Int(1), Value::Float(1.0));
    assert_ne!(Value::string("1"), Value::Int(1));
}

#[test]
fn test_language_equality_is_numeric() {
    assert!(ops::loose_eq(&Value::Int(1), &Value::Float(1.0)));
    assert!(!ops::strict_eq(&Value::Int(1), &Value::Float(1.0)));
    assert!(ops::loose_eq(
        &Value::array(vec![Value::Int(2)]),
        &Value::array(vec![Value::Float(2.0)])
    ));
}

#[test]
fn test_callables_compare_by_identity() {
    let f = Value::callable(BuiltinFn::new("f", 0, |_, _, _| Ok(Value::Nil)));
    let g = Value::callable(BuiltinFn::new("f", 0, |_, _, _| Ok(Value::Nil)));
    assert_eq!(f, f.clone());
    assert_ne!(f, g);
}

// ═══════════════════════════════════════════════════════════════════════
// Coercion
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_truthiness() {
    assert!(!Value::Nil.is_truthy());
    assert!(!Value::Int(0).is_truthy());
    assert!(!Value::string("").is_truthy());
    assert!(Value::string("0").is_truthy());
    assert!(Value::Float(0.5).is_truthy());
}

#[test]
fn test_numeric_conversions() {
    assert_eq!(Value::Float(-2.9).to_int(), -2);
    assert_eq!(Value::string(" 42 ").to_int(), 42);
    assert_eq!(Value::Bool(true).to_float(), 1.0);
    assert_eq!(Value::string("nope").to_int(), 0);
}

#[test]
fn test_from_conversions() {
    assert_eq!(Value::from(3i64), Value::Int(3));
    assert_eq!(Value::from("s"), Value::string("s"));
    assert_eq!(Value::from(Some(1i64)), Value::Int(1));
    assert_eq!(Value::from(None::<i64>), Value::Nil);
    assert_eq!(
        Value::from(vec![1i64, 2]),
        Value::array(vec![Value::Int(1), Value::Int(2)])
    );
}

// ═══════════════════════════════════════════════════════════════════════
// Operators
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn test_division_always_yields_float() {
    assert_eq!(
        ops::binary(BinaryOp::Div, &Value::Int(7), &Value::Int(2)),
        Ok(Value::Float(3.5))
    );
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        ops::binary(BinaryOp::Div, &Value::Int(1), &Value::Int(0)),
        Err(EvalError::DivisionByZero)
    );
    assert_eq!(
        ops::binary(BinaryOp::Rem, &Value::Int(1), &Value::Int(0)),
        Err(EvalError::DivisionByZero)
    );
}

#[test]
fn test_string_concatenation() {
    assert_eq!(
        ops::binary(BinaryOp::Add, &Value::string("n = "), &Value::Int(3)),
        Ok(Value::string("n = 3"))
    );
}

#[test]
fn test_invalid_operands() {
    let err = ops::binary(BinaryOp::Sub, &Value::string("a"), &Value::Int(1)).unwrap_err();
    assert_eq!(
        err,
        EvalError::InvalidBinaryOperands {
            op: "-".to_string(),
            left_type: "string".to_string(),
            right_type: "int".to_string(),
        }
    );
}

#[test]
fn test_unary_operators() {
    assert_eq!(ops::unary(UnaryOp::Neg, &Value::Int(4)), Ok(Value::Int(-4)));
    assert_eq!(ops::unary(UnaryOp::Not, &Value::Nil), Ok(Value::Bool(true)));
    assert!(matches!(
        ops::unary(UnaryOp::Neg, &Value::string("x")),
        Err(EvalError::InvalidUnaryOperand { .. })
    ));
}

#[test]
fn test_string_comparison() {
    assert_eq!(
        ops::binary(BinaryOp::Lt, &Value::string("apple"), &Value::string("banana")),
        Ok(Value::Bool(true))
    );
    assert!(ops::binary(BinaryOp::Lt, &Value::string("a"), &Value::Int(1)).is_err());
}
