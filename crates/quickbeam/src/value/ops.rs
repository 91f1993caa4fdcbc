//! Operator semantics on values
//!
//! One dispatch point per operator. The evaluator in `eval::binary` handles
//! short-circuiting and then defers here for everything else.

use std::cmp::Ordering;

use crate::ast::{BinaryOp, UnaryOp};
use crate::error::type_name;
use crate::{EvalError, Value};

/// Numeric view of an operand after bool coercion.
#[derive(Debug, Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn of(value: &Value) -> Option<Num> {
        match value {
            Value::Int(n) => Some(Num::Int(*n)),
            Value::Float(n) => Some(Num::Float(*n)),
            Value::Bool(b) => Some(Num::Int(*b as i64)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(n) => n as f64,
            Num::Float(n) => n,
        }
    }
}

fn invalid_operands(op: BinaryOp, left: &Value, right: &Value) -> EvalError {
    EvalError::InvalidBinaryOperands {
        op: op.symbol().to_string(),
        left_type: type_name(left).to_string(),
        right_type: type_name(right).to_string(),
    }
}

/// Apply a non-short-circuiting binary operator.
///
/// `&&` and `||` are accepted too and evaluate eagerly; callers that want
/// short-circuiting handle them before getting here.
pub fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
            arithmetic(op, left, right)
        }
        BinaryOp::Eq => Ok(Value::Bool(loose_eq(left, right))),
        BinaryOp::Ne => Ok(Value::Bool(!loose_eq(left, right))),
        BinaryOp::Lt => compare(op, left, right).map(|o| Value::Bool(o == Ordering::Less)),
        BinaryOp::Le => compare(op, left, right).map(|o| Value::Bool(o != Ordering::Greater)),
        BinaryOp::Gt => compare(op, left, right).map(|o| Value::Bool(o == Ordering::Greater)),
        BinaryOp::Ge => compare(op, left, right).map(|o| Value::Bool(o != Ordering::Less)),
        BinaryOp::And => Ok(if left.is_truthy() {
            right.clone()
        } else {
            left.clone()
        }),
        BinaryOp::Or => Ok(if left.is_truthy() {
            left.clone()
        } else {
            right.clone()
        }),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Arithmetic
// ═══════════════════════════════════════════════════════════════════════

/// `+`: string concatenation if either side is a string, else numeric.
pub fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::String(a), b) => Ok(Value::string(format!("{}{}", a, b))),
        (a, Value::String(b)) => Ok(Value::string(format!("{}{}", a, b))),
        _ => arithmetic(BinaryOp::Add, left, right),
    }
}

fn arithmetic(op: BinaryOp, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (Num::of(left), Num::of(right)) else {
        return Err(invalid_operands(op, left, right));
    };

    match (op, a, b) {
        (BinaryOp::Div, _, _) => {
            let divisor = b.as_f64();
            if divisor == 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Float(a.as_f64() / divisor))
        }
        (BinaryOp::Rem, _, _) if b.as_f64() == 0.0 => Err(EvalError::DivisionByZero),
        (_, Num::Int(x), Num::Int(y)) => Ok(Value::Int(match op {
            BinaryOp::Add => x.wrapping_add(y),
            BinaryOp::Sub => x.wrapping_sub(y),
            BinaryOp::Mul => x.wrapping_mul(y),
            BinaryOp::Rem => x.wrapping_rem(y),
            _ => return Err(invalid_operands(op, left, right)),
        })),
        _ => {
            let (x, y) = (a.as_f64(), b.as_f64());
            Ok(Value::Float(match op {
                BinaryOp::Add => x + y,
                BinaryOp::Sub => x - y,
                BinaryOp::Mul => x * y,
                BinaryOp::Rem => x % y,
                _ => return Err(invalid_operands(op, left, right)),
            }))
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Comparison and Equality
// ═══════════════════════════════════════════════════════════════════════

/// Ordering for `< <= > >=`: numbers (bools coerced) or two strings.
pub fn compare(op: BinaryOp, left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Ok(a.as_str().cmp(b.as_str()));
    }
    match (Num::of(left), Num::of(right)) {
        (Some(Num::Int(a)), Some(Num::Int(b))) => Ok(a.cmp(&b)),
        (Some(a), Some(b)) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .ok_or_else(|| invalid_operands(op, left, right)),
        _ => Err(invalid_operands(op, left, right)),
    }
}

/// The language's `==`: ints and floats compare numerically, same kinds
/// compare structurally, other cross-kind pairs are unequal.
pub fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
        (Value::Array(a), Value::Array(b)) | (Value::Tuple(a), Value::Tuple(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| loose_eq(x, y))
        }
        _ => left == right,
    }
}

/// Kind-exact equality on primitives, used by `match`.
///
/// Different kinds never match (`1` vs `1.0` is a miss). Non-primitive
/// values never match anything.
pub fn strict_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Nil, Value::Nil) => true,
        (Value::Bool(a), Value::Bool(b)) => a == b,
        (Value::Int(a), Value::Int(b)) => a == b,
        (Value::Float(a), Value::Float(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        _ => false,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Unary
// ═══════════════════════════════════════════════════════════════════════

/// Apply a unary operator.
pub fn unary(op: UnaryOp, operand: &Value) -> Result<Value, EvalError> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        UnaryOp::Neg => match Num::of(operand) {
            Some(Num::Int(n)) => Ok(Value::Int(n.wrapping_neg())),
            Some(Num::Float(n)) => Ok(Value::Float(-n)),
            None => Err(EvalError::InvalidUnaryOperand {
                op: op.symbol().to_string(),
                operand_type: type_name(operand).to_string(),
            }),
        },
    }
}
