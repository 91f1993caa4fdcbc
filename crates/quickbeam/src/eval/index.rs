//! Index and field access evaluation

use super::{ControlFlow, Evaluate};
use crate::ast::Expr;
use crate::error::type_name;
use crate::{Environment, EvalContext, EvalError, Value};

/// `target[index]`
///
/// Arrays and tuples take integer indices, strings yield one-character
/// strings, objects take string keys and yield `Nil` for a missing key.
pub fn eval_index(
    target: &Expr,
    index: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let container = value_of!(target.eval(env, ctx));
    let key = value_of!(index.eval(env, ctx));
    Ok(ControlFlow::Normal(index_value(&container, &key)?))
}

/// Index into an already-evaluated value.
pub fn index_value(container: &Value, key: &Value) -> Result<Value, EvalError> {
    match (container, key) {
        (Value::Array(items) | Value::Tuple(items), Value::Int(i)) => {
            checked_index(*i, items.len()).map(|i| items[i].clone())
        }
        (Value::String(s), Value::Int(i)) => {
            let len = s.chars().count();
            let i = checked_index(*i, len)?;
            Ok(s.chars()
                .nth(i)
                .map(|c| Value::string(c.to_string()))
                .unwrap_or(Value::Nil))
        }
        (Value::Object(fields), Value::String(k)) => {
            Ok(fields.get(k.as_str()).cloned().unwrap_or(Value::Nil))
        }
        (c, k) => Err(EvalError::type_error(format!(
            "cannot index `{}` with `{}`",
            type_name(c),
            type_name(k)
        ))),
    }
}

fn checked_index(index: i64, len: usize) -> Result<usize, EvalError> {
    usize::try_from(index)
        .ok()
        .filter(|&i| i < len)
        .ok_or(EvalError::IndexOutOfBounds { index, len })
}

/// `target.field`
pub fn eval_field(
    target: &Expr,
    field: &str,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let value = value_of!(target.eval(env, ctx));
    let found = match &value {
        Value::Object(fields) => fields.get(field).cloned(),
        Value::Struct(s) => s.get(field).cloned(),
        _ => None,
    };
    found
        .map(ControlFlow::Normal)
        .ok_or_else(|| EvalError::UndefinedField {
            field: field.to_string(),
            type_name: type_name(&value).to_string(),
        })
}
