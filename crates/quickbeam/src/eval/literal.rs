//! Literal, variable and collection constructor evaluation

use indexmap::IndexMap;

use super::{ControlFlow, Evaluate};
use crate::ast::{Expr, Literal};
use crate::value::StructValue;
use crate::{Environment, EvalContext, EvalError, Value};

impl Evaluate for Literal {
    fn eval(&self, _env: &mut Environment, _ctx: &EvalContext) -> Result<ControlFlow, EvalError> {
        let value = match self {
            Literal::Nil => Value::Nil,
            Literal::Bool(b) => Value::Bool(*b),
            Literal::Int(n) => Value::Int(*n),
            Literal::Float(n) => Value::Float(*n),
            Literal::String(s) => Value::string(s.as_str()),
        };
        Ok(ControlFlow::Normal(value))
    }
}

/// Look up a variable.
pub fn eval_ident(name: &str, env: &Environment) -> Result<ControlFlow, EvalError> {
    Ok(ControlFlow::Normal(env.get(name)?.clone()))
}

/// `[a, b, c]`
pub fn eval_array(
    items: &[Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let mut values = Vec::with_capacity(items.len());
    for item in items {
        values.push(value_of!(item.eval(env, ctx)));
    }
    Ok(ControlFlow::Normal(Value::array(values)))
}

/// `{ key: value, ... }`; later duplicate keys win.
pub fn eval_object(
    fields: &[(String, Expr)],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let mut map = IndexMap::with_capacity(fields.len());
    for (key, expr) in fields {
        map.insert(key.clone(), value_of!(expr.eval(env, ctx)));
    }
    Ok(ControlFlow::Normal(Value::object(map)))
}

/// `Name { field: value, ... }`
pub fn eval_struct(
    type_name: &str,
    fields: &[(String, Expr)],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let mut record = StructValue::new(type_name);
    for (name, expr) in fields {
        record.fields.insert(name.clone(), value_of!(expr.eval(env, ctx)));
    }
    Ok(ControlFlow::Normal(Value::structure(record)))
}
