//! Return, multi-return and yield evaluation

use super::{ControlFlow, Evaluate};
use crate::ast::Expr;
use crate::{Environment, EvalContext, EvalError, Value};

/// `return [value]`; a bare return carries `Nil`.
pub fn eval_return(
    value: Option<&Expr>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let value = match value {
        Some(expr) => value_of!(expr.eval(env, ctx)),
        None => Value::Nil,
    };
    Ok(ControlFlow::Return(value))
}

/// `return a, b, c`: returns the values packed in a tuple.
pub fn eval_multi_return(
    values: &[Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let mut packed = Vec::with_capacity(values.len());
    for expr in values {
        packed.push(value_of!(expr.eval(env, ctx)));
    }
    Ok(ControlFlow::Return(Value::tuple(packed)))
}

/// `yield value`
pub fn eval_yield(
    value: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    Ok(ControlFlow::Yield(value_of!(value.eval(env, ctx))))
}
