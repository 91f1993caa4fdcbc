//! `async`, `await` and `sleep` evaluation

use std::sync::Arc;

use super::{ControlFlow, Evaluate};
use crate::ast::Expr;
use crate::task;
use crate::{Environment, EvalContext, EvalError, Value};

/// `async { body }` spawns a task and yields its promise immediately.
pub fn eval_async(
    body: &Arc<Expr>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let promise = task::spawn(Arc::clone(body), env, ctx);
    Ok(ControlFlow::Normal(Value::Promise(promise)))
}

/// `await expr` blocks on a promise; other values pass through.
pub fn eval_await(
    expr: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let value = value_of!(expr.eval(env, ctx));
    task::await_value(value).map(ControlFlow::Normal)
}

/// `sleep(ms)` yields a promise fulfilled with `nil` after the delay.
pub fn eval_sleep(
    ms: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let ms = value_of!(ms.eval(env, ctx));
    let promise = task::sleep(&ms)?;
    Ok(ControlFlow::Normal(Value::Promise(promise)))
}
