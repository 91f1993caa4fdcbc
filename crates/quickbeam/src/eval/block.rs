//! Block evaluation

use super::{ControlFlow, Evaluate};
use crate::ast::Expr;
use crate::{Environment, EvalContext, EvalError};

/// `{ statements }` in a fresh frame.
pub fn eval_body(
    statements: &[Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let mut scope = env.scope_guard();
    eval_statements(statements, &mut scope, ctx)
}

/// Run statements in order in the current frame.
///
/// The first signal (`Return`, `Break` or `Yield`) stops the scan and is
/// returned as-is. Otherwise the result is the last statement's value,
/// `Nil` for an empty list.
pub fn eval_statements(
    statements: &[Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let mut last = ControlFlow::nil();
    for statement in statements {
        last = statement.eval(env, ctx)?;
        if !last.is_normal() {
            break;
        }
    }
    Ok(last)
}
