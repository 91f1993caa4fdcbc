//! Unary operation evaluation

use super::{ControlFlow, Evaluate};
use crate::ast::{Expr, UnaryOp};
use crate::value::ops;
use crate::{Environment, EvalContext, EvalError};

/// Evaluate `op operand`.
pub fn eval_unary(
    op: UnaryOp,
    operand: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let value = value_of!(operand.eval(env, ctx));
    Ok(ControlFlow::Normal(ops::unary(op, &value)?))
}
