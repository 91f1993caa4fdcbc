//! Binary operation evaluation

use super::{ControlFlow, Evaluate};
use crate::ast::{BinaryOp, Expr};
use crate::value::ops;
use crate::{Environment, EvalContext, EvalError};

/// Evaluate `left op right`.
///
/// `&&` and `||` short-circuit and yield one of their operands; every other
/// operator evaluates both sides, left first, and defers to `value::ops`.
pub fn eval_binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let lhs = value_of!(left.eval(env, ctx));

    match op {
        BinaryOp::And if !lhs.is_truthy() => return Ok(ControlFlow::Normal(lhs)),
        BinaryOp::Or if lhs.is_truthy() => return Ok(ControlFlow::Normal(lhs)),
        BinaryOp::And | BinaryOp::Or => return right.eval(env, ctx),
        _ => {}
    }

    let rhs = value_of!(right.eval(env, ctx));
    Ok(ControlFlow::Normal(ops::binary(op, &lhs, &rhs)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval_expr;
    use crate::Value;

    fn eval(expr: Expr) -> Result<Value, EvalError> {
        let mut env = Environment::new();
        eval_expr(&expr, &mut env, &EvalContext::default())
    }

    #[test]
    fn test_and_short_circuits() {
        // The right side would fail if evaluated.
        let expr = Expr::binary(BinaryOp::And, Expr::bool(false), Expr::ident("undefined"));
        assert_eq!(eval(expr), Ok(Value::Bool(false)));
    }

    #[test]
    fn test_or_returns_right_operand() {
        let expr = Expr::binary(BinaryOp::Or, Expr::int(0), Expr::string("fallback"));
        assert_eq!(eval(expr), Ok(Value::string("fallback")));
    }

    #[test]
    fn test_arithmetic_errors_propagate() {
        let expr = Expr::binary(BinaryOp::Rem, Expr::int(1), Expr::int(0));
        assert_eq!(eval(expr), Err(EvalError::DivisionByZero));
    }
}
