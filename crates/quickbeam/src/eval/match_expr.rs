//! Match expression evaluation

use super::{ControlFlow, Evaluate};
use crate::ast::{MatchExpr, Pattern};
use crate::value::ops::strict_eq;
use crate::{Environment, EvalContext, EvalError};

impl Evaluate for MatchExpr {
    /// The scrutinee is evaluated once; arms are tried in order and the
    /// first whose pattern matches supplies the result. No match gives
    /// `Nil`. Value patterns compare with kind-exact equality.
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<ControlFlow, EvalError> {
        let scrutinee = value_of!(self.scrutinee.eval(env, ctx));

        for arm in &self.arms {
            let matched = match &arm.pattern {
                Pattern::Wildcard => true,
                Pattern::Value(expr) => strict_eq(&scrutinee, &value_of!(expr.eval(env, ctx))),
            };
            if matched {
                return arm.body.eval(env, ctx);
            }
        }

        Ok(ControlFlow::nil())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, MatchArm};
    use crate::Value;

    fn eval(expr: &Expr) -> Result<ControlFlow, EvalError> {
        let mut env = Environment::new();
        expr.eval(&mut env, &EvalContext::default())
    }

    #[test]
    fn test_first_matching_arm_wins() {
        let expr = Expr::match_(
            Expr::int(2),
            vec![
                MatchArm::value(Expr::int(1), Expr::string("one")),
                MatchArm::value(Expr::int(2), Expr::string("two")),
                MatchArm::wildcard(Expr::string("many")),
            ],
        );
        assert_eq!(eval(&expr), Ok(ControlFlow::Normal(Value::string("two"))));
    }

    #[test]
    fn test_int_does_not_match_float() {
        let expr = Expr::match_(
            Expr::int(1),
            vec![MatchArm::value(Expr::float(1.0), Expr::string("float"))],
        );
        assert_eq!(eval(&expr), Ok(ControlFlow::nil()));
    }

    #[test]
    fn test_wildcard_fallback() {
        let expr = Expr::match_(
            Expr::string("x"),
            vec![
                MatchArm::value(Expr::string("y"), Expr::int(0)),
                MatchArm::wildcard(Expr::int(1)),
            ],
        );
        assert_eq!(eval(&expr), Ok(ControlFlow::Normal(Value::Int(1))));
    }

    #[test]
    fn test_scrutinee_evaluated_once() {
        let mut env = Environment::new();
        env.define("n", Value::Int(0));
        let bump = Expr::body(vec![
            Expr::assign(
                "n",
                Expr::binary(crate::ast::BinaryOp::Add, Expr::ident("n"), Expr::int(1)),
            ),
            Expr::ident("n"),
        ]);
        let expr = Expr::match_(
            bump,
            vec![
                MatchArm::value(Expr::int(5), Expr::nil()),
                MatchArm::value(Expr::int(6), Expr::nil()),
                MatchArm::wildcard(Expr::nil()),
            ],
        );
        expr.eval(&mut env, &EvalContext::default()).unwrap();
        assert_eq!(env.get("n"), Ok(&Value::Int(1)));
    }
}
