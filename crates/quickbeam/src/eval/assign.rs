//! Binding, assignment and destructuring evaluation

use super::{ControlFlow, Evaluate};
use crate::ast::Expr;
use crate::{Environment, EvalContext, EvalError, Value};

/// `let name = value` / `const name = value`
///
/// Declares in the innermost frame. Redeclaring a name that frame already
/// holds is an error; shadowing an outer binding is fine.
pub fn eval_let(
    name: &str,
    value: &Expr,
    constant: bool,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let value = value_of!(value.eval(env, ctx));
    if env.contains_in_current_scope(name) {
        return Err(EvalError::AlreadyDefined {
            name: name.to_string(),
        });
    }
    if constant {
        env.define_constant(name, value);
    } else {
        env.define(name, value);
    }
    Ok(ControlFlow::nil())
}

/// `name = value`: updates the nearest binding; the result is the value.
pub fn eval_assign(
    name: &str,
    value: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let value = value_of!(value.eval(env, ctx));
    env.assign(name, value.clone())?;
    Ok(ControlFlow::Normal(value))
}

/// `a, b, c = value`
///
/// Tuples and arrays destructure positionally; missing positions become
/// `Nil` and extra values are dropped. Any other value binds to the first
/// name. Each target is updated if it exists and declared otherwise.
pub fn eval_multi_assign(
    names: &[String],
    value: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let value = value_of!(value.eval(env, ctx));
    let values: Vec<Value> = match &value {
        Value::Tuple(items) | Value::Array(items) => items.to_vec(),
        single => vec![single.clone()],
    };

    let mut values = values.into_iter();
    for name in names {
        let next = values.next().unwrap_or(Value::Nil);
        if env.contains(name) {
            env.assign(name, next)?;
        } else {
            env.define(name.as_str(), next);
        }
    }
    Ok(ControlFlow::nil())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::eval_expr;

    #[test]
    fn test_let_rejects_redeclaration_in_same_scope() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        eval_expr(&Expr::let_("x", Expr::int(1)), &mut env, &ctx).unwrap();
        assert_eq!(
            eval_expr(&Expr::let_("x", Expr::int(2)), &mut env, &ctx),
            Err(EvalError::AlreadyDefined {
                name: "x".to_string()
            })
        );
    }

    #[test]
    fn test_const_rejects_assignment() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        eval_expr(&Expr::const_("k", Expr::int(1)), &mut env, &ctx).unwrap();
        assert_eq!(
            eval_expr(&Expr::assign("k", Expr::int(2)), &mut env, &ctx),
            Err(EvalError::ConstantAssignment {
                name: "k".to_string()
            })
        );
        assert_eq!(env.get("k"), Ok(&Value::Int(1)));
    }

    #[test]
    fn test_multi_assign_pads_with_nil() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        let expr = Expr::multi_assign(
            &["a", "b", "c"],
            Expr::Array(vec![Expr::int(1), Expr::int(2)]),
        );
        eval_expr(&expr, &mut env, &ctx).unwrap();
        assert_eq!(env.get("a"), Ok(&Value::Int(1)));
        assert_eq!(env.get("b"), Ok(&Value::Int(2)));
        assert_eq!(env.get("c"), Ok(&Value::Nil));
    }

    #[test]
    fn test_multi_assign_single_value_binds_first() {
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        eval_expr(&Expr::multi_assign(&["a", "b"], Expr::int(7)), &mut env, &ctx).unwrap();
        assert_eq!(env.get("a"), Ok(&Value::Int(7)));
        assert_eq!(env.get("b"), Ok(&Value::Nil));
    }
}
