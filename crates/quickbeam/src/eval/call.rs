//! Function call evaluation
//!
//! Every interpreted callable goes through [`invoke`]: arity check, a
//! function frame guarded by [`CallGuard`](crate::CallGuard), captures,
//! parameter binding with defaults, then the body scan.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::{eval_expr, ControlFlow, Evaluate};
use crate::ast::{Expr, Param, TypeName};
use crate::error::type_name;
use crate::stack::ensure_sufficient_stack;
use crate::value::{AnonymousFn, Callable, ClosureValue, FunctionValue, TypedClosure};
use crate::{Environment, EvalContext, EvalError, Value};

/// `callee(args...)`
pub fn eval_call(
    callee: &Expr,
    args: &[Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let callee = value_of!(callee.eval(env, ctx));

    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(value_of!(arg.eval(env, ctx)));
    }

    call_value(&callee, values, env, ctx).map(ControlFlow::Normal)
}

/// Call a value with already-evaluated arguments.
///
/// # Errors
///
/// `NotCallable` if the value is not a function.
pub fn call_value(
    callee: &Value,
    args: Vec<Value>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    match callee {
        Value::Callable(f) => f.call(args, env, ctx),
        other => Err(EvalError::NotCallable {
            type_name: type_name(other).to_string(),
        }),
    }
}

/// Run an interpreted function body.
///
/// The function frame is pushed on top of `env`; captures are bound first so
/// that parameters shadow them. Unfilled parameters take their default,
/// evaluated in the new frame, so a default may refer to earlier
/// parameters.
pub fn invoke(
    name: &str,
    params: &[Param],
    body: &Expr,
    captures: Option<&HashMap<String, Value>>,
    args: Vec<Value>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    if args.len() > params.len() {
        return Err(EvalError::ArgumentCount {
            name: name.to_string(),
            expected: params.len(),
            got: args.len(),
        });
    }

    ensure_sufficient_stack(|| {
        let mut frame = env.call_guard()?;
        trace!(function = name, depth = frame.call_depth(), "call");

        if let Some(captures) = captures {
            for (capture, value) in captures {
                frame.define(capture.clone(), value.clone());
            }
        }

        bind_params(name, params, args, &mut frame, ctx)?;
        run_body(body, &mut frame, ctx)
    })
}

fn bind_params(
    name: &str,
    params: &[Param],
    args: Vec<Value>,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<(), EvalError> {
    let mut args = args.into_iter();
    for param in params {
        let value = match (args.next(), &param.default) {
            (Some(value), _) => value,
            (None, Some(default)) => eval_expr(default, env, ctx)?,
            (None, None) => {
                return Err(EvalError::MissingArgument {
                    name: name.to_string(),
                    param: param.name.clone(),
                })
            }
        };

        if let Some(expected) = param.type_name {
            if !type_matches(expected, &value) {
                return Err(EvalError::type_error(format!(
                    "function `{}` parameter `{}` expects {}, got {}",
                    name,
                    param.name,
                    expected.as_str(),
                    type_name(&value)
                )));
            }
        }

        env.define(param.name.clone(), value);
    }
    Ok(())
}

/// A block body is scanned for the first `Return`; anything else it
/// signals is ignored. Any other body is a single expression whose value
/// is the result.
fn run_body(body: &Expr, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
    match body {
        Expr::Body(statements) => {
            for statement in statements {
                if let ControlFlow::Return(value) = statement.eval(env, ctx)? {
                    return Ok(value);
                }
            }
            Ok(Value::Nil)
        }
        expr => Ok(expr.eval(env, ctx)?.into_value()),
    }
}

/// Whether `value` satisfies an annotation. `float` also accepts ints.
pub fn type_matches(expected: TypeName, value: &Value) -> bool {
    match expected {
        TypeName::Any => true,
        TypeName::Int => matches!(value, Value::Int(_)),
        TypeName::Float => matches!(value, Value::Float(_) | Value::Int(_)),
        TypeName::String => matches!(value, Value::String(_)),
        TypeName::Bool => matches!(value, Value::Bool(_)),
        TypeName::Array => matches!(value, Value::Array(_)),
        TypeName::Object => matches!(value, Value::Object(_)),
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Callable implementations
// ═══════════════════════════════════════════════════════════════════════

impl Callable for FunctionValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(
        &self,
        args: Vec<Value>,
        env: &mut Environment,
        ctx: &EvalContext,
    ) -> Result<Value, EvalError> {
        invoke(&self.name, &self.params, &self.body, None, args, env, ctx)
    }

    fn rebind(&self, home: &HashMap<String, Value>) -> Option<Value> {
        Some(Value::callable(ClosureValue {
            name: self.name.clone(),
            params: Arc::clone(&self.params),
            body: Arc::clone(&self.body),
            captures: captures_from(home, &self.params),
        }))
    }
}

impl Callable for AnonymousFn {
    fn name(&self) -> &str {
        "<anonymous>"
    }

    fn call(
        &self,
        args: Vec<Value>,
        env: &mut Environment,
        ctx: &EvalContext,
    ) -> Result<Value, EvalError> {
        invoke(self.name(), &self.params, &self.body, None, args, env, ctx)
    }
}

impl Callable for ClosureValue {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(
        &self,
        args: Vec<Value>,
        env: &mut Environment,
        ctx: &EvalContext,
    ) -> Result<Value, EvalError> {
        invoke(
            &self.name,
            &self.params,
            &self.body,
            Some(&self.captures),
            args,
            env,
            ctx,
        )
    }
}

impl Callable for TypedClosure {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(
        &self,
        args: Vec<Value>,
        env: &mut Environment,
        ctx: &EvalContext,
    ) -> Result<Value, EvalError> {
        let result = invoke(
            &self.name,
            &self.params,
            &self.body,
            Some(&self.captures),
            args,
            env,
            ctx,
        )?;

        match self.return_type {
            Some(expected) if !type_matches(expected, &result) => {
                Err(EvalError::type_error(format!(
                    "function `{}` must return {}, got {}",
                    self.name,
                    expected.as_str(),
                    type_name(&result)
                )))
            }
            _ => Ok(result),
        }
    }

    /// Only a global-scope definition, which captured nothing, is rebound.
    fn rebind(&self, home: &HashMap<String, Value>) -> Option<Value> {
        if !self.captures.is_empty() {
            return None;
        }
        Some(Value::callable(TypedClosure {
            captures: captures_from(home, &self.params),
            ..self.clone()
        }))
    }
}

fn captures_from(home: &HashMap<String, Value>, params: &[Param]) -> Arc<HashMap<String, Value>> {
    let mut captured = home.clone();
    for param in params {
        captured.remove(&param.name);
    }
    Arc::new(captured)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    fn function(name: &str, params: Vec<Param>, body: Expr) -> Value {
        Value::callable(FunctionValue {
            name: name.to_string(),
            params: Arc::new(params),
            body: Arc::new(body),
        })
    }

    #[test]
    fn test_too_many_arguments() {
        let f = function("f", vec![Param::new("a")], Expr::ident("a"));
        let mut env = Environment::new();
        let err = call_value(&f, vec![Value::Int(1), Value::Int(2)], &mut env, &EvalContext::new())
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::ArgumentCount {
                name: "f".to_string(),
                expected: 1,
                got: 2
            }
        );
    }

    #[test]
    fn test_missing_argument_without_default() {
        let f = function("f", vec![Param::new("a"), Param::new("b")], Expr::ident("a"));
        let mut env = Environment::new();
        let err = call_value(&f, vec![Value::Int(1)], &mut env, &EvalContext::new()).unwrap_err();
        assert_eq!(
            err,
            EvalError::MissingArgument {
                name: "f".to_string(),
                param: "b".to_string()
            }
        );
        assert_eq!(env.call_depth(), 0);
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_default_sees_earlier_parameter() {
        let f = function(
            "f",
            vec![
                Param::new("a"),
                Param::new("b").with_default(Expr::binary(
                    BinaryOp::Mul,
                    Expr::ident("a"),
                    Expr::int(2),
                )),
            ],
            Expr::binary(BinaryOp::Add, Expr::ident("a"), Expr::ident("b")),
        );
        let mut env = Environment::new();
        let ctx = EvalContext::new();
        assert_eq!(call_value(&f, vec![Value::Int(3)], &mut env, &ctx), Ok(Value::Int(9)));
        assert_eq!(
            call_value(&f, vec![Value::Int(3), Value::Int(1)], &mut env, &ctx),
            Ok(Value::Int(4))
        );
    }

    #[test]
    fn test_body_without_return_is_nil() {
        let f = function("f", vec![], Expr::body(vec![Expr::int(1), Expr::int(2)]));
        let mut env = Environment::new();
        assert_eq!(call_value(&f, vec![], &mut env, &EvalContext::new()), Ok(Value::Nil));
    }

    #[test]
    fn test_first_return_wins() {
        let f = function(
            "f",
            vec![],
            Expr::body(vec![
                Expr::if_(Expr::bool(true), vec![Expr::return_(Expr::int(1))], None),
                Expr::return_(Expr::int(2)),
            ]),
        );
        let mut env = Environment::new();
        assert_eq!(call_value(&f, vec![], &mut env, &EvalContext::new()), Ok(Value::Int(1)));
    }

    #[test]
    fn test_parameters_shadow_captures() {
        let mut captures = HashMap::new();
        captures.insert("x".to_string(), Value::Int(1));
        captures.insert("y".to_string(), Value::Int(10));
        let closure = Value::callable(ClosureValue {
            name: "<closure>".to_string(),
            params: Arc::new(vec![Param::new("x")]),
            body: Arc::new(Expr::binary(BinaryOp::Add, Expr::ident("x"), Expr::ident("y"))),
            captures: Arc::new(captures),
        });
        let mut env = Environment::new();
        assert_eq!(
            call_value(&closure, vec![Value::Int(5)], &mut env, &EvalContext::new()),
            Ok(Value::Int(15))
        );
    }

    #[test]
    fn test_recursion_ceiling_leaves_state_clean() {
        let mut env = Environment::with_max_call_depth(5);
        let looping = function(
            "loop_forever",
            vec![],
            Expr::call(Expr::ident("loop_forever"), vec![]),
        );
        env.define("loop_forever", looping.clone());

        let err = call_value(&looping, vec![], &mut env, &EvalContext::new()).unwrap_err();
        assert_eq!(err, EvalError::RecursionLimitExceeded { depth: 5, max: 5 });
        assert_eq!(env.call_depth(), 0);
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_not_callable() {
        let mut env = Environment::new();
        let err = call_value(&Value::Int(3), vec![], &mut env, &EvalContext::new()).unwrap_err();
        assert_eq!(
            err,
            EvalError::NotCallable {
                type_name: "int".to_string()
            }
        );
    }

    #[test]
    fn test_typed_closure_checks_arguments_and_result() {
        let typed = Value::callable(TypedClosure {
            name: "half".to_string(),
            params: Arc::new(vec![Param::new("n").with_type(TypeName::Float)]),
            body: Arc::new(Expr::binary(BinaryOp::Div, Expr::ident("n"), Expr::int(2))),
            captures: Arc::new(HashMap::new()),
            return_type: Some(TypeName::Int),
        });
        let mut env = Environment::new();
        let ctx = EvalContext::new();

        let err = call_value(&typed, vec![Value::string("x")], &mut env, &ctx).unwrap_err();
        assert!(matches!(err, EvalError::TypeError { .. }));

        // Division yields a float, which fails the int return annotation.
        let err = call_value(&typed, vec![Value::Int(4)], &mut env, &ctx).unwrap_err();
        assert!(err.to_string().contains("must return int"));
    }

    #[test]
    fn test_rebound_function_reads_its_home() {
        let get = function("get", vec![], Expr::ident("secret"));
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        assert!(call_value(&get, vec![], &mut env, &ctx).is_err());

        let home = HashMap::from([("secret".to_string(), Value::Int(7))]);
        let rebound = get.as_callable().unwrap().rebind(&home).unwrap();
        env.define("secret", Value::string("caller's"));
        assert_eq!(call_value(&rebound, vec![], &mut env, &ctx), Ok(Value::Int(7)));
    }
}
