//! Function definitions and function literals

use std::collections::HashMap;
use std::sync::Arc;

use super::{ControlFlow, Evaluate};
use crate::ast::{FunctionDef, LambdaDef, Param};
use crate::value::{AnonymousFn, ClosureValue, FunctionValue, TypedClosure};
use crate::{Environment, EvalContext, EvalError, Value};

impl Evaluate for FunctionDef {
    /// Bind the function under its name in the current frame.
    ///
    /// Annotated definitions become typed closures. An untyped definition
    /// at global scope is a plain function; inside any nested scope it
    /// becomes a closure over the visible bindings.
    fn eval(&self, env: &mut Environment, _ctx: &EvalContext) -> Result<ControlFlow, EvalError> {
        let value = if self.is_typed() {
            let captures = if env.is_global_scope() {
                HashMap::new()
            } else {
                snapshot(env, &self.params)
            };
            Value::callable(TypedClosure {
                name: self.name.clone(),
                params: Arc::clone(&self.params),
                body: Arc::clone(&self.body),
                captures: Arc::new(captures),
                return_type: self.return_type,
            })
        } else if env.is_global_scope() {
            Value::callable(FunctionValue {
                name: self.name.clone(),
                params: Arc::clone(&self.params),
                body: Arc::clone(&self.body),
            })
        } else {
            Value::callable(ClosureValue {
                name: self.name.clone(),
                params: Arc::clone(&self.params),
                body: Arc::clone(&self.body),
                captures: Arc::new(snapshot(env, &self.params)),
            })
        };

        env.define(self.name.clone(), value);
        Ok(ControlFlow::nil())
    }
}

/// `fn(params) { body }` with no captures.
pub fn make_anonymous(def: &LambdaDef) -> Value {
    Value::callable(AnonymousFn {
        params: Arc::clone(&def.params),
        body: Arc::clone(&def.body),
    })
}

/// A closure literal, capturing every visible binding by value.
pub fn make_closure(def: &LambdaDef, env: &Environment) -> Value {
    Value::callable(ClosureValue {
        name: "<closure>".to_string(),
        params: Arc::clone(&def.params),
        body: Arc::clone(&def.body),
        captures: Arc::new(snapshot(env, &def.params)),
    })
}

/// Value copy of the visible bindings, minus the parameter names.
fn snapshot(env: &Environment, params: &[Param]) -> HashMap<String, Value> {
    let mut captured = env.flatten();
    for param in params {
        captured.remove(&param.name);
    }
    captured
}
