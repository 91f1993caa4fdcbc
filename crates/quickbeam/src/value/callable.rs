//! Callable value types: functions, closures, and builtins
//!
//! The data lives here; the call protocol that runs interpreted bodies is in
//! `eval::call`.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::Value;
use crate::ast::{Expr, Param, TypeName};
use crate::{Environment, EvalContext, EvalError};

/// Anything the call evaluator can invoke.
///
/// Implementors receive the caller's environment so interpreted bodies can
/// push their function frame on top of it, and so built-ins like `map` can
/// call back into other callables.
pub trait Callable: Send + Sync {
    /// Name used in error messages and display.
    fn name(&self) -> &str;

    /// Invoke with already-evaluated arguments.
    fn call(
        &self,
        args: Vec<Value>,
        env: &mut Environment,
        ctx: &EvalContext,
    ) -> Result<Value, EvalError>;

    /// A copy of this callable that resolves free names against `home`
    /// instead of its caller's chain.
    ///
    /// `None` for callables that already own their bindings.
    fn rebind(&self, _home: &HashMap<String, Value>) -> Option<Value> {
        None
    }
}

impl fmt::Debug for dyn Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<function {}>", self.name())
    }
}

/// Type alias for builtin function pointers to reduce complexity
pub type BuiltinFnPtr =
    Arc<dyn Fn(&[Value], &mut Environment, &EvalContext) -> Result<Value, EvalError> + Send + Sync>;

/// A named top-level function.
///
/// Hoisted before the program runs, so it carries no snapshot: it resolves
/// free names against whatever chain it is called on. A module rebinds its
/// exported functions to the module's bindings before handing them out.
#[derive(Debug, Clone)]
pub struct FunctionValue {
    /// Function name
    pub name: String,

    /// Declared parameters
    pub params: Arc<Vec<Param>>,

    /// The function body
    pub body: Arc<Expr>,
}

/// A capture-free anonymous function.
#[derive(Debug, Clone)]
pub struct AnonymousFn {
    /// Declared parameters
    pub params: Arc<Vec<Param>>,

    /// The function body
    pub body: Arc<Expr>,
}

/// A closure with a captured environment snapshot.
///
/// The snapshot is a value copy of every binding visible at definition time
/// minus the closure's own parameter names, so later changes to the
/// defining scope are not observed.
#[derive(Debug, Clone)]
pub struct ClosureValue {
    /// Name (`<closure>` for literals)
    pub name: String,

    /// Declared parameters
    pub params: Arc<Vec<Param>>,

    /// The closure body
    pub body: Arc<Expr>,

    /// Captured variables (name -> value)
    /// Uses Arc to allow sharing between closure copies
    pub captures: Arc<HashMap<String, Value>>,
}

/// A closure whose parameters and result carry type annotations.
#[derive(Debug, Clone)]
pub struct TypedClosure {
    /// Function name
    pub name: String,

    /// Declared parameters (annotations are checked on every call)
    pub params: Arc<Vec<Param>>,

    /// The function body
    pub body: Arc<Expr>,

    /// Captured variables (name -> value)
    pub captures: Arc<HashMap<String, Value>>,

    /// Checked against the result
    pub return_type: Option<TypeName>,
}

/// A built-in native function.
///
/// These are Rust functions exposed to the interpreter.
#[derive(Clone)]
pub struct BuiltinFn {
    /// Function name (for display/debugging)
    pub name: String,

    /// Arity (-1 for variadic)
    pub arity: i32,

    /// The actual function pointer
    /// Uses a trait object for flexibility
    pub func: BuiltinFnPtr,
}

impl BuiltinFn {
    /// Wrap a native function.
    pub fn new<F>(name: impl Into<String>, arity: i32, func: F) -> Self
    where
        F: Fn(&[Value], &mut Environment, &EvalContext) -> Result<Value, EvalError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            name: name.into(),
            arity,
            func: Arc::new(func),
        }
    }
}

impl fmt::Debug for BuiltinFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BuiltinFn({})", self.name)
    }
}

impl Callable for BuiltinFn {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(
        &self,
        args: Vec<Value>,
        env: &mut Environment,
        ctx: &EvalContext,
    ) -> Result<Value, EvalError> {
        // Check arity (if not variadic)
        if self.arity >= 0 && args.len() != self.arity as usize {
            return Err(EvalError::ArgumentCount {
                name: self.name.clone(),
                expected: self.arity as usize,
                got: args.len(),
            });
        }
        (self.func)(&args, env, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_checks_arity() {
        let double = BuiltinFn::new("double", 1, |args, _, _| {
            Ok(Value::Int(args[0].as_int().unwrap_or(0) * 2))
        });
        let mut env = Environment::new();
        let ctx = EvalContext::default();

        let result = double.call(vec![Value::Int(21)], &mut env, &ctx);
        assert_eq!(result, Ok(Value::Int(42)));

        let err = double.call(vec![], &mut env, &ctx).unwrap_err();
        assert!(matches!(
            err,
            EvalError::ArgumentCount {
                expected: 1,
                got: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_variadic_builtin_accepts_any_count() {
        let count = BuiltinFn::new("count", -1, |args, _, _| Ok(Value::Int(args.len() as i64)));
        let mut env = Environment::new();
        let ctx = EvalContext::default();
        let args = vec![Value::Nil, Value::Nil, Value::Nil];
        assert_eq!(count.call(args, &mut env, &ctx), Ok(Value::Int(3)));
    }
}
