//! Program execution
//!
//! [`Interpreter`] owns a global environment with the prelude loaded and
//! runs whole programs against it. Top-level function definitions are
//! hoisted: they are bound before any other statement runs, so a program
//! may call a function declared further down.

use tracing::debug;

use crate::ast::Expr;
use crate::eval::{ControlFlow, Evaluate};
use crate::{Environment, EvalContext, EvalError, Value};

/// Run a program in `env`, hoisting its top-level functions first.
///
/// The result is the value of the last statement. A top-level `return`
/// ends the program early with its value.
pub fn run_program(
    program: &[Expr],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    let mut hoisted = 0;
    for expr in program {
        if let Expr::Function(def) = expr {
            def.eval(env, ctx)?;
            hoisted += 1;
        }
    }
    if hoisted > 0 {
        debug!(functions = hoisted, "hoisted top-level functions");
    }

    let mut last = Value::Nil;
    for expr in program {
        if matches!(expr, Expr::Function(_)) {
            continue;
        }
        match expr.eval(env, ctx)? {
            ControlFlow::Normal(value) => last = value,
            signal => return Ok(signal.into_value()),
        }
    }
    Ok(last)
}

/// A global environment plus the context programs run under.
///
/// # Example
///
/// ```
/// use quickbeam::ast::{BinaryOp, Expr, Param};
/// use quickbeam::{Interpreter, Value};
///
/// let program = vec![
///     Expr::call(Expr::ident("square"), vec![Expr::int(7)]),
///     Expr::function(
///         "square",
///         vec![Param::new("n")],
///         Expr::binary(BinaryOp::Mul, Expr::ident("n"), Expr::ident("n")),
///     ),
/// ];
///
/// let mut interpreter = Interpreter::new();
/// assert_eq!(interpreter.run(&program), Ok(Value::Int(49)));
/// ```
#[derive(Debug)]
pub struct Interpreter {
    env: Environment,
    ctx: EvalContext,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an interpreter with default settings.
    pub fn new() -> Self {
        Self::with_context(EvalContext::default())
    }

    /// Create an interpreter running under `ctx`.
    pub fn with_context(ctx: EvalContext) -> Self {
        let mut env = Environment::with_max_call_depth(ctx.max_call_depth);
        env.load_prelude();
        Self { env, ctx }
    }

    /// Run a program against the global environment.
    ///
    /// Bindings persist across calls, so a host can feed a program in
    /// pieces.
    pub fn run(&mut self, program: &[Expr]) -> Result<Value, EvalError> {
        run_program(program, &mut self.env, &self.ctx)
    }

    /// The global environment.
    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Mutable access to the global environment.
    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// The evaluation context.
    pub fn context(&self) -> &EvalContext {
        &self.ctx
    }
}
