//! Loop expression evaluation

use super::{ControlFlow, Evaluate};
use crate::ast::ForExpr;
use crate::{Environment, EvalContext, EvalError, Value};

// ═══════════════════════════════════════════════════════════════════════
// for expression
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for ForExpr {
    /// `for (init; condition; step) { body }`
    ///
    /// The init runs once in a loop frame; every iteration gets its own
    /// frame on top of it. `Return` leaves immediately, `Break` ends the
    /// loop without running the step, and each `Yield` is collected. The
    /// loop's value is the array of yielded values.
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<ControlFlow, EvalError> {
        let mut loop_scope = env.scope_guard();
        let env: &mut Environment = &mut loop_scope;

        if let Some(init) = &self.init {
            value_of!(init.eval(env, ctx));
        }

        let mut yielded = Vec::new();
        'iterations: loop {
            if let Some(condition) = &self.condition {
                if !value_of!(condition.eval(env, ctx)).is_truthy() {
                    break;
                }
            }

            {
                let mut iteration = env.scope_guard();
                for statement in &self.body {
                    match statement.eval(&mut iteration, ctx)? {
                        ControlFlow::Normal(_) => {}
                        ControlFlow::Yield(value) => yielded.push(value),
                        ControlFlow::Break => break 'iterations,
                        ret @ ControlFlow::Return(_) => return Ok(ret),
                    }
                }
            }

            if let Some(step) = &self.step {
                value_of!(step.eval(env, ctx));
            }
        }

        Ok(ControlFlow::Normal(Value::array(yielded)))
    }
}
