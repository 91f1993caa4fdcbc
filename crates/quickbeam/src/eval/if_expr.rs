//! If expression evaluation

use super::block::eval_statements;
use super::{ControlFlow, Evaluate};
use crate::ast::IfExpr;
use crate::{Environment, EvalContext, EvalError};

impl Evaluate for IfExpr {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<ControlFlow, EvalError> {
        for branch in &self.branches {
            let condition = value_of!(branch.condition.eval(env, ctx));
            if condition.is_truthy() {
                let mut scope = env.scope_guard();
                return eval_statements(&branch.body, &mut scope, ctx);
            }
        }

        match &self.else_branch {
            Some(body) => {
                let mut scope = env.scope_guard();
                eval_statements(body, &mut scope, ctx)
            }
            None => Ok(ControlFlow::nil()),
        }
    }
}
