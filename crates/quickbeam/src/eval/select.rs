//! Select evaluation

use std::sync::Arc;

use super::block::eval_statements;
use super::{ControlFlow, Evaluate};
use crate::ast::{Expr, SelectArm, SelectCase};
use crate::error::type_name;
use crate::task::{self, Channel};
use crate::{Environment, EvalContext, EvalError, Value};

/// `select { case ... }`
///
/// Channel and payload expressions of every arm are evaluated up front, in
/// order. The chosen arm then runs in a fresh frame holding its binding.
pub fn eval_select(
    arms: &[SelectArm],
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<ControlFlow, EvalError> {
    let mut cases = Vec::with_capacity(arms.len());
    for arm in arms {
        let case = match &arm.case {
            SelectCase::Send { channel, value } => task::SelectCase::Send {
                channel: channel_of(value_of!(channel.eval(env, ctx)))?,
                value: value_of!(value.eval(env, ctx)),
            },
            SelectCase::Receive { channel, .. } => task::SelectCase::Receive {
                channel: channel_of(value_of!(channel.eval(env, ctx)))?,
            },
            SelectCase::Default => task::SelectCase::Default,
        };
        cases.push(case);
    }

    let selected = task::select(&cases)?;
    let arm = &arms[selected.index];

    let mut scope = env.scope_guard();
    if let SelectCase::Receive {
        binding: Some(name),
        ..
    } = &arm.case
    {
        scope.define(name.clone(), selected.value);
    }
    eval_statements(&arm.body, &mut scope, ctx)
}

fn channel_of(value: Value) -> Result<Arc<Channel>, EvalError> {
    match value {
        Value::Channel(channel) => Ok(channel),
        other => Err(EvalError::type_error(format!(
            "select case expects a channel, got `{}`",
            type_name(&other)
        ))),
    }
}
