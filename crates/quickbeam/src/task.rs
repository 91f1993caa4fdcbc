//! Concurrent tasks, promises, channels and select
//!
//! A task is an OS thread evaluating an expression against a private copy
//! of the spawning environment. Its outcome settles a [`Promise`]: the
//! body's value (control signals stripped) fulfils it, an evaluation error
//! or a panic rejects it with a textual reason. Tasks never share frames;
//! promises and channels are the only intentionally shared state.

mod channel;
mod promise;
mod select;

pub use channel::Channel;
pub use promise::{Promise, PromiseState};
pub use select::{select, SelectCase, Selected};

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::ast::Expr;
use crate::error::type_name;
use crate::eval::Evaluate;
use crate::{Environment, EvalContext, EvalError, Value};

/// Failures of channel operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelError {
    /// Send on a closed channel, or receive on a closed and drained one
    #[error("channel is closed")]
    Closed,

    /// A blocking operation waited the full timeout
    #[error("channel operation timed out")]
    Timeout,

    /// Non-blocking send found no room
    #[error("channel is full")]
    Full,

    /// Non-blocking receive found nothing
    #[error("channel is empty")]
    Empty,
}

static NEXT_TASK_ID: AtomicUsize = AtomicUsize::new(1);

fn thread_builder(kind: &str) -> (usize, thread::Builder) {
    let id = NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed);
    (id, thread::Builder::new().name(format!("quickbeam-{kind}-{id}")))
}

// ═══════════════════════════════════════════════════════════════════════
// Spawning
// ═══════════════════════════════════════════════════════════════════════

/// Start evaluating `body` on a new thread and return its promise.
///
/// The task sees a value copy of every binding visible in `env`; changes
/// on either side are invisible to the other. Returns immediately.
pub fn spawn(body: Arc<Expr>, env: &Environment, ctx: &EvalContext) -> Arc<Promise> {
    let promise = Promise::pending();
    let snapshot = env.flatten();
    let task_ctx = ctx.clone();
    let settle = Arc::clone(&promise);

    let (id, builder) = thread_builder("task");
    debug!(task = id, captured = snapshot.len(), "spawning task");
    let spawned = builder.spawn(move || run_task(id, &body, snapshot, &task_ctx, &settle));

    if let Err(err) = spawned {
        warn!(task = id, error = %err, "failed to spawn task");
        promise.reject(Value::string(format!("failed to spawn task: {err}")));
    }
    promise
}

#[tracing::instrument(level = "debug", skip(body, snapshot, ctx, promise))]
fn run_task(
    id: usize,
    body: &Expr,
    snapshot: HashMap<String, Value>,
    ctx: &EvalContext,
    promise: &Promise,
) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let mut env = Environment::from_snapshot(snapshot, ctx.max_call_depth);
        body.eval(&mut env, ctx).map(|flow| flow.into_value())
    }));

    match outcome {
        Ok(Ok(value)) => {
            debug!("task fulfilled");
            promise.resolve(value);
        }
        Ok(Err(err)) => {
            debug!(error = %err, "task rejected");
            promise.reject(Value::string(err.to_string()));
        }
        Err(payload) => {
            let err = EvalError::TaskPanicked {
                message: panic_message(payload.as_ref()),
            };
            warn!(error = %err, "task panicked");
            promise.reject(Value::string(err.to_string()));
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Timers
// ═══════════════════════════════════════════════════════════════════════

/// A promise fulfilled with `Nil` after `ms` milliseconds.
///
/// Floats truncate toward zero and negative delays clamp to zero.
///
/// # Errors
///
/// `TypeError` if `ms` is not a number.
pub fn sleep(ms: &Value) -> Result<Arc<Promise>, EvalError> {
    let millis = match ms {
        Value::Int(n) => *n,
        Value::Float(f) => f.trunc() as i64,
        other => {
            return Err(EvalError::type_error(format!(
                "sleep expects a number of milliseconds, got `{}`",
                type_name(other)
            )))
        }
    };
    let delay = Duration::from_millis(millis.max(0) as u64);

    let promise = Promise::pending();
    let settle = Arc::clone(&promise);
    let (id, builder) = thread_builder("sleep");
    let spawned = builder.spawn(move || {
        thread::sleep(delay);
        settle.resolve(Value::Nil);
    });
    if let Err(err) = spawned {
        warn!(task = id, error = %err, "failed to spawn timer");
        promise.reject(Value::string(format!("failed to spawn timer: {err}")));
    }
    Ok(promise)
}

/// Block until `value` settles if it is a promise; pass anything else
/// through unchanged.
///
/// # Errors
///
/// `PromiseRejected` carrying the rejection reason's text.
pub fn await_value(value: Value) -> Result<Value, EvalError> {
    match value {
        Value::Promise(promise) => promise.wait().map_err(|reason| EvalError::PromiseRejected {
            reason: reason.to_string(),
        }),
        other => Ok(other),
    }
}
