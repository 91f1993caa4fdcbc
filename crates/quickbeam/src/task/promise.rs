//! One-shot promises
//!
//! A promise starts pending and settles exactly once, either fulfilled with
//! a value or rejected with a reason. Waiters block on a condition variable;
//! continuations registered with [`Promise::on_settle`] run on whichever
//! thread settles the promise, or immediately if it already has.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::Value;

/// Settlement state.
#[derive(Debug, Clone, PartialEq)]
pub enum PromiseState {
    /// Not settled yet
    Pending,
    /// Settled with a result
    Fulfilled(Value),
    /// Settled with a failure reason
    Rejected(Value),
}

impl PromiseState {
    /// Short name used for display.
    pub fn name(&self) -> &'static str {
        match self {
            PromiseState::Pending => "pending",
            PromiseState::Fulfilled(_) => "fulfilled",
            PromiseState::Rejected(_) => "rejected",
        }
    }

    fn outcome(&self) -> Option<Result<Value, Value>> {
        match self {
            PromiseState::Pending => None,
            PromiseState::Fulfilled(v) => Some(Ok(v.clone())),
            PromiseState::Rejected(e) => Some(Err(e.clone())),
        }
    }
}

type Continuation = Box<dyn FnOnce(&PromiseState) + Send>;

struct Inner {
    state: PromiseState,
    continuations: Vec<Continuation>,
}

/// Handle to a value that will be available later.
pub struct Promise {
    inner: Mutex<Inner>,
    settled: Condvar,
}

impl std::fmt::Debug for Promise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Promise({})", self.state_name())
    }
}

impl Default for Promise {
    fn default() -> Self {
        Self::new()
    }
}

impl Promise {
    /// A new pending promise.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: PromiseState::Pending,
                continuations: Vec::new(),
            }),
            settled: Condvar::new(),
        }
    }

    /// A new pending promise behind an `Arc`.
    pub fn pending() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// An already-fulfilled promise.
    pub fn resolved(value: Value) -> Arc<Self> {
        let promise = Self::pending();
        promise.resolve(value);
        promise
    }

    /// An already-rejected promise.
    pub fn rejected(reason: Value) -> Arc<Self> {
        let promise = Self::pending();
        promise.reject(reason);
        promise
    }

    // ═══════════════════════════════════════════════════════════════════
    // Settlement
    // ═══════════════════════════════════════════════════════════════════

    /// Fulfil the promise. Returns `false` if it was already settled.
    pub fn resolve(&self, value: Value) -> bool {
        self.settle(PromiseState::Fulfilled(value))
    }

    /// Reject the promise. Returns `false` if it was already settled.
    pub fn reject(&self, reason: Value) -> bool {
        self.settle(PromiseState::Rejected(reason))
    }

    fn settle(&self, terminal: PromiseState) -> bool {
        let (state, continuations) = {
            let mut inner = self.inner.lock();
            if !matches!(inner.state, PromiseState::Pending) {
                return false;
            }
            tracing::trace!(state = terminal.name(), "promise settled");
            inner.state = terminal;
            let continuations = std::mem::take(&mut inner.continuations);
            (inner.state.clone(), continuations)
        };
        self.settled.notify_all();

        for continuation in continuations {
            continuation(&state);
        }
        true
    }

    /// Run `f` once the promise settles (immediately if it already has).
    pub fn on_settle(&self, f: impl FnOnce(&PromiseState) + Send + 'static) {
        let state = {
            let mut inner = self.inner.lock();
            if matches!(inner.state, PromiseState::Pending) {
                inner.continuations.push(Box::new(f));
                return;
            }
            inner.state.clone()
        };
        f(&state);
    }

    // ═══════════════════════════════════════════════════════════════════
    // Waiting
    // ═══════════════════════════════════════════════════════════════════

    /// Block until settled; `Ok` for fulfilment, `Err` for rejection.
    pub fn wait(&self) -> Result<Value, Value> {
        let mut inner = self.inner.lock();
        loop {
            if let Some(outcome) = inner.state.outcome() {
                return outcome;
            }
            self.settled.wait(&mut inner);
        }
    }

    /// Like [`Promise::wait`], giving up after `timeout`.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Result<Value, Value>> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.inner.lock();
        loop {
            if let Some(outcome) = inner.state.outcome() {
                return Some(outcome);
            }
            if self.settled.wait_until(&mut inner, deadline).timed_out() {
                return inner.state.outcome();
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Current state.
    pub fn state(&self) -> PromiseState {
        self.inner.lock().state.clone()
    }

    /// Short name of the current state.
    pub fn state_name(&self) -> &'static str {
        self.inner.lock().state.name()
    }

    /// The result, if fulfilled.
    pub fn value(&self) -> Option<Value> {
        match &self.inner.lock().state {
            PromiseState::Fulfilled(v) => Some(v.clone()),
            _ => None,
        }
    }

    /// The reason, if rejected.
    pub fn error(&self) -> Option<Value> {
        match &self.inner.lock().state {
            PromiseState::Rejected(e) => Some(e.clone()),
            _ => None,
        }
    }

    /// Whether the promise is still pending.
    pub fn is_pending(&self) -> bool {
        matches!(self.inner.lock().state, PromiseState::Pending)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Combinators
    // ═══════════════════════════════════════════════════════════════════

    /// Fulfils with every result in input order, or rejects with the first
    /// rejection observed. Non-promise inputs count as already fulfilled.
    pub fn all(items: Vec<Value>) -> Arc<Promise> {
        let aggregate = Promise::pending();
        if items.is_empty() {
            aggregate.resolve(Value::array(Vec::new()));
            return aggregate;
        }

        let slots = Arc::new(Mutex::new((vec![Value::Nil; items.len()], items.len())));
        for (index, item) in items.into_iter().enumerate() {
            let aggregate = Arc::clone(&aggregate);
            let slots = Arc::clone(&slots);
            as_promise(item).on_settle(move |state| match state {
                PromiseState::Fulfilled(value) => {
                    let finished = {
                        let mut slots = slots.lock();
                        let (values, remaining) = &mut *slots;
                        values[index] = value.clone();
                        *remaining -= 1;
                        (*remaining == 0).then(|| std::mem::take(values))
                    };
                    if let Some(values) = finished {
                        aggregate.resolve(Value::array(values));
                    }
                }
                PromiseState::Rejected(reason) => {
                    aggregate.reject(reason.clone());
                }
                PromiseState::Pending => {}
            });
        }
        aggregate
    }

    /// Fulfils with the first fulfilment; rejects once every input has
    /// rejected.
    pub fn any(items: Vec<Value>) -> Arc<Promise> {
        if items.is_empty() {
            return Promise::rejected(Value::string("No promises provided"));
        }

        let aggregate = Promise::pending();
        let remaining = Arc::new(Mutex::new(items.len()));
        for item in items {
            let aggregate = Arc::clone(&aggregate);
            let remaining = Arc::clone(&remaining);
            as_promise(item).on_settle(move |state| match state {
                PromiseState::Fulfilled(value) => {
                    aggregate.resolve(value.clone());
                }
                PromiseState::Rejected(_) => {
                    let exhausted = {
                        let mut remaining = remaining.lock();
                        *remaining -= 1;
                        *remaining == 0
                    };
                    if exhausted {
                        aggregate.reject(Value::string("All promises were rejected"));
                    }
                }
                PromiseState::Pending => {}
            });
        }
        aggregate
    }
}

fn as_promise(value: Value) -> Arc<Promise> {
    match value {
        Value::Promise(p) => p,
        other => Promise::resolved(other),
    }
}
