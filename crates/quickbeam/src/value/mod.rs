//! Value representation for runtime values

mod callable;
mod coerce;
mod compound;
mod display;
mod impls;
pub mod ops;

pub use callable::{
    AnonymousFn, BuiltinFn, BuiltinFnPtr, Callable, ClosureValue, FunctionValue, TypedClosure,
};
pub use compound::StructValue;

use std::sync::Arc;

use indexmap::IndexMap;

use crate::task::{Channel, Promise};

/// Runtime value representation for the quickbeam runtime.
///
/// Values are organized into three tiers:
/// - Tier 1: Inline primitives (no allocation)
/// - Tier 2: Heap-allocated compound types (Arc-wrapped, cheap to clone)
/// - Tier 3: Shared runtime objects (callables, promises, channels)
///
/// Control signals (`return`, `break`, `yield`) are not part of the value;
/// they travel alongside it as [`crate::ControlFlow`].
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Inline Primitives
    // ═══════════════════════════════════════════════════════════════════
    /// Absence of a value
    Nil,

    /// Boolean: `true` or `false`
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Heap-Allocated Compound Types
    // ═══════════════════════════════════════════════════════════════════
    /// Immutable string
    String(Arc<String>),

    /// Ordered sequence
    Array(Arc<Vec<Value>>),

    /// Multi-value pack produced by `return a, b`
    Tuple(Arc<Vec<Value>>),

    /// String-keyed map preserving insertion order
    Object(Arc<IndexMap<String, Value>>),

    /// Named record
    Struct(Arc<StructValue>),

    /// Structured success/failure wrapper
    Result(Arc<Result<Value, Value>>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Shared Runtime Objects
    // ═══════════════════════════════════════════════════════════════════
    /// Anything invocable: functions, closures, built-ins
    Callable(Arc<dyn Callable>),

    /// Handle to the eventual result of a task
    Promise(Arc<Promise>),

    /// Bounded FIFO shared between tasks
    Channel(Arc<Channel>),
}
