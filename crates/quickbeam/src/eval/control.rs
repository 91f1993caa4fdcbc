//! Control flow signals for return/break/yield

use crate::Value;

/// The outcome of evaluating a node.
///
/// Almost everything produces `Normal`. The other variants are signals that
/// travel outward until the construct that consumes them: `Return` stops at
/// the enclosing call, `Break` at the enclosing loop, and `Yield` is
/// collected by the enclosing loop. Calls and task boundaries strip any
/// signal with [`ControlFlow::into_value`], so none escapes them.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlFlow {
    /// Plain value
    Normal(Value),

    /// `return value` on its way to the enclosing call
    Return(Value),

    /// `break` on its way to the enclosing loop
    Break,

    /// `yield value` on its way to the enclosing loop
    Yield(Value),
}

impl ControlFlow {
    /// `Normal(Nil)`
    pub fn nil() -> Self {
        ControlFlow::Normal(Value::Nil)
    }

    /// Whether this is a plain value.
    pub fn is_normal(&self) -> bool {
        matches!(self, ControlFlow::Normal(_))
    }

    /// Drop the signal, keeping the carried value (`Nil` for `Break`).
    pub fn into_value(self) -> Value {
        match self {
            ControlFlow::Normal(v) | ControlFlow::Return(v) | ControlFlow::Yield(v) => v,
            ControlFlow::Break => Value::Nil,
        }
    }
}

impl From<Value> for ControlFlow {
    fn from(value: Value) -> Self {
        ControlFlow::Normal(value)
    }
}
