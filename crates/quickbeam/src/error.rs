//! Error types for quickbeam evaluation

mod structured;

pub use structured::{ErrorCode, ErrorKind, StructuredError};

use thiserror::Error;

use crate::task::ChannelError;
use crate::Value;

/// Errors raised by the environment chain.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvironmentError {
    /// Name not bound anywhere in the chain
    #[error("undefined variable `{name}`")]
    UndefinedVariable {
        /// The missing name
        name: String,
    },

    /// Reassignment of a binding declared with `const`
    #[error("cannot assign to constant `{name}`")]
    ConstantAssignment {
        /// The constant's name
        name: String,
    },

    /// Function call depth would exceed the configured ceiling
    #[error("recursion limit exceeded: depth {depth} exceeds maximum of {max}")]
    RecursionLimitExceeded {
        /// Depth at the time of the failed call
        depth: usize,
        /// Configured ceiling
        max: usize,
    },

    /// Attempt to pop the root frame
    #[error("cannot pop the root frame")]
    RootFramePop,
}

/// Errors produced while evaluating an expression tree.
///
/// Every variant is fatal for the current evaluation. The only place one
/// becomes recoverable is a task boundary, where it is turned into a
/// promise rejection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Name not bound anywhere in the chain
    #[error("undefined variable `{name}`")]
    UndefinedVariable {
        /// The missing name
        name: String,
    },

    /// `let`/`const` of a name already bound in the innermost frame
    #[error("variable `{name}` is already defined in this scope")]
    AlreadyDefined {
        /// The duplicated name
        name: String,
    },

    /// Reassignment of a constant
    #[error("cannot assign to constant `{name}`")]
    ConstantAssignment {
        /// The constant's name
        name: String,
    },

    /// Generic type mismatch
    #[error("type error: {message}")]
    TypeError {
        /// Description of the mismatch
        message: String,
    },

    /// Binary operator applied to incompatible operand kinds
    #[error("cannot apply `{op}` to `{left_type}` and `{right_type}`")]
    InvalidBinaryOperands {
        /// The operator
        op: String,
        /// Kind of the left operand
        left_type: String,
        /// Kind of the right operand
        right_type: String,
    },

    /// Unary operator applied to an incompatible operand kind
    #[error("cannot apply unary `{op}` to `{operand_type}`")]
    InvalidUnaryOperand {
        /// The operator
        op: String,
        /// Kind of the operand
        operand_type: String,
    },

    /// Division or remainder by zero
    #[error("division by zero")]
    DivisionByZero,

    /// Index outside of a sequence
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfBounds {
        /// Requested index
        index: i64,
        /// Length of the indexed value
        len: usize,
    },

    /// Member access on a value without that field
    #[error("`{type_name}` has no field `{field}`")]
    UndefinedField {
        /// Field name
        field: String,
        /// Kind of the accessed value
        type_name: String,
    },

    /// Call of a value that is not callable
    #[error("`{type_name}` is not callable")]
    NotCallable {
        /// Kind of the called value
        type_name: String,
    },

    /// More arguments than declared parameters
    #[error("function `{name}` expects at most {expected} arguments, got {got}")]
    ArgumentCount {
        /// Callee name
        name: String,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        got: usize,
    },

    /// A required parameter received no argument and has no default
    #[error("function `{name}` is missing required argument `{param}`")]
    MissingArgument {
        /// Callee name
        name: String,
        /// Parameter name
        param: String,
    },

    /// Call depth ceiling reached
    #[error("recursion limit exceeded: depth {depth} exceeds maximum of {max}")]
    RecursionLimitExceeded {
        /// Depth at the time of the failed call
        depth: usize,
        /// Configured ceiling
        max: usize,
    },

    /// Environment misuse not covered by a more specific variant
    #[error("environment error: {0}")]
    Environment(EnvironmentError),

    /// An awaited promise was rejected
    #[error("promise rejected: {reason}")]
    PromiseRejected {
        /// Rejection payload, canonically formatted
        reason: String,
    },

    /// A blocking or non-blocking channel operation failed
    #[error("channel error: {0}")]
    Channel(#[from] ChannelError),

    /// `select` found no ready case and has no default
    #[error("select: all cases blocked and no default")]
    SelectBlocked,

    /// A native built-in reported failure
    #[error("{name}: {message}")]
    Builtin {
        /// Built-in name
        name: String,
        /// Failure description
        message: String,
    },

    /// Module loading or import failure
    #[error("module `{module}`: {message}")]
    Module {
        /// Module name
        module: String,
        /// Failure description
        message: String,
    },

    /// A task body panicked
    #[error("task panicked: {message}")]
    TaskPanicked {
        /// Panic payload, if it was textual
        message: String,
    },
}

impl From<EnvironmentError> for EvalError {
    fn from(err: EnvironmentError) -> Self {
        match err {
            EnvironmentError::UndefinedVariable { name } => EvalError::UndefinedVariable { name },
            EnvironmentError::ConstantAssignment { name } => {
                EvalError::ConstantAssignment { name }
            }
            EnvironmentError::RecursionLimitExceeded { depth, max } => {
                EvalError::RecursionLimitExceeded { depth, max }
            }
            other => EvalError::Environment(other),
        }
    }
}

impl EvalError {
    /// Shorthand for a [`EvalError::TypeError`].
    pub fn type_error(message: impl Into<String>) -> Self {
        EvalError::TypeError {
            message: message.into(),
        }
    }

    /// Shorthand for a [`EvalError::Builtin`].
    pub fn builtin(name: impl Into<String>, message: impl Into<String>) -> Self {
        EvalError::Builtin {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for evaluation
pub type Result<T> = std::result::Result<T, EvalError>;

/// The user-facing kind name of a value.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Nil => "nil",
        Value::Bool(_) => "bool",
        Value::Int(_) => "int",
        Value::Float(_) => "float",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Tuple(_) => "tuple",
        Value::Object(_) => "object",
        Value::Struct(_) => "struct",
        Value::Result(_) => "result",
        Value::Callable(_) => "function",
        Value::Promise(_) => "promise",
        Value::Channel(_) => "channel",
    }
}
