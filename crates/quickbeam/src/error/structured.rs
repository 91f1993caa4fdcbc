//! Structured error values for built-ins that prefer failure over abort
//!
//! Structural violations normally abort evaluation with an [`EvalError`].
//! Built-ins that want to hand the failure back to the program instead wrap
//! a [`StructuredError`] in `Value::Result(Err(..))`. The taxonomy and the
//! codes are stable: programs may match on them.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use super::EvalError;
use crate::Value;

/// Error taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Generic runtime failure
    Runtime,
    /// Operand or argument of the wrong kind
    Type,
    /// Wrong number of arguments
    Argument,
    /// Unknown name
    Reference,
    /// Bad index
    Index,
    /// Unknown field
    Attribute,
    /// Right kind, wrong value
    Value,
}

impl ErrorKind {
    /// Name used in formatted output and error objects.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Runtime => "RuntimeError",
            ErrorKind::Type => "TypeError",
            ErrorKind::Argument => "ArgumentError",
            ErrorKind::Reference => "ReferenceError",
            ErrorKind::Index => "IndexError",
            ErrorKind::Attribute => "AttributeError",
            ErrorKind::Value => "ValueError",
        }
    }
}

/// Stable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCode {
    /// E001
    WrongArgCount,
    /// E002
    InvalidArgType,
    /// E003
    MissingRequiredArg,
    /// E101
    UndefinedVariable,
    /// E102
    UndefinedFunction,
    /// E201
    IndexOutOfBounds,
    /// E202
    InvalidIndexType,
    /// E301
    TypeMismatch,
    /// E302
    CannotConvert,
    /// E303
    InvalidOperation,
    /// E401
    InvalidValue,
    /// E402
    EmptyContainer,
    /// E403
    ReadonlyVariable,
}

impl ErrorCode {
    /// The code as it appears to programs, e.g. `"E001"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::WrongArgCount => "E001",
            ErrorCode::InvalidArgType => "E002",
            ErrorCode::MissingRequiredArg => "E003",
            ErrorCode::UndefinedVariable => "E101",
            ErrorCode::UndefinedFunction => "E102",
            ErrorCode::IndexOutOfBounds => "E201",
            ErrorCode::InvalidIndexType => "E202",
            ErrorCode::TypeMismatch => "E301",
            ErrorCode::CannotConvert => "E302",
            ErrorCode::InvalidOperation => "E303",
            ErrorCode::InvalidValue => "E401",
            ErrorCode::EmptyContainer => "E402",
            ErrorCode::ReadonlyVariable => "E403",
        }
    }
}

/// A tagged, inspectable failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructuredError {
    /// Taxonomy bucket
    pub kind: ErrorKind,
    /// Stable code
    pub code: ErrorCode,
    /// Human-readable description
    pub message: String,
    /// Where it happened (function name, module, ...)
    pub context: Option<String>,
    /// Hints for fixing it
    pub suggestions: Vec<String>,
}

impl StructuredError {
    /// Create a new structured error.
    pub fn new(kind: ErrorKind, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            kind,
            code,
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    /// Attach a context (builder pattern).
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a suggestion (builder pattern).
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Wrong number of arguments passed to `function`.
    pub fn argument_count(function: &str, expected: usize, got: usize) -> Self {
        Self::new(
            ErrorKind::Argument,
            ErrorCode::WrongArgCount,
            format!("function '{function}' expects {expected} arguments, got {got}"),
        )
        .with_context(function)
        .with_suggestion(format!("pass exactly {expected} arguments"))
    }

    /// Argument of the wrong kind.
    pub fn invalid_argument(function: &str, expected: &str, got: &str) -> Self {
        Self::new(
            ErrorKind::Type,
            ErrorCode::InvalidArgType,
            format!("function '{function}' expected {expected}, got {got}"),
        )
        .with_context(function)
    }

    /// Convert into the object representation seen by programs.
    pub fn into_value(self) -> Value {
        let mut fields = IndexMap::new();
        fields.insert("type".to_string(), Value::string(self.kind.as_str()));
        fields.insert("code".to_string(), Value::string(self.code.as_str()));
        fields.insert("message".to_string(), Value::string(self.message));
        fields.insert(
            "context".to_string(),
            self.context.map(Value::string).unwrap_or(Value::Nil),
        );
        fields.insert(
            "suggestions".to_string(),
            Value::array(self.suggestions.into_iter().map(Value::string).collect()),
        );
        Value::object(fields)
    }

    /// Wrap as a failed `Value::Result`.
    pub fn into_err_value(self) -> Value {
        Value::err(self.into_value())
    }
}

impl fmt::Display for StructuredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})",
            self.kind.as_str(),
            self.message,
            self.code.as_str()
        )?;
        if let Some(context) = &self.context {
            write!(f, "\nContext: {context}")?;
        }
        for suggestion in &self.suggestions {
            write!(f, "\n  - {suggestion}")?;
        }
        Ok(())
    }
}

impl From<&EvalError> for StructuredError {
    fn from(err: &EvalError) -> Self {
        let (kind, code) = match err {
            EvalError::UndefinedVariable { .. } => {
                (ErrorKind::Reference, ErrorCode::UndefinedVariable)
            }
            EvalError::NotCallable { .. } => (ErrorKind::Reference, ErrorCode::UndefinedFunction),
            EvalError::ConstantAssignment { .. } => {
                (ErrorKind::Value, ErrorCode::ReadonlyVariable)
            }
            EvalError::TypeError { .. } => (ErrorKind::Type, ErrorCode::TypeMismatch),
            EvalError::InvalidBinaryOperands { .. } | EvalError::InvalidUnaryOperand { .. } => {
                (ErrorKind::Type, ErrorCode::InvalidOperation)
            }
            EvalError::IndexOutOfBounds { .. } => (ErrorKind::Index, ErrorCode::IndexOutOfBounds),
            EvalError::UndefinedField { .. } => (ErrorKind::Attribute, ErrorCode::InvalidValue),
            EvalError::ArgumentCount { .. } => (ErrorKind::Argument, ErrorCode::WrongArgCount),
            EvalError::MissingArgument { .. } => {
                (ErrorKind::Argument, ErrorCode::MissingRequiredArg)
            }
            EvalError::DivisionByZero => (ErrorKind::Value, ErrorCode::InvalidValue),
            _ => (ErrorKind::Runtime, ErrorCode::InvalidOperation),
        };
        StructuredError::new(kind, code, err.to_string())
    }
}
