//! # Quickbeam
//!
//! The runtime core of a tree-walking interpreter for a small dynamic
//! scripting language.
//!
//! Quickbeam evaluates an expression tree ([`ast::Expr`]) produced by a
//! front end it does not ship. It provides the value model, a lexical
//! environment chain with a recursion ceiling, first-class functions and
//! closures, non-local control flow, and thread-backed tasks that
//! communicate through promises and channels.
//!
//! ## Architecture
//!
//! - **Values**: a closed [`Value`] enum; control signals travel beside it
//!   as [`ControlFlow`]
//! - **Environment**: a chain of frames passed explicitly as
//!   `&mut Environment` to every evaluation
//! - **Evaluation**: the [`Evaluate`] trait, implemented by every node
//! - **Tasks**: OS threads evaluating against a value copy of their
//!   spawner's bindings, settling a [`Promise`]
//! - **Modules**: loaded through host-supplied [`module::ModuleSource`] and
//!   [`module::SourceTranslator`] implementations
//!
//! ## Example
//!
//! ```
//! use quickbeam::ast::{BinaryOp, Expr, Param};
//! use quickbeam::{Interpreter, Value};
//!
//! let program = vec![
//!     Expr::let_("base", Expr::int(10)),
//!     Expr::let_(
//!         "add_base",
//!         Expr::closure(
//!             vec![Param::new("n")],
//!             Expr::binary(BinaryOp::Add, Expr::ident("n"), Expr::ident("base")),
//!         ),
//!     ),
//!     Expr::assign("base", Expr::int(1000)),
//!     Expr::call(Expr::ident("add_base"), vec![Expr::int(5)]),
//! ];
//!
//! let mut interpreter = Interpreter::new();
//! assert_eq!(interpreter.run(&program), Ok(Value::Int(15)));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod ast;
pub mod context;
pub mod environment;
pub mod error;
pub mod eval;
pub mod evaluator;
pub mod module;
pub mod stack;
pub mod task;
pub mod value;

// Re-export main types
pub use context::{EvalContext, RuntimeConfig};
pub use environment::{Binding, CallGuard, Environment, ScopeGuard};
pub use error::{
    EnvironmentError, ErrorCode, ErrorKind, EvalError, Result, StructuredError,
};
pub use eval::{eval_expr, eval_statements, invoke, ControlFlow, Evaluate};
pub use evaluator::{run_program, Interpreter};
pub use module::{Module, ModuleRegistry, ModuleSource, SourceTranslator};
pub use task::{Channel, ChannelError, Promise, PromiseState};
pub use value::{
    AnonymousFn, BuiltinFn, BuiltinFnPtr, Callable, ClosureValue, FunctionValue, StructValue,
    TypedClosure, Value,
};

/// Quickbeam version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
