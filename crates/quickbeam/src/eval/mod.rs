//! Expression evaluation

/// Evaluate an operand, forwarding any control signal to the caller.
///
/// `value_of!(expr.eval(env, ctx))` yields the plain value, or returns the
/// non-`Normal` flow from the enclosing function untouched.
macro_rules! value_of {
    ($flow:expr) => {
        match $flow? {
            $crate::eval::ControlFlow::Normal(value) => value,
            other => return Ok(other),
        }
    };
}

pub mod assign;
pub mod async_expr;
pub mod binary;
pub mod block;
pub mod call;
pub mod control;
pub mod function;
pub mod if_expr;
pub mod index;
pub mod literal;
pub mod loops;
pub mod match_expr;
pub mod module;
pub mod return_expr;
pub mod select;
pub mod unary;

use crate::ast::Expr;
use crate::{Environment, EvalContext, EvalError, Value};

/// Trait for evaluating AST nodes.
///
/// This is the core abstraction for the tree-walking interpreter. The
/// environment and context are passed explicitly; there is no ambient
/// "current scope".
pub trait Evaluate {
    /// Evaluate this AST node in the given environment.
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<ControlFlow, EvalError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Expression Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Expr {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<ControlFlow, EvalError> {
        match self {
            // Values
            Expr::Literal(lit) => lit.eval(env, ctx),
            Expr::Ident(name) => literal::eval_ident(name, env),
            Expr::Array(items) => literal::eval_array(items, env, ctx),
            Expr::Object(fields) => literal::eval_object(fields, env, ctx),
            Expr::StructLit { type_name, fields } => {
                literal::eval_struct(type_name, fields, env, ctx)
            }

            // Operators
            Expr::Binary { op, left, right } => binary::eval_binary(*op, left, right, env, ctx),
            Expr::Unary { op, operand } => unary::eval_unary(*op, operand, env, ctx),
            Expr::Index { target, index } => index::eval_index(target, index, env, ctx),
            Expr::Field { target, field } => index::eval_field(target, field, env, ctx),

            // Bindings
            Expr::Let {
                name,
                value,
                constant,
            } => assign::eval_let(name, value, *constant, env, ctx),
            Expr::Assign { name, value } => assign::eval_assign(name, value, env, ctx),
            Expr::MultiAssign { names, value } => {
                assign::eval_multi_assign(names, value, env, ctx)
            }

            // Control flow
            Expr::Body(statements) => block::eval_body(statements, env, ctx),
            Expr::If(expr) => expr.eval(env, ctx),
            Expr::For(expr) => expr.eval(env, ctx),
            Expr::Match(expr) => expr.eval(env, ctx),
            Expr::Return(value) => return_expr::eval_return(value.as_deref(), env, ctx),
            Expr::MultiReturn(values) => return_expr::eval_multi_return(values, env, ctx),
            Expr::Break => Ok(ControlFlow::Break),
            Expr::Yield(value) => return_expr::eval_yield(value, env, ctx),

            // Functions
            Expr::Call { callee, args } => call::eval_call(callee, args, env, ctx),
            Expr::Function(def) => def.eval(env, ctx),
            Expr::AnonymousFn(def) => Ok(function::make_anonymous(def).into()),
            Expr::Closure(def) => Ok(function::make_closure(def, env).into()),

            // Concurrency
            Expr::Async(body) => async_expr::eval_async(body, env, ctx),
            Expr::Await(expr) => async_expr::eval_await(expr, env, ctx),
            Expr::Sleep(ms) => async_expr::eval_sleep(ms, env, ctx),
            Expr::Select(arms) => select::eval_select(arms, env, ctx),

            // Modules
            Expr::Export { name, declaration } => {
                module::eval_export(name, declaration, env, ctx)
            }
            Expr::Import { module, spec } => module::eval_import(module, spec, env, ctx),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate an expression to a plain value, stripping any control signal.
pub fn eval_expr(
    expr: &Expr,
    env: &mut Environment,
    ctx: &EvalContext,
) -> Result<Value, EvalError> {
    expr.eval(env, ctx).map(ControlFlow::into_value)
}

// Re-export for use by other modules
pub use block::eval_statements;
pub use call::invoke;
pub use control::ControlFlow;
