//! Expression tree consumed by the evaluator
//!
//! A front end (not part of this crate) produces `Expr` values; the
//! evaluator walks them directly. Nodes that are captured by callables or
//! moved into task threads keep their children behind `Arc` so capturing
//! them never deep-copies the tree.
//!
//! The associated constructors (`Expr::int`, `Expr::call`, ...) exist so
//! hosts and tests can build programs without a parser.

use std::sync::Arc;

// ═══════════════════════════════════════════════════════════════════════
// Operators
// ═══════════════════════════════════════════════════════════════════════

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `&&`
    And,
    /// `||`
    Or,
}

impl BinaryOp {
    /// Source spelling of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `!`
    Not,
}

impl UnaryOp {
    /// Source spelling of the operator.
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Literals and Types
// ═══════════════════════════════════════════════════════════════════════

/// Literal constants.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// `nil`
    Nil,
    /// `true` / `false`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal
    String(String),
}

/// Parameter and return type annotations understood by typed closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// `int`
    Int,
    /// `float` (accepts ints too)
    Float,
    /// `string`
    String,
    /// `bool`
    Bool,
    /// `array`
    Array,
    /// `object`
    Object,
    /// `any`
    Any,
}

impl TypeName {
    /// Parse an annotation; unknown names yield `None`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "int" => Some(TypeName::Int),
            "float" => Some(TypeName::Float),
            "string" => Some(TypeName::String),
            "bool" => Some(TypeName::Bool),
            "array" => Some(TypeName::Array),
            "object" => Some(TypeName::Object),
            "any" => Some(TypeName::Any),
            _ => None,
        }
    }

    /// Annotation spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::String => "string",
            TypeName::Bool => "bool",
            TypeName::Array => "array",
            TypeName::Object => "object",
            TypeName::Any => "any",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Functions
// ═══════════════════════════════════════════════════════════════════════

/// A declared parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    /// Parameter name
    pub name: String,
    /// Default expression, evaluated inside the callee's frame
    pub default: Option<Expr>,
    /// Optional type annotation
    pub type_name: Option<TypeName>,
}

impl Param {
    /// A required, untyped parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            type_name: None,
        }
    }

    /// Attach a default (builder pattern).
    pub fn with_default(mut self, default: Expr) -> Self {
        self.default = Some(default);
        self
    }

    /// Attach a type annotation (builder pattern).
    pub fn with_type(mut self, type_name: TypeName) -> Self {
        self.type_name = Some(type_name);
        self
    }
}

/// A named function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    /// Function name
    pub name: String,
    /// Parameters in declaration order
    pub params: Arc<Vec<Param>>,
    /// Function body
    pub body: Arc<Expr>,
    /// Optional return annotation
    pub return_type: Option<TypeName>,
}

impl FunctionDef {
    /// Whether any parameter or the return value carries an annotation.
    pub fn is_typed(&self) -> bool {
        self.return_type.is_some() || self.params.iter().any(|p| p.type_name.is_some())
    }
}

/// An anonymous function or closure literal.
#[derive(Debug, Clone, PartialEq)]
pub struct LambdaDef {
    /// Parameters in declaration order
    pub params: Arc<Vec<Param>>,
    /// Body
    pub body: Arc<Expr>,
}

// ═══════════════════════════════════════════════════════════════════════
// Control Flow Nodes
// ═══════════════════════════════════════════════════════════════════════

/// One `condition { statements }` arm of an if chain.
#[derive(Debug, Clone, PartialEq)]
pub struct IfBranch {
    /// Guard
    pub condition: Expr,
    /// Statements run when the guard is truthy
    pub body: Vec<Expr>,
}

/// `if / else if / else`.
#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    /// Guarded branches, tried in order
    pub branches: Vec<IfBranch>,
    /// Statements run when no guard held
    pub else_branch: Option<Vec<Expr>>,
}

/// C-style `for (init; condition; step) { body }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ForExpr {
    /// Runs once in the loop frame
    pub init: Option<Box<Expr>>,
    /// Checked before every iteration; absent means forever
    pub condition: Option<Box<Expr>>,
    /// Runs after every completed iteration
    pub step: Option<Box<Expr>>,
    /// Loop body
    pub body: Vec<Expr>,
}

/// Match arm pattern.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `_`
    Wildcard,
    /// A value compared with strict kind equality
    Value(Expr),
}

/// One arm of a match.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    /// Pattern
    pub pattern: Pattern,
    /// Arm result
    pub body: Expr,
}

/// `match scrutinee { arms }`.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchExpr {
    /// Value under test, evaluated once
    pub scrutinee: Box<Expr>,
    /// Arms in declaration order
    pub arms: Vec<MatchArm>,
}

// ═══════════════════════════════════════════════════════════════════════
// Concurrency Nodes
// ═══════════════════════════════════════════════════════════════════════

/// The readiness test of a select arm.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectCase {
    /// `case ch <- value`
    Send {
        /// Channel expression
        channel: Expr,
        /// Value to send
        value: Expr,
    },
    /// `case [binding =] <-ch`
    Receive {
        /// Channel expression
        channel: Expr,
        /// Name the received value is bound to
        binding: Option<String>,
    },
    /// `default`
    Default,
}

/// One arm of a select.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectArm {
    /// Readiness test
    pub case: SelectCase,
    /// Statements run when the arm is chosen
    pub body: Vec<Expr>,
}

// ═══════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════

/// What an import brings into scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportSpec {
    /// Every export under its own name
    All,
    /// Only the named exports
    Items(Vec<String>),
    /// The exports as an object bound to this name
    Alias(String),
}

// ═══════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════

/// An evaluable node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant
    Literal(Literal),
    /// Variable reference
    Ident(String),
    /// `[a, b, c]`
    Array(Vec<Expr>),
    /// `{ key: value, ... }`
    Object(Vec<(String, Expr)>),
    /// `Name { field: value, ... }`
    StructLit {
        /// Struct type name
        type_name: String,
        /// Field initializers in order
        fields: Vec<(String, Expr)>,
    },
    /// `left op right`
    Binary {
        /// Operator
        op: BinaryOp,
        /// Left operand
        left: Box<Expr>,
        /// Right operand
        right: Box<Expr>,
    },
    /// `op operand`
    Unary {
        /// Operator
        op: UnaryOp,
        /// Operand
        operand: Box<Expr>,
    },
    /// `target[index]`
    Index {
        /// Indexed value
        target: Box<Expr>,
        /// Index
        index: Box<Expr>,
    },
    /// `target.field`
    Field {
        /// Accessed value
        target: Box<Expr>,
        /// Field name
        field: String,
    },
    /// `let name = value` / `const name = value`
    Let {
        /// Bound name
        name: String,
        /// Initializer
        value: Box<Expr>,
        /// Whether the binding rejects reassignment
        constant: bool,
    },
    /// `name = value`
    Assign {
        /// Target name
        name: String,
        /// New value
        value: Box<Expr>,
    },
    /// `callee(args)`
    Call {
        /// Called expression
        callee: Box<Expr>,
        /// Arguments
        args: Vec<Expr>,
    },
    /// `{ statements }`
    Body(Vec<Expr>),
    /// If chain
    If(IfExpr),
    /// For loop
    For(ForExpr),
    /// Match
    Match(MatchExpr),
    /// `return [value]`
    Return(Option<Box<Expr>>),
    /// `return a, b, c`
    MultiReturn(Vec<Expr>),
    /// `a, b, c = value`
    MultiAssign {
        /// Target names in order
        names: Vec<String>,
        /// Source value
        value: Box<Expr>,
    },
    /// `break`
    Break,
    /// `yield value`
    Yield(Box<Expr>),
    /// `func name(params) { body }`
    Function(FunctionDef),
    /// Capture-free anonymous function
    AnonymousFn(LambdaDef),
    /// Closure capturing its defining scope
    Closure(LambdaDef),
    /// `async { body }`
    Async(Arc<Expr>),
    /// `await expr`
    Await(Box<Expr>),
    /// `sleep(ms)`
    Sleep(Box<Expr>),
    /// `select { arms }`
    Select(Vec<SelectArm>),
    /// `export declaration`
    Export {
        /// Exported name
        name: String,
        /// Declaration producing the exported value
        declaration: Box<Expr>,
    },
    /// `import ...`
    Import {
        /// Module name
        module: String,
        /// What to bring into scope
        spec: ImportSpec,
    },
}

// ═══════════════════════════════════════════════════════════════════════
// Builders
// ═══════════════════════════════════════════════════════════════════════

impl Expr {
    /// `nil`
    pub fn nil() -> Self {
        Expr::Literal(Literal::Nil)
    }

    /// Boolean literal
    pub fn bool(b: bool) -> Self {
        Expr::Literal(Literal::Bool(b))
    }

    /// Integer literal
    pub fn int(n: i64) -> Self {
        Expr::Literal(Literal::Int(n))
    }

    /// Float literal
    pub fn float(n: f64) -> Self {
        Expr::Literal(Literal::Float(n))
    }

    /// String literal
    pub fn string(s: impl Into<String>) -> Self {
        Expr::Literal(Literal::String(s.into()))
    }

    /// Variable reference
    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    /// Binary operation
    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Unary operation
    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    /// Index access
    pub fn index(target: Expr, index: Expr) -> Self {
        Expr::Index {
            target: Box::new(target),
            index: Box::new(index),
        }
    }

    /// Field access
    pub fn field(target: Expr, field: impl Into<String>) -> Self {
        Expr::Field {
            target: Box::new(target),
            field: field.into(),
        }
    }

    /// `let name = value`
    pub fn let_(name: impl Into<String>, value: Expr) -> Self {
        Expr::Let {
            name: name.into(),
            value: Box::new(value),
            constant: false,
        }
    }

    /// `const name = value`
    pub fn const_(name: impl Into<String>, value: Expr) -> Self {
        Expr::Let {
            name: name.into(),
            value: Box::new(value),
            constant: true,
        }
    }

    /// `name = value`
    pub fn assign(name: impl Into<String>, value: Expr) -> Self {
        Expr::Assign {
            name: name.into(),
            value: Box::new(value),
        }
    }

    /// Call
    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            callee: Box::new(callee),
            args,
        }
    }

    /// Block of statements
    pub fn body(statements: Vec<Expr>) -> Self {
        Expr::Body(statements)
    }

    /// `if condition { then } [else { otherwise }]`
    pub fn if_(condition: Expr, then: Vec<Expr>, otherwise: Option<Vec<Expr>>) -> Self {
        Expr::If(IfExpr {
            branches: vec![IfBranch {
                condition,
                body: then,
            }],
            else_branch: otherwise,
        })
    }

    /// C-style for loop
    pub fn for_(
        init: Option<Expr>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: Vec<Expr>,
    ) -> Self {
        Expr::For(ForExpr {
            init: init.map(Box::new),
            condition: condition.map(Box::new),
            step: step.map(Box::new),
            body,
        })
    }

    /// Match
    pub fn match_(scrutinee: Expr, arms: Vec<MatchArm>) -> Self {
        Expr::Match(MatchExpr {
            scrutinee: Box::new(scrutinee),
            arms,
        })
    }

    /// `return value`
    pub fn return_(value: Expr) -> Self {
        Expr::Return(Some(Box::new(value)))
    }

    /// `yield value`
    pub fn yield_(value: Expr) -> Self {
        Expr::Yield(Box::new(value))
    }

    /// `a, b = value`
    pub fn multi_assign(names: &[&str], value: Expr) -> Self {
        Expr::MultiAssign {
            names: names.iter().map(|n| n.to_string()).collect(),
            value: Box::new(value),
        }
    }

    /// Named function declaration
    pub fn function(name: impl Into<String>, params: Vec<Param>, body: Expr) -> Self {
        Expr::Function(FunctionDef {
            name: name.into(),
            params: Arc::new(params),
            body: Arc::new(body),
            return_type: None,
        })
    }

    /// Closure literal
    pub fn closure(params: Vec<Param>, body: Expr) -> Self {
        Expr::Closure(LambdaDef {
            params: Arc::new(params),
            body: Arc::new(body),
        })
    }

    /// Capture-free anonymous function literal
    pub fn anonymous(params: Vec<Param>, body: Expr) -> Self {
        Expr::AnonymousFn(LambdaDef {
            params: Arc::new(params),
            body: Arc::new(body),
        })
    }

    /// `async { body }`
    pub fn async_(body: Expr) -> Self {
        Expr::Async(Arc::new(body))
    }

    /// `await expr`
    pub fn await_(expr: Expr) -> Self {
        Expr::Await(Box::new(expr))
    }

    /// `sleep(ms)`
    pub fn sleep(ms: Expr) -> Self {
        Expr::Sleep(Box::new(ms))
    }
}

impl MatchArm {
    /// `value => body`
    pub fn value(pattern: Expr, body: Expr) -> Self {
        Self {
            pattern: Pattern::Value(pattern),
            body,
        }
    }

    /// `_ => body`
    pub fn wildcard(body: Expr) -> Self {
        Self {
            pattern: Pattern::Wildcard,
            body,
        }
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::int(n)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::string(s)
    }
}
