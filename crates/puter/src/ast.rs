//! Abstract syntax tree for the expression language
//!
//! Each compound node is its own struct so the evaluator can implement
//! [`Evaluate`](crate::eval::Evaluate) per node kind, with [`Expr`] and
//! [`Stmt`] as the tagged unions dispatched on.

/// A parsed program: the top-level statements in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Statements
    pub body: Vec<Stmt>,
}

// ═══════════════════════════════════════════════════════════════════════
// Statements
// ═══════════════════════════════════════════════════════════════════════

/// A top-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// Bare expression; its value becomes the program's value
    Expr(Expr),
    /// `name = value`
    Assign(StmtAssign),
    /// `name += value` (parsed, not evaluated)
    AugAssign(StmtAugAssign),
    /// `return [value]`
    Return(StmtReturn),
}

/// `name = value`
#[derive(Debug, Clone, PartialEq)]
pub struct StmtAssign {
    /// Target variable
    pub target: String,
    /// Right-hand side
    pub value: Expr,
}

/// `name <op>= value`
#[derive(Debug, Clone, PartialEq)]
pub struct StmtAugAssign {
    /// Target variable
    pub target: String,
    /// The arithmetic operator
    pub op: BinOp,
    /// Right-hand side
    pub value: Expr,
}

/// `return [value]`
#[derive(Debug, Clone, PartialEq)]
pub struct StmtReturn {
    /// Returned expression, `None` for a bare `return`
    pub value: Option<Expr>,
}

// ═══════════════════════════════════════════════════════════════════════
// Expressions
// ═══════════════════════════════════════════════════════════════════════

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal scalar
    Constant(Constant),
    /// Identifier
    Name(ExprName),
    /// `[a, b]`
    List(ExprList),
    /// `(a, b)`
    Tuple(ExprTuple),
    /// `{'k': v}`
    Dict(ExprDict),
    /// Arithmetic and bitwise operators
    BinOp(ExprBinOp),
    /// `and` / `or`
    BoolOp(ExprBoolOp),
    /// `-x`, `~x`, `not x`
    UnaryOp(ExprUnaryOp),
    /// Single binary comparison
    Compare(ExprCompare),
    /// `value.attr`
    Attribute(ExprAttribute),
    /// `value[index]`
    Subscript(ExprSubscript),
    /// `func(args)`
    Call(ExprCall),
    /// `f'...{expr}...'`
    FString(ExprFString),
    /// `[elt for target in iter if cond]`
    ListComp(ExprListComp),
    /// `body if test else orelse` (parsed, not evaluated)
    IfExp(ExprIfExp),
    /// `lower:upper:step` inside a subscript (parsed, not evaluated)
    Slice(ExprSlice),
}

/// Literal scalar value.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// `None`
    None,
    /// `True` / `False`
    Bool(bool),
    /// Integer literal
    Int(i64),
    /// Float literal
    Float(f64),
    /// String literal (adjacent literals already concatenated)
    Str(String),
}

/// Identifier reference.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprName {
    /// The identifier
    pub id: String,
}

/// List display.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprList {
    /// Elements
    pub elts: Vec<Expr>,
}

/// Tuple display.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprTuple {
    /// Elements
    pub elts: Vec<Expr>,
}

/// Dict display.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprDict {
    /// Key/value pairs in source order
    pub entries: Vec<(Expr, Expr)>,
}

/// Binary arithmetic/bitwise operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinOp {
    /// Left operand
    pub left: Box<Expr>,
    /// Operator
    pub op: BinOp,
    /// Right operand
    pub right: Box<Expr>,
}

/// Boolean operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprBoolOp {
    /// Left operand
    pub left: Box<Expr>,
    /// Operator
    pub op: BoolOp,
    /// Right operand
    pub right: Box<Expr>,
}

/// Unary operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprUnaryOp {
    /// Operator
    pub op: UnaryOp,
    /// Operand
    pub operand: Box<Expr>,
}

/// Comparison between exactly two operands.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCompare {
    /// Left operand
    pub left: Box<Expr>,
    /// Comparator
    pub op: CompareOp,
    /// Right operand
    pub right: Box<Expr>,
}

/// Attribute access.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprAttribute {
    /// Base expression
    pub value: Box<Expr>,
    /// Attribute name
    pub attr: String,
}

/// Subscript access.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprSubscript {
    /// Base expression
    pub value: Box<Expr>,
    /// Index or key expression
    pub index: Box<Expr>,
}

/// Function or method call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCall {
    /// Callee
    pub func: Box<Expr>,
    /// Positional arguments
    pub args: Vec<Expr>,
}

/// Interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFString {
    /// Literal text and embedded expressions in order
    pub parts: Vec<FStringPart>,
}

/// A piece of an interpolated string.
#[derive(Debug, Clone, PartialEq)]
pub enum FStringPart {
    /// Literal text
    Literal(String),
    /// Embedded `{expr}`; conversion and format spec are dropped
    Expr(Box<Expr>),
}

/// List comprehension with a single generator clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprListComp {
    /// Output expression
    pub elt: Box<Expr>,
    /// The `for ... in ... if ...` clause
    pub generator: Comprehension,
}

/// `for target in iter if cond...`
#[derive(Debug, Clone, PartialEq)]
pub struct Comprehension {
    /// Loop target
    pub target: Target,
    /// Iterable expression
    pub iter: Box<Expr>,
    /// Filters, all of which must be truthy
    pub ifs: Vec<Expr>,
}

/// Comprehension loop target.
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// `for v in ...`
    Name(String),
    /// `for k, v in ...`
    Pair(String, String),
}

/// Conditional expression.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprIfExp {
    /// Condition
    pub test: Box<Expr>,
    /// Value when true
    pub body: Box<Expr>,
    /// Value when false
    pub orelse: Box<Expr>,
}

/// Slice bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprSlice {
    /// Start bound
    pub lower: Option<Box<Expr>>,
    /// End bound
    pub upper: Option<Box<Expr>>,
    /// Step
    pub step: Option<Box<Expr>>,
}

// ═══════════════════════════════════════════════════════════════════════
// Operators
// ═══════════════════════════════════════════════════════════════════════

/// Arithmetic and bitwise operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mult,
    /// `/`
    Div,
    /// `//`
    FloorDiv,
    /// `**`
    Pow,
    /// `%`
    Mod,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    LShift,
    /// `>>`
    RShift,
}

impl BinOp {
    /// Source symbol.
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mult => "*",
            BinOp::Div => "/",
            BinOp::FloorDiv => "//",
            BinOp::Pow => "**",
            BinOp::Mod => "%",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
            BinOp::LShift => "<<",
            BinOp::RShift => ">>",
        }
    }
}

/// Boolean operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoolOp {
    /// `and`
    And,
    /// `or`
    Or,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `~x`
    Invert,
    /// `not x`
    Not,
}

/// Comparison operators. `NotIn`, `Is` and `IsNot` parse but are rejected
/// at evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Lt,
    /// `<=`
    LtE,
    /// `>`
    Gt,
    /// `>=`
    GtE,
    /// `in`
    In,
    /// `not in`
    NotIn,
    /// `is`
    Is,
    /// `is not`
    IsNot,
}

impl CompareOp {
    /// Operator name as reported in errors.
    pub fn name(self) -> &'static str {
        match self {
            CompareOp::Eq => "Eq",
            CompareOp::NotEq => "NotEq",
            CompareOp::Lt => "Lt",
            CompareOp::LtE => "LtE",
            CompareOp::Gt => "Gt",
            CompareOp::GtE => "GtE",
            CompareOp::In => "In",
            CompareOp::NotIn => "NotIn",
            CompareOp::Is => "Is",
            CompareOp::IsNot => "IsNot",
        }
    }
}

impl Expr {
    /// Human-readable name of the node kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Constant(_) => "constant",
            Expr::Name(_) => "name",
            Expr::List(_) => "list",
            Expr::Tuple(_) => "tuple",
            Expr::Dict(_) => "dict",
            Expr::BinOp(_) => "binary operation",
            Expr::BoolOp(_) => "boolean operation",
            Expr::UnaryOp(_) => "unary operation",
            Expr::Compare(_) => "comparison",
            Expr::Attribute(_) => "attribute access",
            Expr::Subscript(_) => "subscript",
            Expr::Call(_) => "call",
            Expr::FString(_) => "f-string",
            Expr::ListComp(_) => "list comprehension",
            Expr::IfExp(_) => "conditional expression",
            Expr::Slice(_) => "slice",
        }
    }

    /// Convenience constructor for a name reference.
    pub fn name(id: impl Into<String>) -> Self {
        Expr::Name(ExprName { id: id.into() })
    }
}
