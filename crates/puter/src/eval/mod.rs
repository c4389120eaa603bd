//! Expression evaluation

pub mod assign;
pub mod binary;
pub mod call;
pub mod compare;
pub mod comprehension;
pub mod control;
pub mod field;
pub mod fstring;
pub mod index;
pub mod literal;
pub mod path;
pub mod stmt;
pub mod unary;

use crate::ast::Expr;
use crate::{Environment, EvalContext, EvalError, Value};

/// Trait for evaluating AST nodes to values.
///
/// This is the core abstraction for the tree-walking interpreter.
/// Each node kind in [`crate::ast`] implements this trait.
pub trait Evaluate {
    /// Evaluate this AST node in the given environment.
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError>;
}

// ═══════════════════════════════════════════════════════════════════════
// Main Expression Dispatcher
// ═══════════════════════════════════════════════════════════════════════

impl Evaluate for Expr {
    fn eval(&self, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
        match self {
            Expr::Constant(expr) => expr.eval(env, ctx),
            Expr::Name(expr) => expr.eval(env, ctx),
            Expr::List(expr) => expr.eval(env, ctx),
            Expr::Tuple(expr) => expr.eval(env, ctx),
            Expr::Dict(expr) => expr.eval(env, ctx),

            Expr::BinOp(expr) => expr.eval(env, ctx),
            Expr::BoolOp(expr) => expr.eval(env, ctx),
            Expr::UnaryOp(expr) => expr.eval(env, ctx),
            Expr::Compare(expr) => expr.eval(env, ctx),

            Expr::Attribute(expr) => expr.eval(env, ctx),
            Expr::Subscript(expr) => expr.eval(env, ctx),
            Expr::Call(expr) => expr.eval(env, ctx),

            Expr::FString(expr) => expr.eval(env, ctx),
            Expr::ListComp(expr) => expr.eval(env, ctx),

            // Parsed so the error names the construct, but not evaluated
            Expr::IfExp(_) | Expr::Slice(_) => Err(EvalError::UnsupportedExpr {
                kind: self.kind_name().to_string(),
            }),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Convenience Functions
// ═══════════════════════════════════════════════════════════════════════

/// Evaluate an expression (convenience wrapper).
pub fn eval_expr(expr: &Expr, env: &mut Environment, ctx: &EvalContext) -> Result<Value, EvalError> {
    expr.eval(env, ctx)
}

// Re-export for use by other modules
pub use call::call_value;
pub use control::ControlFlow;
pub use field::lookup;
pub use stmt::run_program;
