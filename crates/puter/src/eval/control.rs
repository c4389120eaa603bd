//! Control flow mechanism for early return

use crate::Value;

/// Control flow signal for non-local jumps.
///
/// A `return` statement doesn't produce a normal value. It returns
/// `Err(EvalError::ControlFlow(...))`, which propagates up until the
/// program runner catches it and ends the statement sequence.
#[derive(Debug, Clone)]
pub enum ControlFlow {
    /// Stop the program with a value.
    Return {
        /// The program's result
        value: Value,
    },
}

impl ControlFlow {
    /// Create a return.
    pub fn return_value(value: Value) -> Self {
        ControlFlow::Return { value }
    }
}
