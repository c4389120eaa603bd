//! Callable values: methods bound to a receiver

use super::Value;

/// Native implementation of a method.
///
/// Receives the bound receiver and the call arguments.
pub type MethodFnPtr = fn(&Value, &[Value]) -> Result<Value, String>;

/// A method looked up on a value and bound to it.
///
/// Produced by attribute access such as `name.lower` and invoked by the
/// call that follows it.
#[derive(Clone)]
pub struct BoundMethod {
    /// Method name (for display/errors)
    pub name: &'static str,

    /// The value the method was looked up on
    pub receiver: Value,

    /// The native implementation
    pub func: MethodFnPtr,
}

impl BoundMethod {
    /// Invoke the method with the given arguments.
    pub fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.func)(&self.receiver, args)
    }
}

impl std::fmt::Debug for BoundMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BoundMethod({})", self.name)
    }
}
