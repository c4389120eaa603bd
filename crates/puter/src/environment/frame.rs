//! RAII scope guard for automatic frame cleanup

use super::Environment;

/// RAII guard that automatically pops a frame when dropped.
///
/// # Example
///
/// ```
/// use puter::{Environment, Value};
///
/// let mut env = Environment::new();
/// env.assign("x", Value::Int(1));
///
/// {
///     let mut guard = env.scope_guard();
///     guard.set_local("y", Value::Int(2));
/// }
/// assert!(!env.contains("y"));
/// assert!(env.contains("x"));
/// ```
pub struct ScopeGuard<'a> {
    env: &'a mut Environment,
}

impl Environment {
    /// Create a scope guard that pushes a frame now and pops it on drop.
    pub fn scope_guard(&mut self) -> ScopeGuard<'_> {
        self.push_frame();
        ScopeGuard { env: self }
    }
}

impl<'a> Drop for ScopeGuard<'a> {
    fn drop(&mut self) {
        self.env.pop_frame();
    }
}

impl<'a> std::ops::Deref for ScopeGuard<'a> {
    type Target = Environment;

    fn deref(&self) -> &Self::Target {
        self.env
    }
}

impl<'a> std::ops::DerefMut for ScopeGuard<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_scope_guard_drops_frame() {
        let mut env = Environment::new();
        let initial_depth = env.depth();

        {
            let guard = env.scope_guard();
            assert_eq!(guard.depth(), initial_depth + 1);
        }
        assert_eq!(env.depth(), initial_depth);
    }

    #[test]
    fn test_scope_guard_shadows_outer_variable() {
        let mut env = Environment::new();
        env.assign("x", Value::Int(1));

        {
            let mut guard = env.scope_guard();
            guard.set_local("x", Value::Int(2));
            assert_eq!(guard.get("x"), Some(&Value::Int(2)));
        }

        assert_eq!(env.get("x"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_scope_guard_nested_scopes() {
        let mut env = Environment::new();
        env.assign("a", Value::Int(1));

        {
            let mut outer = env.scope_guard();
            outer.set_local("b", Value::Int(2));

            {
                let mut inner = outer.scope_guard();
                inner.set_local("c", Value::Int(3));
                assert!(inner.contains("a"));
                assert!(inner.contains("b"));
                assert!(inner.contains("c"));
            }

            assert!(outer.contains("b"));
            assert!(!outer.contains("c"));
        }

        assert!(env.contains("a"));
        assert!(!env.contains("b"));
    }
}
