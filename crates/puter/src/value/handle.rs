//! Opaque host object handles

use std::any::Any;
use std::sync::Arc;

/// An opaque host object flowing through the context.
///
/// The evaluator never looks inside the payload. Attribute access on a
/// handle only resolves through accessors registered for its `type_name`.
#[derive(Clone)]
pub struct HostHandle {
    type_name: Arc<str>,
    payload: Arc<dyn Any + Send + Sync>,
}

impl HostHandle {
    /// Wrap a host object under the given type name.
    pub fn new<T: Any + Send + Sync>(type_name: impl Into<Arc<str>>, payload: T) -> Self {
        Self {
            type_name: type_name.into(),
            payload: Arc::new(payload),
        }
    }

    /// The type name accessors are registered under.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Borrow the payload if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Whether two handles share the same payload.
    pub fn ptr_eq(&self, other: &HostHandle) -> bool {
        Arc::ptr_eq(&self.payload, &other.payload)
    }
}

impl std::fmt::Debug for HostHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HostHandle({})", self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downcast() {
        let handle = HostHandle::new("LATENT", vec![1u8, 2, 3]);
        assert_eq!(handle.type_name(), "LATENT");
        assert_eq!(handle.downcast_ref::<Vec<u8>>(), Some(&vec![1u8, 2, 3]));
        assert!(handle.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_ptr_eq() {
        let a = HostHandle::new("MODEL", 1u32);
        let b = a.clone();
        let c = HostHandle::new("MODEL", 1u32);
        assert!(a.ptr_eq(&b));
        assert!(!a.ptr_eq(&c));
    }
}
