//! Value representation for runtime values

mod callable;
mod display;
mod handle;
mod impls;
mod json;

pub use callable::{BoundMethod, MethodFnPtr};
pub use display::format_float;
pub use handle::HostHandle;

use std::sync::Arc;

use indexmap::IndexMap;

/// Mapping type used for dict values and node records.
///
/// Insertion order is preserved so that node inputs, `items()` and JSON
/// output come back in the order the host supplied them.
pub type Map = IndexMap<String, Value>;

/// Runtime value representation for the Puter evaluator.
///
/// Values are organized into three tiers:
/// - Tier 1: Inline scalars (no allocation)
/// - Tier 2: Heap-allocated containers (Arc-wrapped, cheap to clone)
/// - Tier 3: Host interop (opaque handles and bound methods)
#[derive(Clone)]
pub enum Value {
    // ═══════════════════════════════════════════════════════════════════
    // Tier 1: Inline Scalars
    // ═══════════════════════════════════════════════════════════════════
    /// The null value, `None`
    None,

    /// Boolean: `True` or `False`
    Bool(bool),

    /// 64-bit signed integer
    Int(i64),

    /// 64-bit floating point
    Float(f64),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 2: Heap-Allocated Containers
    // ═══════════════════════════════════════════════════════════════════
    /// Text
    Str(Arc<String>),

    /// Ordered, heterogeneous list
    List(Arc<Vec<Value>>),

    /// Fixed-size tuple (produced by `items()` and tuple literals)
    Tuple(Arc<Vec<Value>>),

    /// String-keyed mapping
    Dict(Arc<Map>),

    // ═══════════════════════════════════════════════════════════════════
    // Tier 3: Host Interop
    // ═══════════════════════════════════════════════════════════════════
    /// Host object the evaluator can only reach through registered accessors
    Opaque(HostHandle),

    /// Method bound to its receiver, e.g. the result of `d.items`
    Method(Arc<BoundMethod>),
}
