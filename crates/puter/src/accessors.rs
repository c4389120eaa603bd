//! Special accessors: computed properties keyed by host node type
//!
//! A node record's `class_type` (or an opaque handle's type name) selects a
//! table of named extractor functions. `node(5).loras` on a lora loader
//! node runs the `loras` extractor with the node record as its argument.
//! The table is open: hosts register extractors for their own node types.

use dashmap::DashMap;
use indexmap::IndexMap;

use crate::value::{Map, Value};

/// Extractor taking the base value (node record or handle).
pub type AccessorFn = fn(&Value) -> Result<Value, String>;

/// Node type whose lora inputs the default `loras` accessor reads.
pub const POWER_LORA_LOADER: &str = "Power Lora Loader (rgthree)";

/// Registry of special accessors by node type.
#[derive(Debug, Default)]
pub struct AccessorRegistry {
    by_type: DashMap<String, IndexMap<String, AccessorFn>>,
}

impl AccessorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the shipped accessors installed.
    pub fn with_defaults() -> Self {
        let registry = Self::new();
        registry.register(POWER_LORA_LOADER, "loras", lora_list);
        registry
    }

    /// Register (or replace) an accessor for a node type.
    pub fn register(&self, type_name: impl Into<String>, name: impl Into<String>, f: AccessorFn) {
        self.by_type
            .entry(type_name.into())
            .or_default()
            .insert(name.into(), f);
    }

    /// Accessor registered under `type_name` and `name`.
    pub fn lookup(&self, type_name: &str, name: &str) -> Option<AccessorFn> {
        self.by_type.get(type_name)?.get(name).copied()
    }

    /// Accessor names registered for a node type, in registration order.
    pub fn accessors_for(&self, type_name: &str) -> Vec<String> {
        self.by_type
            .get(type_name)
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Find the accessor applicable to `base`, if any.
    ///
    /// The discriminator is a mapping's `class_type` field or an opaque
    /// handle's type name.
    pub fn resolve(&self, base: &Value, name: &str) -> Option<AccessorFn> {
        self.lookup(discriminator(base)?, name)
    }
}

/// The node-type name used to select accessors for `value`.
pub fn discriminator(value: &Value) -> Option<&str> {
    match value {
        Value::Dict(map) => map.get("class_type")?.as_str(),
        Value::Opaque(handle) => Some(handle.type_name()),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Shipped accessors
// ═══════════════════════════════════════════════════════════════════════

/// Enabled loras on a lora loader node: `{name, strength, strength_clip?}`.
fn lora_list(node: &Value) -> Result<Value, String> {
    let inputs = match node.get("inputs") {
        Some(Value::Dict(inputs)) => inputs,
        Some(_) => return Err("node 'inputs' is not a mapping".to_string()),
        None => return Ok(Value::list(vec![])),
    };

    let mut loras = Vec::new();
    for (key, value) in inputs.iter() {
        if !key.to_lowercase().starts_with("lora_") {
            continue;
        }
        let Value::Dict(entry) = value else {
            continue;
        };
        let enabled = entry.get("on").is_some_and(Value::is_truthy);
        let (Some(name), Some(strength)) = (entry.get("lora"), entry.get("strength")) else {
            continue;
        };
        if !enabled {
            continue;
        }

        let mut lora = Map::new();
        lora.insert("name".to_string(), name.clone());
        lora.insert("strength".to_string(), strength.clone());
        match entry.get("strengthTwo") {
            Some(clip) if !clip.is_none() => {
                lora.insert("strength_clip".to_string(), clip.clone());
            }
            _ => {}
        }
        loras.push(Value::dict(lora));
    }
    Ok(Value::list(loras))
}
