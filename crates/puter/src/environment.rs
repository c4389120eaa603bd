//! Runtime environment holding the variables of one evaluation

mod frame;

pub use frame::ScopeGuard;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::value::{Map, Value};

/// A single variable binding.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The binding's name
    pub name: String,

    /// The bound value
    pub value: Value,
}

/// The live context of one evaluation.
///
/// Uses a flat scope design with frame boundaries. The first frame holds
/// the top-level variables (node inputs and assignments); comprehensions
/// push further frames for their loop targets.
///
/// # Example
///
/// ```
/// use puter::{Environment, Value};
///
/// let mut env = Environment::new();
/// env.assign("x", Value::Int(1));
///
/// env.push_frame();
/// env.set_local("x", Value::Int(10)); // Shadows outer x
/// assert_eq!(env.get("x"), Some(&Value::Int(10)));
/// env.pop_frame();
///
/// assert_eq!(env.get("x"), Some(&Value::Int(1)));
/// ```
#[derive(Debug, Clone)]
pub struct Environment {
    /// All bindings in a flat array (most recent at end)
    bindings: Vec<Binding>,

    /// Frame boundaries (indices into bindings)
    frames: Vec<usize>,

    /// Source for `random_int` / `random_choice`
    rng: StdRng,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// Create an empty environment with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create an empty environment whose random builtins are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            bindings: Vec::new(),
            frames: vec![0],
            rng,
        }
    }

    /// Seed the top-level scope from named inputs, in order.
    pub fn extend_from(&mut self, inputs: Map) {
        for (name, value) in inputs {
            self.assign(name, value);
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Frame Management (Scope Entry/Exit)
    // ═══════════════════════════════════════════════════════════════════

    /// Enter a new scope (push a frame).
    pub fn push_frame(&mut self) {
        self.frames.push(self.bindings.len());
    }

    /// Exit the current scope (pop a frame).
    ///
    /// Does nothing at the top-level scope.
    pub fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            if let Some(boundary) = self.frames.pop() {
                self.bindings.truncate(boundary);
            }
        }
    }

    /// Get the current scope depth (number of frames).
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Check if we're at the top-level scope.
    pub fn is_global_scope(&self) -> bool {
        self.frames.len() == 1
    }

    /// End of the top-level region of `bindings`.
    fn global_end(&self) -> usize {
        self.frames.get(1).copied().unwrap_or(self.bindings.len())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Definition
    // ═══════════════════════════════════════════════════════════════════

    /// Store a value in the top-level scope, replacing any previous value.
    ///
    /// Works the same from inside a comprehension frame: the binding lands
    /// in (and persists in) the top-level scope.
    pub fn assign(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let end = self.global_end();

        if let Some(binding) = self.bindings[..end].iter_mut().find(|b| b.name == name) {
            binding.value = value;
            return;
        }

        self.bindings.insert(end, Binding { name, value });
        for boundary in self.frames.iter_mut().skip(1) {
            *boundary += 1;
        }
    }

    /// Bind a name in the innermost frame, shadowing outer bindings.
    pub fn set_local(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        let start = self.frames.last().copied().unwrap_or(0);

        match self.bindings[start..].iter_mut().find(|b| b.name == name) {
            Some(binding) => binding.value = value,
            None => self.bindings.push(Binding { name, value }),
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Binding Lookup
    // ═══════════════════════════════════════════════════════════════════

    /// Look up a binding by name, innermost scope first.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings
            .iter()
            .rev()
            .find(|b| b.name == name)
            .map(|b| &b.value)
    }

    /// Check if a binding exists.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.iter().any(|b| b.name == name)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Iteration and Inspection
    // ═══════════════════════════════════════════════════════════════════

    /// Iterate over all bindings.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    /// Snapshot of the top-level scope.
    pub fn globals(&self) -> Map {
        self.bindings[..self.global_end()]
            .iter()
            .map(|b| (b.name.clone(), b.value.clone()))
            .collect()
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the environment is empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The random number generator for this evaluation.
    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_assign_replaces_in_place() {
        let mut env = Environment::new();
        env.assign("a", Value::Int(1));
        env.assign("b", Value::Int(2));
        env.assign("a", Value::Int(3));
        assert_eq!(env.len(), 2);
        assert_eq!(env.get("a"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_assign_from_frame_lands_in_globals() {
        let mut env = Environment::new();
        env.assign("a", Value::Int(1));
        env.push_frame();
        env.set_local("v", Value::Int(2));
        env.assign("g", Value::Int(3));
        assert_eq!(env.get("v"), Some(&Value::Int(2)));
        env.pop_frame();

        assert_eq!(env.get("g"), Some(&Value::Int(3)));
        assert!(!env.contains("v"));
    }

    #[test]
    fn test_set_local_rebinds_within_frame() {
        let mut env = Environment::new();
        env.push_frame();
        env.set_local("v", Value::Int(1));
        env.set_local("v", Value::Int(2));
        assert_eq!(env.len(), 1);
        assert_eq!(env.get("v"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_globals_excludes_frames() {
        let mut env = Environment::new();
        env.assign("a", Value::Int(1));
        env.push_frame();
        env.set_local("b", Value::Int(2));
        let globals = env.globals();
        assert_eq!(globals.keys().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::Rng;
        let a: u32 = Environment::with_seed(7).rng().gen();
        let b: u32 = Environment::with_seed(7).rng().gen();
        assert_eq!(a, b);
    }
}
