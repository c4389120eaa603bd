//! Evaluation context configuration

use std::sync::Arc;

use crate::accessors::AccessorRegistry;
use crate::workflow::Prompt;

/// Read-only configuration for one evaluation.
///
/// This is passed through all evaluation calls alongside the mutable
/// [`Environment`](crate::Environment).
#[derive(Debug, Clone)]
pub struct EvalContext {
    /// Workflow prompt searched by `node()` / `nodes()`
    pub prompt: Arc<Prompt>,

    /// Special accessors by node type
    pub accessors: Arc<AccessorRegistry>,

    /// Seed for the random builtins; entropy when `None`
    pub seed: Option<u64>,

    /// Whether to trace evaluation (for debugging)
    pub trace: bool,
}

impl Default for EvalContext {
    fn default() -> Self {
        Self {
            prompt: Arc::new(Prompt::default()),
            accessors: Arc::new(AccessorRegistry::with_defaults()),
            seed: None,
            trace: false,
        }
    }
}

impl EvalContext {
    /// Create a new context with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use this workflow prompt for node lookups.
    pub fn with_prompt(mut self, prompt: Prompt) -> Self {
        self.prompt = Arc::new(prompt);
        self
    }

    /// Make the random builtins reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use a custom accessor registry.
    pub fn with_accessors(mut self, accessors: Arc<AccessorRegistry>) -> Self {
        self.accessors = accessors;
        self
    }

    /// Log each statement and builtin call at debug level.
    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}
