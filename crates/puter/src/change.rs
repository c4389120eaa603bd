//! Change fingerprint for the host's output cache
//!
//! `node()` and `nodes()` read workflow state that isn't a declared input,
//! so a program calling them must never be served from cache. The host asks
//! for a fingerprint before each run and skips the run when it matches the
//! previous one; bumping a counter whenever such a call appears in the
//! source makes every fingerprint new.
//!
//! Detection is a plain substring search over the source text, so a comment
//! or string mentioning `node(` also counts.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

/// Source fragments that mark a workflow lookup.
pub const GLOBAL_CALL_MARKERS: &[&str] = &["node(", "nodes("];

/// Counter backing the change fingerprint.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    counter: AtomicU64,
}

/// Process-wide tracker used by [`PowerPuter::is_changed`](crate::PowerPuter::is_changed).
/// Lives for the whole process; nothing resets it.
static GLOBAL_TRACKER: ChangeTracker = ChangeTracker::new();

impl ChangeTracker {
    /// A tracker starting at zero.
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// The process-wide tracker.
    pub fn global() -> &'static ChangeTracker {
        &GLOBAL_TRACKER
    }

    /// Fingerprint for `source`, bumping the counter first when the source
    /// contains a workflow lookup.
    pub fn fingerprint(&self, source: &str) -> u64 {
        if uses_global_lookup(source) {
            let value = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(fingerprint = value, "program reads workflow state; forcing re-run");
            value
        } else {
            self.current()
        }
    }

    /// The current counter value.
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

/// True when `source` mentions a workflow lookup call.
pub fn uses_global_lookup(source: &str) -> bool {
    GLOBAL_CALL_MARKERS.iter().any(|m| source.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unchanged_without_lookup() {
        let tracker = ChangeTracker::new();
        let a = tracker.fingerprint("1 + 2");
        let b = tracker.fingerprint("1 + 2");
        assert_eq!(a, b);
    }

    #[test]
    fn test_bumps_on_every_check_with_lookup() {
        let tracker = ChangeTracker::new();
        let before = tracker.current();
        let a = tracker.fingerprint("node(3).inputs.seed");
        let b = tracker.fingerprint("node(3).inputs.seed");
        assert_eq!(a, before + 1);
        assert_eq!(b, a + 1);
    }

    #[test]
    fn test_substring_heuristic() {
        assert!(uses_global_lookup("len(nodes())"));
        assert!(uses_global_lookup("'mention node( in a string'"));
        assert!(!uses_global_lookup("node.inputs"));
    }
}
