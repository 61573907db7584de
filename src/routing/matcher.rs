//! Context prefix matching.
//!
//! # Design Decisions
//! - A context `C` matches path `P` iff `P` starts with `C/`
//! - A trailing slash on the configured context is ignored
//! - Matching is case-sensitive and runs on the raw (still encoded) path
//! - No regex: a single `strip_prefix` per route

/// Matches request paths against one route context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextMatcher {
    prefix: String,
}

impl ContextMatcher {
    pub fn new(context: &str) -> Self {
        Self {
            prefix: format!("{}/", context.trim_end_matches('/')),
        }
    }

    /// Returns the wildcard remainder when `path` falls under this context.
    ///
    /// The remainder may be empty and may itself contain slashes.
    pub fn remainder<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.prefix.as_str())
    }

    /// Length of the matched prefix; longer prefixes are more specific.
    pub fn specificity(&self) -> usize {
        self.prefix.len()
    }

    /// Whether two matchers accept exactly the same paths.
    pub fn overlaps_exactly(&self, other: &ContextMatcher) -> bool {
        self.prefix == other.prefix
    }
}
