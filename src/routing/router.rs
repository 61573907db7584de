//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Bind a proxy to every configured route, failing fast on the first bad target
//! - Look up the matching route for a request path
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Longest context wins; equal contexts fall back to registration order
//! - O(n) prefix scan (acceptable for typical route counts)

use crate::config::RouteConfig;
use crate::proxy::{ForwardingHandler, ProxyError, ProxyFactory};
use crate::routing::matcher::ContextMatcher;

#[derive(Debug)]
struct RouteEntry {
    matcher: ContextMatcher,
    handler: ForwardingHandler,
}

/// A successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    pub handler: &'a ForwardingHandler,
    pub remainder: &'a str,
}

/// The compiled, immutable route table.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    /// Build the table in configuration order.
    ///
    /// Any route whose target cannot be bound aborts the whole build, so a
    /// partially valid table is never produced.
    pub fn build(routes: &[RouteConfig], factory: &ProxyFactory) -> Result<Self, ProxyError> {
        let mut entries: Vec<RouteEntry> = Vec::with_capacity(routes.len());

        for route in routes {
            let proxy = factory.create_proxy(&route.target)?;
            let matcher = ContextMatcher::new(route.context.as_str());

            tracing::info!(
                "Mapping '{}' | {} ---> {}",
                route.name,
                route.context,
                route.target
            );

            if let Some(existing) = entries.iter().find(|e| e.matcher.overlaps_exactly(&matcher)) {
                tracing::warn!(
                    route = %route.name,
                    context = %route.context,
                    shadowed_by = %existing.handler.name(),
                    "Duplicate context, route will never match"
                );
            }

            entries.push(RouteEntry {
                matcher,
                handler: ForwardingHandler::new(route.name.as_str(), proxy),
            });
        }

        // Stable: equal lengths keep registration order.
        entries.sort_by(|a, b| b.matcher.specificity().cmp(&a.matcher.specificity()));

        Ok(Self { entries })
    }

    /// Find the most specific route for `path`.
    pub fn lookup<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        self.entries.iter().find_map(|entry| {
            entry.matcher.remainder(path).map(|remainder| RouteMatch {
                handler: &entry.handler,
                remainder,
            })
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
