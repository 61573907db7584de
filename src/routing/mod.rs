//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (route lookup)
//!     → matcher.rs (context prefix check, remainder capture)
//!     → Return: matched handler + remainder, or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Bind one proxy per route (fail fast)
//!     → Sort by context length
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod router;

pub use matcher::ContextMatcher;
pub use router::{RouteMatch, RouteTable};
