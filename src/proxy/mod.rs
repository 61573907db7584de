//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! Matched request + wildcard remainder
//!     → handler.rs (path rewrite, request log)
//!     → factory.rs (bound proxy: URI rewrite, headers, backend call)
//!     → observer.rs (response head inspection)
//!     → Response streamed back to the dispatcher
//! ```
//!
//! # Design Decisions
//! - One bound proxy per route, created at startup
//! - Proxies share a single pooled HTTP client
//! - Errors are mapped to a status per request, never propagated further

pub mod error;
pub mod factory;
pub mod handler;
pub mod headers;
pub mod observer;

pub use error::ProxyError;
pub use factory::{BoundProxy, ProxyFactory};
pub use handler::ForwardingHandler;
pub use observer::{LoggingObserver, ObserveError, ResponseObserver};
