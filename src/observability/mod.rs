//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:      route mappings      → logging.rs subscriber
//! Per request:  rewritten URL       → route span (proxy::handler)
//! Per response: response head dump  → proxy::observer
//! ```
//!
//! # Design Decisions
//! - Log output is for operators, not a stable contract

pub mod logging;
