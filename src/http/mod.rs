//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request dispatch)
//!     → routing (context prefix lookup)
//!     → proxy (path rewrite, backend call, response observation)
//!     → Send to client
//! ```

pub mod server;

pub use server::GatewayServer;
