//! Configuration-driven HTTP gateway library.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod routing;

pub use config::Settings;
pub use error::GatewayError;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
