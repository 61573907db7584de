//! Startup errors surfaced by the gateway binary.

use thiserror::Error;

use crate::config::ConfigError;
use crate::proxy::ProxyError;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("route setup failed: {0}")]
    Routes(#[from] ProxyError),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
