//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration file layout.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    /// Listener address and route definitions.
    pub gateway: GatewayConfig,

    /// Backend timeouts (disabled unless set).
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Gateway configuration: where to listen and what to forward.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address (e.g., "0.0.0.0:8080" or ":8080").
    #[serde(alias = "listenAddr")]
    pub listen_addr: String,

    /// Route definitions, in registration order.
    pub routes: Vec<RouteConfig>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            routes: Vec::new(),
        }
    }
}

impl GatewayConfig {
    /// Address suitable for `TcpListener::bind`.
    ///
    /// A bare `:port` binds every interface.
    pub fn bind_address(&self) -> String {
        let addr = self.listen_addr.trim();
        if addr.starts_with(':') {
            format!("0.0.0.0{}", addr)
        } else {
            addr.to_string()
        }
    }
}

/// A single route mapping a path prefix to one backend.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Route identifier for logging.
    pub name: String,

    /// Path prefix to match (e.g., "/api/orders").
    pub context: String,

    /// Absolute base URL of the backend (e.g., "http://backend:8080").
    pub target: String,
}

impl RouteConfig {
    pub fn new(name: impl Into<String>, context: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            target: target.into(),
        }
    }
}

/// Timeout configuration for backend calls.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: Option<u64>,

    /// Time allowed for the backend to return a response head, in seconds.
    pub request_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
