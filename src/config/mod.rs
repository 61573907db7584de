//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize, environment overlay)
//!     → validation.rs (semantic checks)
//!     → Settings (validated, immutable)
//!     → handed to the HTTP server once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, ConfigSource, LoadedConfig};
pub use schema::{GatewayConfig, ObservabilityConfig, RouteConfig, Settings, TimeoutConfig};
