//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check listener address and route shape
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: Settings → Result<(), Vec<ValidationError>>
//! - Target URLs are checked when the route table is built, not here

use thiserror::Error;

use crate::config::schema::Settings;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("gateway.listen_addr must not be empty")]
    EmptyListenAddr,

    #[error("route #{index} has an empty name")]
    EmptyRouteName { index: usize },

    #[error("route '{name}' context '{context}' must start with '/'")]
    RelativeContext { name: String, context: String },
}

pub fn validate_config(settings: &Settings) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if settings.gateway.listen_addr.trim().is_empty() {
        errors.push(ValidationError::EmptyListenAddr);
    }

    for (index, route) in settings.gateway.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteName { index });
        }
        if !route.context.starts_with('/') {
            errors.push(ValidationError::RelativeContext {
                name: route.name.clone(),
                context: route.context.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
