//! Forwarding errors and their mapping to HTTP status codes.

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::proxy::observer::ObserveError;

/// Errors raised while binding a proxy to a target or forwarding through it.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("invalid target URL '{target}': {source}")]
    InvalidTarget {
        target: String,
        source: url::ParseError,
    },

    #[error("unsupported scheme '{scheme}' in target '{target}'")]
    UnsupportedScheme { target: String, scheme: String },

    #[error("target '{0}' has no host")]
    MissingHost(String),

    #[error("cannot build outbound request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    #[error("response observer failed: {0}")]
    Observer(#[from] ObserveError),
}

impl ProxyError {
    /// Status returned to the caller when forwarding fails.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        self.status().into_response()
    }
}
