//! Per-route forwarding handler.
//!
//! Replaces the inbound path with the remainder left after the route's
//! context prefix, logs the rewritten URL and hands the request to the
//! route's bound proxy.

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use tracing::{Instrument, Span};

use crate::proxy::error::ProxyError;
use crate::proxy::factory::BoundProxy;

#[derive(Debug, Clone)]
pub struct ForwardingHandler {
    name: String,
    proxy: BoundProxy,
    span: Span,
}

impl ForwardingHandler {
    pub fn new(name: impl Into<String>, proxy: BoundProxy) -> Self {
        let name = name.into();
        let span = tracing::info_span!("forward", route = %name, backend = %proxy.target());
        Self { name, proxy, span }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Forward `request` with its path overwritten by `remainder`.
    ///
    /// Failures never escape: they become the response for this request.
    pub async fn handle(&self, request: Request<Body>, remainder: &str) -> Response {
        let url = rewritten_url(remainder, request.uri().query());

        async move {
            tracing::info!(url = %url, "REQUEST URL");

            match self.proxy.forward(request, remainder).await {
                Ok(response) => response,
                Err(e) => {
                    match &e {
                        ProxyError::Observer(_) => {
                            tracing::error!(error = %e, "Response observation failed")
                        }
                        _ => tracing::warn!(error = %e, "Forwarding failed"),
                    }
                    e.into_response()
                }
            }
        }
        .instrument(self.span.clone())
        .await
    }
}

/// The request URL after rewriting, as logged.
///
/// The path is the bare remainder, so it may be empty or lack a leading slash.
pub fn rewritten_url(path: &str, query: Option<&str>) -> String {
    match query {
        Some(query) if !query.is_empty() => format!("{}?{}", path, query),
        _ => path.to_string(),
    }
}
