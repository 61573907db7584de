//! Proxy construction and single-backend forwarding.
//!
//! # Responsibilities
//! - Validate a route target and bind a proxy to it
//! - Rewrite scheme, authority, path and query onto the target
//! - Stream the request to the backend and the response back
//! - Run the response observer before relaying
//!
//! # Design Decisions
//! - One shared HTTP client; proxies clone its handle (pooled connections)
//! - The client speaks `http` and `https` (rustls with webpki roots)
//! - Bodies are streamed in both directions, never buffered
//! - Connect failures are reported as 502 and never retried
//! - Dropping the `forward` future abandons the backend call

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::header::HeaderValue;
use axum::http::uri::{Authority, Scheme};
use axum::http::{Request, Uri, Version};
use axum::response::Response;
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use url::{Position, Url};

use crate::config::TimeoutConfig;
use crate::proxy::error::ProxyError;
use crate::proxy::headers::{prepare_request_headers, remove_hop_headers};
use crate::proxy::observer::ResponseObserver;

type UpstreamClient = Client<HttpsConnector<HttpConnector>, Body>;

/// Builds [`BoundProxy`] instances that share one HTTP client.
#[derive(Debug, Clone)]
pub struct ProxyFactory {
    client: UpstreamClient,
    observer: Arc<dyn ResponseObserver>,
    request_timeout: Option<Duration>,
}

impl ProxyFactory {
    pub fn new(timeouts: &TimeoutConfig, observer: Arc<dyn ResponseObserver>) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(timeouts.connect_secs.map(Duration::from_secs));
        connector.enforce_http(false);

        let connector = HttpsConnector::<HttpConnector>::builder()
            .with_webpki_roots()
            .https_or_http()
            .enable_http1()
            .wrap_connector(connector);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            observer,
            request_timeout: timeouts.request_secs.map(Duration::from_secs),
        }
    }

    /// Parse `target` and bind a proxy to it.
    ///
    /// The target must be an absolute `http` or `https` URL with a host. It may
    /// carry a base path and a query, both of which are merged into every
    /// outbound URI.
    pub fn create_proxy(&self, target: &str) -> Result<BoundProxy, ProxyError> {
        let url = Url::parse(target).map_err(|source| ProxyError::InvalidTarget {
            target: target.to_string(),
            source,
        })?;

        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => {
                return Err(ProxyError::UnsupportedScheme {
                    target: target.to_string(),
                    scheme: other.to_string(),
                })
            }
        };
        if url.host_str().map_or(true, str::is_empty) {
            return Err(ProxyError::MissingHost(target.to_string()));
        }

        let authority = Authority::from_str(&url[Position::BeforeHost..Position::AfterPort])
            .map_err(axum::http::Error::from)?;
        let host = HeaderValue::from_str(authority.as_str()).map_err(axum::http::Error::from)?;

        Ok(BoundProxy {
            target: url,
            scheme,
            authority,
            host,
            client: self.client.clone(),
            observer: Arc::clone(&self.observer),
            request_timeout: self.request_timeout,
        })
    }
}

/// A proxy permanently bound to one backend.
///
/// Immutable once created; cloning shares the underlying connection pool.
#[derive(Debug, Clone)]
pub struct BoundProxy {
    target: Url,
    scheme: Scheme,
    authority: Authority,
    host: HeaderValue,
    client: UpstreamClient,
    observer: Arc<dyn ResponseObserver>,
    request_timeout: Option<Duration>,
}

impl BoundProxy {
    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Outbound URI for a rewritten path and the inbound query.
    pub fn outbound_uri(&self, path: &str, query: Option<&str>) -> Result<Uri, ProxyError> {
        let mut path_and_query = join_path(self.target.path(), path);
        if let Some(query) = merge_query(self.target.query(), query) {
            path_and_query.push('?');
            path_and_query.push_str(&query);
        }

        Ok(Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query)
            .build()?)
    }

    /// Forward `request` to the backend with its path replaced by `path`.
    pub async fn forward(&self, request: Request<Body>, path: &str) -> Result<Response, ProxyError> {
        let client_ip = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let (mut parts, body) = request.into_parts();
        parts.uri = self.outbound_uri(path, parts.uri.query())?;
        parts.version = Version::HTTP_11;
        prepare_request_headers(&mut parts.headers, &self.host, client_ip)?;

        tracing::debug!(uri = %parts.uri, method = %parts.method, "Sending upstream request");

        let pending = self.client.request(Request::from_parts(parts, body));
        let response = match self.request_timeout {
            Some(limit) => tokio::time::timeout(limit, pending)
                .await
                .map_err(|_| ProxyError::Timeout(limit))??,
            None => pending.await?,
        };

        let (mut parts, body) = response.into_parts();
        remove_hop_headers(&mut parts.headers);
        self.observer.observe(&self.target, &parts)?;

        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

/// Join two path fragments with exactly one slash between them.
fn join_path(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

fn merge_query(target: Option<&str>, inbound: Option<&str>) -> Option<String> {
    let target = target.unwrap_or("");
    let inbound = inbound.unwrap_or("");
    let merged = if target.is_empty() || inbound.is_empty() {
        format!("{}{}", target, inbound)
    } else {
        format!("{}&{}", target, inbound)
    };
    (!merged.is_empty()).then_some(merged)
}
