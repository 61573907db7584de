//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;

use service_gateway::config::{RouteConfig, Settings};
use service_gateway::proxy::{LoggingObserver, ResponseObserver};
use service_gateway::{GatewayServer, Shutdown};

/// Serve `app` on an ephemeral local port.
pub async fn start_backend(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

/// A backend that describes the request it received as JSON.
///
/// Responds `201 Created` with an `x-backend: echo` header.
pub async fn start_echo_backend() -> SocketAddr {
    start_backend(Router::new().fallback(echo)).await
}

async fn echo(request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap();

    let mut headers = Map::new();
    for (name, value) in parts.headers.iter() {
        headers.insert(
            name.to_string(),
            Value::String(value.to_str().unwrap_or_default().to_string()),
        );
    }

    let description = json!({
        "method": parts.method.as_str(),
        "uri": parts.uri.to_string(),
        "headers": headers,
        "body": String::from_utf8_lossy(&body),
    });

    (
        axum::http::StatusCode::CREATED,
        [("x-backend", "echo")],
        axum::Json(description),
    )
        .into_response()
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

pub fn route(name: &str, context: &str, backend: SocketAddr) -> RouteConfig {
    RouteConfig::new(name, context, format!("http://{}", backend))
}

pub fn settings(routes: Vec<RouteConfig>) -> Settings {
    let mut settings = Settings::default();
    settings.gateway.listen_addr = "127.0.0.1:0".into();
    settings.gateway.routes = routes;
    settings
}

/// A running gateway; dropping it triggers shutdown.
pub struct TestGateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

pub async fn start_gateway(settings: Settings) -> TestGateway {
    start_gateway_with_observer(settings, Arc::new(LoggingObserver)).await
}

pub async fn start_gateway_with_observer(
    settings: Settings,
    observer: Arc<dyn ResponseObserver>,
) -> TestGateway {
    let server = GatewayServer::with_observer(settings, observer).unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway { addr, shutdown }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
