//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatcher as its only handler
//! - Wire up middleware (tracing)
//! - Bind server to listener
//! - Dispatch requests to the route table

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::proxy::{LoggingObserver, ProxyError, ProxyFactory, ResponseObserver};
use crate::routing::{RouteMatch, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    routes: Arc<RouteTable>,
}

impl GatewayServer {
    /// Create a server that logs every backend response.
    ///
    /// Fails if any route target cannot be bound; nothing is listening yet.
    pub fn new(settings: Settings) -> Result<Self, ProxyError> {
        Self::with_observer(settings, Arc::new(LoggingObserver))
    }

    /// Create a server with a custom response observer.
    pub fn with_observer(
        settings: Settings,
        observer: Arc<dyn ResponseObserver>,
    ) -> Result<Self, ProxyError> {
        tracing::info!("Initializing routes...");

        let factory = ProxyFactory::new(&settings.timeouts, observer);
        let routes = Arc::new(RouteTable::build(&settings.gateway.routes, &factory)?);

        let state = AppState {
            routes: Arc::clone(&routes),
        };
        let router = Self::build_router(state);

        Ok(Self { router, routes })
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .fallback(dispatch)
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, routes = self.routes.len(), "Started server");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Select the matching route and forward, or answer 404.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let path = request.uri().path().to_owned();

    match state.routes.lookup(&path) {
        Some(RouteMatch { handler, remainder }) => handler.handle(request, remainder).await,
        None => {
            tracing::debug!(path = %path, "No route matched");
            (StatusCode::NOT_FOUND, "404 page not found").into_response()
        }
    }
}
