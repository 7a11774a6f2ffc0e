//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the edge handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener
//! - Dispatch requests through the path filter and host router
//! - Answer redirects, forward rewrites and pass-throughs upstream
//! - Observability (metrics, correlation IDs)

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::RouterConfig;
use crate::error::StartupError;
use crate::http::forward::Upstream;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response;
use crate::observability::metrics;
use crate::routing::{HostRouter, PathFilter, RoutingDecision};
use crate::session::{self, SessionProvider};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<HostRouter>,
    pub filter: Arc<PathFilter>,
    pub upstream: Upstream,
}

/// HTTP server for the tenant router.
pub struct HttpServer {
    router: Router,
    config: RouterConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the configured session provider.
    pub fn new(config: RouterConfig) -> Result<Self, StartupError> {
        let sessions = session::from_config(&config.session)?;
        Self::with_sessions(config, sessions)
    }

    /// Create a new HTTP server with an explicit session provider.
    pub fn with_sessions(
        config: RouterConfig,
        sessions: Arc<dyn SessionProvider>,
    ) -> Result<Self, StartupError> {
        let upstream = Upstream::from_config(
            &config.upstream,
            &config.timeouts,
            &config.listener.public_scheme,
        )?;

        let state = AppState {
            router: Arc::new(HostRouter::from_config(&config, sessions)),
            filter: Arc::new(PathFilter::from_config(&config.filter)),
            upstream,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(edge_handler))
            .route("/", any(edge_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
            .layer(propagate_request_id_layer())
            .layer(set_request_id_layer())
    }

    /// The assembled Axum router, for embedding or in-process testing.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.address,
            root_domain = %self.config.tenancy.root_domain,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }
}

/// Edge handler.
/// Filters, routes, then redirects or forwards.
async fn edge_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts).to_string();

    let (rule, decision) = if state.filter.should_route(parts.uri.path()) {
        match state.router.evaluate(&parts).await {
            Ok(routed) => (routed.rule, routed.decision),
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Request rejected");
                metrics::record_rejection("host");
                return e.into_response();
            }
        }
    } else {
        ("filter", RoutingDecision::PassThrough)
    };

    tracing::debug!(
        request_id = %request_id,
        rule,
        decision = decision.label(),
        "Dispatching request"
    );
    metrics::record_decision(decision.label(), rule, start_time);

    let target = match decision {
        RoutingDecision::Redirect { location, kind } => {
            return response::redirect(&location, kind);
        }
        RoutingDecision::Rewrite { path } => Some(path),
        RoutingDecision::PassThrough => None,
    };

    match state.upstream.forward(parts, body, target.as_deref()).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                upstream = %state.upstream.authority(),
                error = %e,
                "Upstream error"
            );
            metrics::record_rejection("upstream");
            e.into_response()
        }
    }
}
