//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers under the configured prefix
//! - Wire up middleware (request ID, tracing, content type, metrics)
//! - Serve on a bound listener until the shutdown signal fires

use axum::{
    http::{header::CONTENT_TYPE, HeaderName, HeaderValue},
    middleware,
    routing::post,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::handlers::{self, AppState};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::http::response;
use crate::observability::{metrics, tracing_logger, Logger};
use crate::source::SourceClient;

/// HTTP server for the schedule gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a new HTTP server logging through `tracing`.
    pub fn new(config: GatewayConfig, source: Arc<dyn SourceClient>) -> Self {
        Self::with_logger(config, source, tracing_logger())
    }

    /// Create a new HTTP server with an explicit logger for the gateway core.
    pub fn with_logger(
        config: GatewayConfig,
        source: Arc<dyn SourceClient>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        let state = AppState::new(
            source,
            logger,
            Duration::from_secs(config.timeouts.upstream_secs),
        );
        let router = build_router(&config.api.path_prefix, state);
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            prefix = %self.config.api.path_prefix,
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

    /// The fully layered router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(prefix: &str, state: AppState) -> Router {
    let api = Router::new()
        .route("/groups", post(handlers::groups))
        .route("/teachers", post(handlers::teachers))
        .route("/schedule", post(handlers::schedule))
        .route("/announces", post(handlers::announces))
        .method_not_allowed_fallback(response::method_not_allowed)
        .with_state(state);

    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(prefix, api)
    };

    let request_id = HeaderName::from_static(X_REQUEST_ID);

    app.fallback(response::not_found)
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(SetResponseHeaderLayer::if_not_present(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}
