//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build shared application state (store, orchestrator, aggregator)
//! - Create the Axum router with all handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve until an OS signal or a `Shutdown` trigger

use axum::{
    extract::Request,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::aggregation::{AccumulatorPool, OrderAggregator};
use crate::config::ServiceConfig;
use crate::http::handlers::{self, AGGREGATE_ROUTE, HEALTH_ROUTE, JSON_AGGREGATE_ROUTE, USER_PROFILE_ROUTE};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::lifecycle::signals;
use crate::orchestrator::ProfileOrchestrator;
use crate::store::ProfileStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ProfileStore>,
    pub orchestrator: ProfileOrchestrator,
    pub aggregator: OrderAggregator,
}

impl AppState {
    pub fn new(config: &ServiceConfig, store: Arc<dyn ProfileStore>) -> Self {
        let pool = Arc::new(AccumulatorPool::new(&config.aggregation));
        Self {
            orchestrator: ProfileOrchestrator::new(store.clone(), config.profile.clone()),
            aggregator: OrderAggregator::new(pool),
            store,
        }
    }
}

pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: ServiceConfig, store: Arc<dyn ProfileStore>) -> Self {
        let state = AppState::new(&config, store);
        let router = Self::build_router(&config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The request id is set before tracing opens its span and is copied
    /// onto every response, timeouts included.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        let middleware = ServiceBuilder::new()
            .layer(set_request_id_layer())
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request_id(request.headers()),
                )
            }))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)));

        Router::new()
            .route(HEALTH_ROUTE, get(handlers::health))
            .route(USER_PROFILE_ROUTE, get(handlers::user_profile))
            .route(AGGREGATE_ROUTE, post(handlers::aggregate_orders))
            .route(JSON_AGGREGATE_ROUTE, post(handlers::json_aggregate))
            .with_state(state)
            .layer(middleware)
    }

    /// Serve on `listener` until Ctrl+C/SIGTERM or `shutdown` fires.
    /// In-flight requests are allowed to finish.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                tokio::select! {
                    _ = signals::wait_for_signal() => {}
                    _ = shutdown.recv() => {}
                }
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
