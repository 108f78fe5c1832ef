//! HTTP surface: the functions-host invocation routes and health.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{function_name, logging_middleware};
pub use types::*;

use crate::config::QueueConfig;
use crate::dispatch::Sinks;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Route of the queue-triggered function.
pub const QUEUE_ROUTE: &str = "/ProhibitedRegFunction";

/// Route of the manual test function.
pub const TEST_ROUTE: &str = "/api/TestRegistration";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Audit and alert sinks
    pub sinks: Sinks,
    /// Topic subscription names, for reporting
    pub queue: Arc<QueueConfig>,
}

impl AppState {
    /// Create new application state.
    pub fn new(sinks: Sinks, queue: QueueConfig) -> Self {
        Self {
            sinks,
            queue: Arc::new(queue),
        }
    }
}

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(QUEUE_ROUTE, post(handlers::queue_invocation))
        .route(TEST_ROUTE, post(handlers::test_registration))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
