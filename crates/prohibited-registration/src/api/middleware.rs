//! Request logging middleware.

use super::{QUEUE_ROUTE, TEST_ROUTE};
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Function name the host invoked, for routes that are function invocations.
pub fn function_name(path: &str) -> Option<&'static str> {
    match path {
        QUEUE_ROUTE => Some("ProhibitedRegFunction"),
        TEST_ROUTE => Some("TestRegistration"),
        _ => None,
    }
}

/// Logs each request. Function invocations are logged at `info` with the
/// function name; anything else (health probes) only at `debug`.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let function = function_name(uri.path());
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed();
    let status = response.status();

    match function {
        _ if !status.is_success() => {
            warn!(%method, %uri, %status, ?duration, function, "Invocation failed")
        }
        Some(function) => info!(function, %status, ?duration, "Invocation handled"),
        None => debug!(%method, %uri, %status, ?duration, "Request completed"),
    }

    response
}
