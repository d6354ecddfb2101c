//! Inbound request metrics.

use std::time::Instant;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};

use crate::observability::metrics;
use crate::services::Service;

/// Count and time every inbound request, labelled with the serving service.
pub async fn request_metrics_middleware(
    State(service): State<Service>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let response = next.run(request).await;
    metrics::record_request(service.name(), response.status().as_u16(), start);
    response
}
