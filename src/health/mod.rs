//! Liveness endpoint.
//!
//! `GET /health` answers 200 with a fixed body as long as the process can
//! serve HTTP. Dependencies are not probed: a service whose downstreams are
//! down still renders (degraded) pages, so it is still alive.

use axum::{routing::get, Router};

use crate::services::Service;

pub const HEALTH_PATH: &str = "/health";

pub fn router(service: Service) -> Router {
    let body = format!("{} is healthy", service.name());
    Router::new().route(
        HEALTH_PATH,
        get(move || {
            let body = body.clone();
            async move { body }
        }),
    )
}
