//! Hello world service, used for version-routing demos.

use std::sync::Arc;

use axum::{extract::State, routing::get, Router};

use crate::config::FeatureConfig;

struct HelloWorld {
    greeting: String,
}

pub fn router(features: &FeatureConfig) -> Router {
    let instance = hostname::get()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Could not read hostname");
            "unknown".to_string()
        });

    let state = Arc::new(HelloWorld {
        greeting: greeting(&features.service_version, &instance),
    });

    Router::new().route("/hello", get(hello)).with_state(state)
}

pub fn greeting(version: &str, instance: &str) -> String {
    format!("Hello version: {}, instance: {}\n", version, instance)
}

async fn hello(State(state): State<Arc<HelloWorld>>) -> String {
    state.greeting.clone()
}
