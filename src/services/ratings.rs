//! Book ratings service: fixed star counts per reviewer.

use std::collections::BTreeMap;

use axum::{response::Html, routing::get, Json, Router};

use crate::config::schema::RatingsVariant;
use crate::render::service_page;

/// Body of the v1 variant used by the dynamic update demo.
pub const RATINGS_V1_TEXT: &str = "Hello this is ratings v1";

pub fn ratings() -> BTreeMap<&'static str, u8> {
    BTreeMap::from([("Reviewer1", 5), ("Reviewer2", 4)])
}

pub fn router(variant: RatingsVariant) -> Router {
    let router = Router::new().route("/", get(index));
    match variant {
        RatingsVariant::Stars => router.route("/ratings", get(stars)),
        RatingsVariant::V1 => router.route("/ratings", get(|| async { RATINGS_V1_TEXT })),
    }
}

async fn index() -> Html<String> {
    let content = serde_json::to_string(&ratings()).unwrap_or_default();
    Html(service_page("ratings", &content, ""))
}

async fn stars() -> Json<BTreeMap<&'static str, u8>> {
    Json(ratings())
}
