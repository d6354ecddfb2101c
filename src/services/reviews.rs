//! Book reviews service.
//!
//! # Responsibilities
//! - Serve two fixed reviews as HTML (or JSON)
//! - When ratings are enabled, look up star counts from the ratings service
//!   and render them in the configured colour
//!
//! # Design Decisions
//! - With ratings disabled the ratings service is never called
//! - A failed or unparsable ratings lookup renders reviews without stars

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::config::schema::{BookinfoConfig, ReviewsFormat};
use crate::http::request::{ForwardHeaders, Propagation};
use crate::render::stars::MAX_STARS;
use crate::render::{escape_html, render_stars, service_page};
use crate::services::{proxy_url, Service, ServiceError};
use crate::upstream::{Downstream, DownstreamClient, ServiceCallResult};

/// One fixed review.
#[derive(Debug, Clone, Copy)]
pub struct Review {
    pub reviewer: &'static str,
    pub affiliation: &'static str,
    pub text: &'static str,
}

pub const REVIEWS: [Review; 2] = [
    Review {
        reviewer: "Reviewer1",
        affiliation: "Affiliation1",
        text: "An extremely entertaining play by Shakespeare. The slapstick humour is refreshing!",
    },
    Review {
        reviewer: "Reviewer2",
        affiliation: "Affiliation2",
        text: "Absolutely fun and entertaining. The play lacks thematic depth when compared to other plays by Shakespeare.",
    },
];

/// Star counts keyed by reviewer.
pub type Ratings = BTreeMap<String, u8>;

struct ReviewsService {
    client: DownstreamClient,
    /// `None` when ratings are disabled.
    ratings: Option<Downstream>,
    propagation: Propagation,
    star_color: String,
    format: ReviewsFormat,
    index_html: String,
}

pub fn router(config: &BookinfoConfig, client: DownstreamClient) -> Result<Router, ServiceError> {
    let features = &config.features;
    let ratings = if features.enable_ratings {
        let base = proxy_url(config, Service::Reviews)?;
        let policy = config.calls.ratings_policy(&features.star_color);
        Some(Downstream::resolve(base, "ratings", "ratings", policy)?)
    } else {
        None
    };

    let index_html = service_page(
        "reviews",
        &render_reviews(&Ratings::new(), &features.star_color),
        &format!(
            "<p>Ratings service enabled? {}</p>\n<p>Star color: {} </p>",
            features.enable_ratings,
            escape_html(&features.star_color)
        ),
    );

    let state = Arc::new(ReviewsService {
        client,
        ratings,
        propagation: config.propagation,
        star_color: features.star_color.clone(),
        format: features.reviews_format,
        index_html,
    });

    Ok(Router::new()
        .route("/", get(index))
        .route("/reviews", get(reviews))
        .with_state(state))
}

async fn index(State(state): State<Arc<ReviewsService>>) -> Html<String> {
    Html(state.index_html.clone())
}

async fn reviews(State(state): State<Arc<ReviewsService>>, headers: HeaderMap) -> Response {
    let ratings = match &state.ratings {
        Some(target) => {
            let forward = ForwardHeaders::extract(&headers, state.propagation);
            fetch_ratings(&state.client, target, &forward).await
        }
        None => Ratings::new(),
    };

    match state.format {
        ReviewsFormat::Html => Html(render_reviews(&ratings, &state.star_color)).into_response(),
        ReviewsFormat::Json => Json(reviews_json(&ratings, &state.star_color)).into_response(),
    }
}

async fn fetch_ratings(client: &DownstreamClient, target: &Downstream, forward: &ForwardHeaders) -> Ratings {
    match client.call(target, forward).await {
        ServiceCallResult::Success { body, .. } => parse_ratings(&body),
        ServiceCallResult::Failure(failure) => {
            tracing::error!(error = %failure, "Ratings unavailable, rendering reviews without stars");
            Ratings::new()
        }
    }
}

/// Parse a `{"Reviewer1": 5, ...}` body. Entries that are not non-negative
/// integers are skipped, values above [`MAX_STARS`] are clamped, and an
/// unparsable body yields no ratings.
pub fn parse_ratings(body: &str) -> Ratings {
    let map = match serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(body) {
        Ok(map) => map,
        Err(e) => {
            tracing::warn!(error = %e, "Ignoring malformed ratings body");
            return Ratings::new();
        }
    };

    map.into_iter()
        .filter_map(|(reviewer, value)| {
            let stars = value.as_u64()?.min(u64::from(MAX_STARS));
            Some((reviewer, u8::try_from(stars).unwrap_or(MAX_STARS)))
        })
        .collect()
}

/// HTML fragment with one blockquote per review; stars only for reviewers
/// present in `ratings`.
pub fn render_reviews(ratings: &Ratings, star_color: &str) -> String {
    REVIEWS
        .iter()
        .map(|review| {
            let stars = ratings
                .get(review.reviewer)
                .map(|stars| render_stars(*stars, star_color))
                .unwrap_or_default();
            format!(
                "<blockquote>\n<p>\n{}\n</p> <small>{} <cite>{}</cite></small>\n{}\n</blockquote>\n",
                review.text, review.reviewer, review.affiliation, stars
            )
        })
        .collect()
}

#[derive(Debug, Serialize)]
pub struct ReviewBody {
    pub text: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingBody>,
}

#[derive(Debug, Serialize)]
pub struct RatingBody {
    pub stars: u8,
    pub color: String,
}

/// JSON rendition, keyed by reviewer.
pub fn reviews_json(ratings: &Ratings, star_color: &str) -> BTreeMap<&'static str, ReviewBody> {
    REVIEWS
        .iter()
        .map(|review| {
            let rating = ratings.get(review.reviewer).map(|stars| RatingBody {
                stars: *stars,
                color: star_color.to_string(),
            });
            (
                review.reviewer,
                ReviewBody {
                    text: review.text,
                    rating,
                },
            )
        })
        .collect()
}
