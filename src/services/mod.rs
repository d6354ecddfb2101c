//! The bookinfo services.
//!
//! # Topology
//! ```text
//! productpage ──▶ details
//!             └─▶ reviews ──▶ ratings   (only with ENABLE_RATINGS=true)
//! helloworld                            (standalone)
//! ```
//!
//! Each service module exposes a `router` building its axum routes from the
//! frozen config. Liveness (`/health`) and the middleware stack are added by
//! [`crate::http::HttpServer`].

pub mod details;
pub mod helloworld;
pub mod productpage;
pub mod ratings;
pub mod reviews;

use axum::Router;
use thiserror::Error;

use crate::config::{BookinfoConfig, FeatureConfig};
use crate::upstream::DownstreamClient;

/// Errors building a service from its configuration.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0} requires a downstream proxy url")]
    MissingProxyUrl(&'static str),

    #[error("invalid downstream url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build http client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Which service this process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    ProductPage,
    Details,
    Reviews,
    Ratings,
    HelloWorld,
}

impl Service {
    pub fn name(self) -> &'static str {
        match self {
            Self::ProductPage => "productpage",
            Self::Details => "details",
            Self::Reviews => "reviews",
            Self::Ratings => "ratings",
            Self::HelloWorld => "helloworld",
        }
    }

    /// Whether the service makes downstream calls with these feature flags.
    pub fn calls_downstream(self, features: &FeatureConfig) -> bool {
        match self {
            Self::ProductPage => true,
            Self::Reviews => features.enable_ratings,
            Self::Details | Self::Ratings | Self::HelloWorld => false,
        }
    }

    /// Build the service's routes.
    pub fn router(self, config: &BookinfoConfig, client: DownstreamClient) -> Result<Router, ServiceError> {
        match self {
            Self::ProductPage => productpage::router(config, client),
            Self::Details => Ok(details::router()),
            Self::Reviews => reviews::router(config, client),
            Self::Ratings => Ok(ratings::router(config.features.ratings_variant)),
            Self::HelloWorld => Ok(helloworld::router(&config.features)),
        }
    }
}

/// Base URL for downstream calls, required by services that make them.
fn proxy_url(config: &BookinfoConfig, service: Service) -> Result<&str, ServiceError> {
    config
        .upstream
        .proxy_url
        .as_deref()
        .ok_or(ServiceError::MissingProxyUrl(service.name()))
}
