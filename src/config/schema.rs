//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure shared by every
//! bookinfo service. All types derive Serde traits so an optional TOML file
//! can override any default; command-line positionals and environment
//! variables are applied on top by the loader.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::http::request::Propagation;
use crate::resilience::{timeouts, RetryPolicy};

/// Root configuration for a bookinfo service process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BookinfoConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Where downstream calls and redirects go.
    pub upstream: UpstreamConfig,

    /// Which inbound headers are relayed downstream.
    pub propagation: Propagation,

    /// Feature flags and presentation options.
    pub features: FeatureConfig,

    /// Per-call-site retry policies.
    pub calls: CallPolicies,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:9080").
    pub bind_address: String,

    /// Maximum concurrent connections (TCP echo server).
    pub max_connections: usize,
}

impl ListenerConfig {
    /// Listen on all interfaces at `port`.
    pub fn set_port(&mut self, port: u16) {
        self.bind_address = format!("0.0.0.0:{}", port);
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9080".to_string(),
            max_connections: 1024,
        }
    }
}

/// Downstream and public URLs.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL all downstream calls go through (usually the sidecar proxy).
    pub proxy_url: Option<String>,

    /// Public URL prefix used for post-login redirects. Empty means
    /// redirects are relative to the host.
    pub public_url: String,
}

/// Output format of the reviews service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewsFormat {
    #[default]
    Html,
    Json,
}

/// Which ratings payload the ratings service serves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingsVariant {
    /// JSON map of reviewer to star count.
    #[default]
    Stars,
    /// Plain-text v1 greeting, used by the dynamic update demo.
    V1,
}

/// Feature flags, read once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Reviews call ratings and render stars (`ENABLE_RATINGS`).
    pub enable_ratings: bool,

    /// Star colour (`STAR_COLOR`).
    pub star_color: String,

    /// Version label reported by helloworld (`SERVICE_VERSION`).
    pub service_version: String,

    pub reviews_format: ReviewsFormat,

    pub ratings_variant: RatingsVariant,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            enable_ratings: false,
            star_color: timeouts::DEFAULT_STAR_COLOR.to_string(),
            service_version: "v1".to_string(),
            reviews_format: ReviewsFormat::Html,
            ratings_variant: RatingsVariant::Stars,
        }
    }
}

/// Retry policy settings for one call site.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct CallPolicyConfig {
    /// Total attempts, first one included.
    pub max_attempts: u32,

    /// Per-attempt timeout in milliseconds. `None` uses the call site default.
    pub timeout_ms: Option<u64>,
}

impl CallPolicyConfig {
    pub fn policy(&self, default_timeout: Duration) -> RetryPolicy {
        let timeout = self
            .timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(default_timeout);
        RetryPolicy::new(self.max_attempts, timeout)
    }
}

/// Retry policies of every downstream call site.
///
/// The attempt counts differ per call site on purpose and are kept separate.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CallPolicies {
    /// productpage → details.
    pub details: CallPolicyConfig,

    /// productpage → reviews.
    pub reviews: CallPolicyConfig,

    /// reviews → ratings. The default timeout depends on the star colour.
    pub ratings: CallPolicyConfig,
}

impl CallPolicies {
    pub fn details_policy(&self) -> RetryPolicy {
        self.details.policy(timeouts::DETAILS_TIMEOUT)
    }

    pub fn reviews_policy(&self) -> RetryPolicy {
        self.reviews.policy(timeouts::REVIEWS_TIMEOUT)
    }

    pub fn ratings_policy(&self, star_color: &str) -> RetryPolicy {
        self.ratings.policy(timeouts::ratings_timeout(star_color))
    }
}

impl Default for CallPolicies {
    fn default() -> Self {
        Self {
            details: CallPolicyConfig {
                max_attempts: 1,
                timeout_ms: None,
            },
            reviews: CallPolicyConfig {
                max_attempts: 2,
                timeout_ms: None,
            },
            ratings: CallPolicyConfig {
                max_attempts: 1,
                timeout_ms: None,
            },
        }
    }
}

/// Inbound timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole inbound request deadline in seconds. Must exceed the worst-case
    /// latency of the service's downstream calls.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,

    pub log_format: LogFormat,

    /// Prometheus scrape address. Metrics export is off when unset.
    pub metrics_address: Option<String>,
}
