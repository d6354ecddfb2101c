//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that services with downstream calls have a usable proxy URL
//! - Validate value ranges (attempts > 0, timeouts > 0)
//! - Check that the inbound deadline covers the downstream worst case, so a
//!   degraded page is rendered instead of an inbound timeout
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function of the config and the service being run

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::{BookinfoConfig, CallPolicyConfig};
use crate::services::Service;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    BindAddress(String),

    #[error("{0} needs a downstream proxy url")]
    MissingProxyUrl(&'static str),

    #[error("invalid {field} {value:?}: {reason}")]
    Url {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("calls.{0}.max_attempts must be at least 1")]
    ZeroAttempts(&'static str),

    #[error("calls.{0}.timeout_ms must be greater than 0")]
    ZeroTimeout(&'static str),

    #[error("features.star_color must not be empty")]
    EmptyStarColor,

    #[error("timeouts.request_secs ({request:?}) must exceed the downstream worst case ({downstream:?})")]
    RequestDeadlineTooShort { request: Duration, downstream: Duration },

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),
}

/// Validate `config` for running `service`.
pub fn validate_config(config: &BookinfoConfig, service: Service) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::MetricsAddress(addr.clone()));
        }
    }

    for (name, call) in [
        ("details", &config.calls.details),
        ("reviews", &config.calls.reviews),
        ("ratings", &config.calls.ratings),
    ] {
        check_call(name, call, &mut errors);
    }

    if config.features.star_color.trim().is_empty() {
        errors.push(ValidationError::EmptyStarColor);
    }

    if service.calls_downstream(&config.features) {
        match &config.upstream.proxy_url {
            None => errors.push(ValidationError::MissingProxyUrl(service.name())),
            Some(raw) => check_url("upstream.proxy_url", raw, &mut errors),
        }
    }

    if service == Service::ProductPage && HeaderValue::from_str(&config.upstream.public_url).is_err() {
        errors.push(ValidationError::Url {
            field: "upstream.public_url",
            value: config.upstream.public_url.clone(),
            reason: "not usable in a Location header".to_string(),
        });
    }

    let request = Duration::from_secs(config.timeouts.request_secs);
    let downstream = downstream_budget(config, service);
    if request <= downstream {
        errors.push(ValidationError::RequestDeadlineTooShort { request, downstream });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Worst-case time `service` spends waiting on downstream calls per request.
pub fn downstream_budget(config: &BookinfoConfig, service: Service) -> Duration {
    let calls = &config.calls;
    match service {
        Service::ProductPage => calls
            .details_policy()
            .worst_case_latency()
            .saturating_add(calls.reviews_policy().worst_case_latency()),
        Service::Reviews if config.features.enable_ratings => calls
            .ratings_policy(&config.features.star_color)
            .worst_case_latency(),
        _ => Duration::ZERO,
    }
}

fn check_call(name: &'static str, call: &CallPolicyConfig, errors: &mut Vec<ValidationError>) {
    if call.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts(name));
    }
    if call.timeout_ms == Some(0) {
        errors.push(ValidationError::ZeroTimeout(name));
    }
}

fn check_url(field: &'static str, raw: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ValidationError::Url {
            field,
            value: raw.to_string(),
            reason: format!("unsupported scheme {}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError::Url {
            field,
            value: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}
