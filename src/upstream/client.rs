//! HTTP client for downstream services.

use std::time::{Duration, Instant};

use axum::http::StatusCode;
use thiserror::Error;
use tokio::time;
use url::Url;

use crate::http::request::ForwardHeaders;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;

/// Why a downstream call did not produce content.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallFailure {
    /// The attempt did not complete within its deadline.
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    /// Connection refused, DNS failure, reset, malformed response.
    #[error("connection error: {0}")]
    Connection(String),

    /// The service answered with something other than `200 OK`.
    #[error("unexpected status code {0}")]
    NonSuccessStatus(StatusCode),
}

impl CallFailure {
    /// Metrics label.
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Timeout(_) => "timeout",
            Self::Connection(_) => "connection_error",
            Self::NonSuccessStatus(_) => "bad_status",
        }
    }
}

/// Result of a downstream call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceCallResult {
    Success { body: String, status: StatusCode },
    Failure(CallFailure),
}

impl ServiceCallResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Success { body, .. } => Some(body),
            Self::Failure(_) => None,
        }
    }

    /// Body on success, `fallback` otherwise.
    pub fn into_body_or(self, fallback: &str) -> String {
        match self {
            Self::Success { body, .. } => body,
            Self::Failure(_) => fallback.to_owned(),
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Failure(failure) => failure.outcome(),
        }
    }
}

/// A downstream endpoint together with the policy used to call it.
#[derive(Debug, Clone)]
pub struct Downstream {
    name: &'static str,
    url: Url,
    policy: RetryPolicy,
}

impl Downstream {
    /// Resolve `<base_url>/<name>/<endpoint>`.
    pub fn resolve(
        base_url: &str,
        name: &'static str,
        endpoint: &str,
        policy: RetryPolicy,
    ) -> Result<Self, url::ParseError> {
        let url = Url::parse(&format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            name,
            endpoint
        ))?;
        Ok(Self { name, url, policy })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

/// Shared outbound client. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DownstreamClient {
    http: reqwest::Client,
}

impl DownstreamClient {
    /// Build a client. The downstream base URL already is the mesh proxy, so
    /// environment proxy settings are ignored.
    pub fn new() -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .no_proxy()
            .user_agent(concat!("bookinfo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Call `target`, retrying per its policy.
    pub async fn call(&self, target: &Downstream, headers: &ForwardHeaders) -> ServiceCallResult {
        let start = Instant::now();
        let policy = target.policy;
        let mut attempt = 0;

        let result = loop {
            attempt += 1;
            let result = self
                .attempt(&target.url, headers, policy.per_attempt_timeout())
                .await;

            match &result {
                ServiceCallResult::Success { .. } => break result,
                ServiceCallResult::Failure(failure) => {
                    tracing::warn!(
                        service = target.name,
                        url = %target.url,
                        attempt,
                        max_attempts = policy.max_attempts(),
                        error = %failure,
                        "Downstream attempt failed"
                    );
                    if !policy.should_retry(attempt) {
                        break result;
                    }
                }
            }
        };

        metrics::record_downstream_call(target.name, result.outcome(), start);
        result
    }

    /// Call `target` and resolve to its body, or to `fallback` when every
    /// attempt failed.
    pub async fn fetch_or_fallback(
        &self,
        target: &Downstream,
        headers: &ForwardHeaders,
        fallback: &str,
    ) -> String {
        let result = self.call(target, headers).await;
        if !result.is_success() {
            tracing::error!(service = target.name, "Downstream unavailable, rendering fallback");
        }
        result.into_body_or(fallback)
    }

    async fn attempt(&self, url: &Url, headers: &ForwardHeaders, timeout: Duration) -> ServiceCallResult {
        let request = self.http.get(url.clone()).headers(headers.to_header_map());

        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>((status, body))
        };

        match time::timeout(timeout, exchange).await {
            Err(_) => ServiceCallResult::Failure(CallFailure::Timeout(timeout)),
            Ok(Err(e)) if e.is_timeout() => ServiceCallResult::Failure(CallFailure::Timeout(timeout)),
            Ok(Err(e)) => ServiceCallResult::Failure(CallFailure::Connection(e.to_string())),
            Ok(Ok((status, body))) if status == StatusCode::OK => {
                ServiceCallResult::Success { body, status }
            }
            Ok(Ok((status, _))) => ServiceCallResult::Failure(CallFailure::NonSuccessStatus(status)),
        }
    }
}
