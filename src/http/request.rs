//! Inbound request inspection and header forwarding.
//!
//! # Responsibilities
//! - Read the `user` session cookie from inbound requests
//! - Pick up the correlation header (`X-Request-ID` or `X-Gremlin-ID`)
//! - Build the whitelisted [`ForwardHeaders`] relayed to downstream calls
//!
//! # Design Decisions
//! - The whitelist is a struct with optional fields, not an open map, so
//!   nothing outside it can ever be forwarded
//! - Absence on the inbound side means absence on the outbound side; no id
//!   is generated here
//! - Extraction is pure and infallible; malformed values are skipped

use axum::http::{
    header::{HeaderName, COOKIE},
    HeaderMap, HeaderValue,
};
use serde::{Deserialize, Serialize};

/// Session cookie carrying the signed-in user name.
pub const USER_COOKIE: &str = "user";

/// Correlation header used by the mesh-aware services.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Correlation header used by the gremlin fault-injection harness.
pub const X_GREMLIN_ID: &str = "x-gremlin-id";

/// Which correlation header a service relays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CorrelationHeader {
    #[default]
    RequestId,
    GremlinId,
}

impl CorrelationHeader {
    pub fn header_name(self) -> HeaderName {
        match self {
            Self::RequestId => HeaderName::from_static(X_REQUEST_ID),
            Self::GremlinId => HeaderName::from_static(X_GREMLIN_ID),
        }
    }
}

/// Per-service forwarding whitelist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Propagation {
    /// Relay the `user` cookie.
    pub forward_user_cookie: bool,

    /// Correlation header to relay.
    pub correlation_header: CorrelationHeader,
}

impl Propagation {
    /// Legacy productpage behaviour: gremlin id only, no session cookie.
    pub fn gremlin() -> Self {
        Self {
            forward_user_cookie: false,
            correlation_header: CorrelationHeader::GremlinId,
        }
    }
}

impl Default for Propagation {
    fn default() -> Self {
        Self {
            forward_user_cookie: true,
            correlation_header: CorrelationHeader::RequestId,
        }
    }
}

/// Value of the `user` session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCookie(String);

impl UserCookie {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A correlation token and the header it travels in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId {
    header: CorrelationHeader,
    value: HeaderValue,
}

#[cfg(test)]
impl CorrelationId {
    pub fn header(&self) -> CorrelationHeader {
        self.header
    }

    pub fn value(&self) -> &HeaderValue {
        &self.value
    }
}

/// Whitelisted headers relayed from an inbound request to downstream calls.
///
/// Built once per inbound request and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardHeaders {
    user: Option<UserCookie>,
    correlation: Option<CorrelationId>,
}

impl ForwardHeaders {
    /// Extract the whitelisted subset of `headers`.
    pub fn extract(headers: &HeaderMap, propagation: Propagation) -> Self {
        let user = if propagation.forward_user_cookie {
            cookie_value(headers, USER_COOKIE)
                .filter(|value| !value.is_empty())
                .map(|value| UserCookie(value.to_owned()))
        } else {
            None
        };

        let header = propagation.correlation_header;
        let correlation = headers
            .get(header.header_name())
            .map(|value| CorrelationId {
                header,
                value: value.clone(),
            });

        Self { user, correlation }
    }

    #[cfg(test)]
    pub fn user(&self) -> Option<&str> {
        self.user.as_ref().map(UserCookie::as_str)
    }

    #[cfg(test)]
    pub fn correlation(&self) -> Option<&CorrelationId> {
        self.correlation.as_ref()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.user.is_none() && self.correlation.is_none()
    }

    /// Render as outbound request headers.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::with_capacity(2);

        if let Some(user) = &self.user {
            // Built from an inbound header value, so this only fails on
            // values that could not have been read in the first place.
            if let Ok(value) = HeaderValue::from_str(&format!("{}={}", USER_COOKIE, user.as_str())) {
                headers.insert(COOKIE, value);
            }
        }

        if let Some(id) = &self.correlation {
            headers.insert(id.header.header_name(), id.value.clone());
        }

        headers
    }
}

/// Look up a cookie by name across every `Cookie` header.
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|raw| raw.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().trim_matches('"'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                HeaderName::from_bytes(name.as_bytes()).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn test_no_user_cookie_means_no_cookie_forwarded() {
        let inbound = headers(&[("cookie", "theme=dark; lang=en")]);
        let forward = ForwardHeaders::extract(&inbound, Propagation::default());

        assert_eq!(forward.user(), None);
        assert!(forward.to_header_map().get(COOKIE).is_none());
    }

    #[test]
    fn test_user_cookie_is_forwarded_alone() {
        let inbound = headers(&[("cookie", "theme=dark; user=jason; lang=en")]);
        let forward = ForwardHeaders::extract(&inbound, Propagation::default());

        assert_eq!(forward.user(), Some("jason"));
        assert_eq!(forward.to_header_map().get(COOKIE).unwrap(), "user=jason");
    }

    #[test]
    fn test_user_cookie_found_in_second_cookie_header() {
        let inbound = headers(&[("cookie", "theme=dark"), ("cookie", "user=jason")]);
        let forward = ForwardHeaders::extract(&inbound, Propagation::default());
        assert_eq!(forward.user(), Some("jason"));
    }

    #[test]
    fn test_empty_user_cookie_is_absent() {
        let inbound = headers(&[("cookie", "user=")]);
        let forward = ForwardHeaders::extract(&inbound, Propagation::default());
        assert!(forward.is_empty());
    }

    #[test]
    fn test_request_id_is_forwarded_unchanged() {
        let inbound = headers(&[("x-request-id", "a1b2-C3D4 ;x")]);
        let forward = ForwardHeaders::extract(&inbound, Propagation::default());

        let outbound = forward.to_header_map();
        assert_eq!(outbound.get(X_REQUEST_ID).unwrap(), "a1b2-C3D4 ;x");
        assert_eq!(outbound.len(), 1);
    }

    #[test]
    fn test_missing_request_id_is_not_generated() {
        let forward = ForwardHeaders::extract(&HeaderMap::new(), Propagation::default());
        assert!(forward.is_empty());
        assert!(forward.to_header_map().is_empty());
    }

    #[test]
    fn test_arbitrary_headers_never_leak() {
        let inbound = headers(&[
            ("authorization", "Bearer secret"),
            ("x-other", "1"),
            ("x-gremlin-id", "g-1"),
            ("x-request-id", "r-1"),
            ("cookie", "user=jason; session=abc"),
        ]);
        let outbound = ForwardHeaders::extract(&inbound, Propagation::default()).to_header_map();

        assert_eq!(outbound.len(), 2);
        assert!(outbound.get(AUTHORIZATION).is_none());
        assert!(outbound.get("x-other").is_none());
        assert!(outbound.get(X_GREMLIN_ID).is_none());
        assert_eq!(outbound.get(COOKIE).unwrap(), "user=jason");
    }

    #[test]
    fn test_gremlin_propagation_drops_cookie_and_request_id() {
        let inbound = headers(&[
            ("x-gremlin-id", "g-42"),
            ("x-request-id", "r-1"),
            ("cookie", "user=jason"),
        ]);
        let forward = ForwardHeaders::extract(&inbound, Propagation::gremlin());

        assert_eq!(forward.user(), None);
        let id = forward.correlation().unwrap();
        assert_eq!(id.header(), CorrelationHeader::GremlinId);
        assert_eq!(id.value(), "g-42");

        let outbound = forward.to_header_map();
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound.get(X_GREMLIN_ID).unwrap(), "g-42");
    }

    #[test]
    fn test_cookie_value_strips_quotes_and_spaces() {
        let inbound = headers(&[("cookie", " user = \"jason\" ")]);
        assert_eq!(cookie_value(&inbound, "user"), Some("jason"));
        assert_eq!(cookie_value(&inbound, "missing"), None);
    }
}
