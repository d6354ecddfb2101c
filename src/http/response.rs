//! Response helpers.
//!
//! # Responsibilities
//! - Build the `Set-Cookie` values for signing in and out
//! - Build `302 Found` redirects carrying an optional cookie
//!
//! # Design Decisions
//! - Cookie values are restricted to RFC 6265 cookie-octets; anything else is
//!   refused rather than quoted
//! - Redirects use 302 so browsers re-issue the target as a GET

use axum::{
    body::Body,
    http::{
        header::{LOCATION, SET_COOKIE},
        HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::http::request::USER_COOKIE;

/// `Set-Cookie` value signing `username` in, or `None` if the name cannot be
/// carried in a cookie.
pub fn sign_in_cookie(username: &str) -> Option<HeaderValue> {
    if username.is_empty() || !username.chars().all(is_cookie_octet) {
        return None;
    }
    HeaderValue::from_str(&format!("{}={}; Path=/", USER_COOKIE, username)).ok()
}

/// `Set-Cookie` value expiring the session cookie.
pub fn sign_out_cookie() -> HeaderValue {
    HeaderValue::from_static("user=; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; Path=/")
}

/// `302 Found` to `location`, optionally setting a cookie.
pub fn redirect_found(location: &str, cookie: Option<HeaderValue>) -> Response {
    let location = HeaderValue::from_str(location).unwrap_or_else(|_| HeaderValue::from_static("/"));

    let mut builder = Response::builder()
        .status(StatusCode::FOUND)
        .header(LOCATION, location);
    if let Some(cookie) = cookie {
        builder = builder.header(SET_COOKIE, cookie);
    }

    match builder.body(Body::empty()) {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(error = %e, "Failed to build redirect");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn is_cookie_octet(c: char) -> bool {
    c.is_ascii_graphic() && !matches!(c, '"' | ',' | ';' | '\\')
}
