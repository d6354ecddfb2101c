//! Product page: the front service.
//!
//! # Responsibilities
//! - Serve the index page with the service topology
//! - Fan out to details, then reviews, and combine both into one page
//! - Sign users in and out through the `user` cookie
//!
//! # Design Decisions
//! - Details complete (or fall back) before reviews start
//! - A dead or slow dependency degrades the page, never the status code

use std::sync::Arc;

use axum::{
    extract::State,
    http::HeaderMap,
    response::{Html, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;

use crate::config::BookinfoConfig;
use crate::http::request::{cookie_value, ForwardHeaders, Propagation, USER_COOKIE};
use crate::http::response::{redirect_found, sign_in_cookie, sign_out_cookie};
use crate::render::{escape_html, page, ServiceTopology};
use crate::services::{proxy_url, Service, ServiceError};
use crate::upstream::{Downstream, DownstreamClient};

pub const DETAILS_FALLBACK: &str =
    "<h3>Sorry, product details are currently unavailable for this book.</h3>";

pub const REVIEWS_FALLBACK: &str =
    "<h3>Sorry, product reviews are currently unavailable for this book.</h3>";

struct ProductPage {
    client: DownstreamClient,
    details: Downstream,
    reviews: Downstream,
    propagation: Propagation,
    /// Where login and logout send the browser.
    home_url: String,
    /// The index never changes, so it is rendered once.
    index_html: String,
}

pub fn router(config: &BookinfoConfig, client: DownstreamClient) -> Result<Router, ServiceError> {
    let base = proxy_url(config, Service::ProductPage)?;
    let details = Downstream::resolve(base, "details", "details", config.calls.details_policy())?;
    let reviews = Downstream::resolve(base, "reviews", "reviews", config.calls.reviews_policy())?;

    let state = Arc::new(ProductPage {
        client,
        details,
        reviews,
        propagation: config.propagation,
        home_url: format!(
            "{}/productpage/productpage",
            config.upstream.public_url.trim_end_matches('/')
        ),
        index_html: render_index(&ServiceTopology::bookinfo()),
    });

    Ok(Router::new()
        .route("/", get(index))
        .route("/index.html", get(index))
        .route("/productpage", get(front))
        .route("/login", post(login))
        .route("/logout", get(logout))
        .with_state(state))
}

async fn index(State(state): State<Arc<ProductPage>>) -> Html<String> {
    Html(state.index_html.clone())
}

async fn front(State(state): State<Arc<ProductPage>>, headers: HeaderMap) -> Html<String> {
    let forward = ForwardHeaders::extract(&headers, state.propagation);
    let user = cookie_value(&headers, USER_COOKIE).filter(|user| !user.is_empty());

    let details = state
        .client
        .fetch_or_fallback(&state.details, &forward, DETAILS_FALLBACK)
        .await;
    let reviews = state
        .client
        .fetch_or_fallback(&state.reviews, &forward, REVIEWS_FALLBACK)
        .await;

    Html(render_product_page(user, &details, &reviews))
}

#[derive(Debug, Deserialize)]
struct LoginForm {
    #[serde(default)]
    username: String,
}

async fn login(State(state): State<Arc<ProductPage>>, Form(form): Form<LoginForm>) -> Response {
    let username = form.username.trim();
    let cookie = sign_in_cookie(username);
    match &cookie {
        Some(_) => tracing::info!(user = %username, "User signed in"),
        None => tracing::warn!(user = %username, "Rejected sign-in, name not usable as a cookie"),
    }
    redirect_found(&state.home_url, cookie)
}

async fn logout(State(state): State<Arc<ProductPage>>) -> Response {
    redirect_found(&state.home_url, Some(sign_out_cookie()))
}

/// Index page: topology table plus shortcuts for the two demo users.
pub fn render_index(topology: &ServiceTopology) -> String {
    page(
        "Simple Bookstore App",
        &format!(
            r#"<div class="container">
<p><h3>Hello! This is a simple bookstore application consisting of three services as shown below</h3></p>
{}
<p><h4>Click on one of the links below to auto generate a request to the backend as a real user or a tester</h4></p>
<p><a href="productpage?u=normal">Normal user</a></p>
<p><a href="productpage?u=test">Test user</a></p>
</div>"#,
            topology.to_html_table()
        ),
    )
}

/// Combine the resolved details and reviews payloads into the product page.
///
/// `details` and `reviews` are trusted fragments and inserted verbatim; the
/// user name is escaped.
pub fn render_product_page(user: Option<&str>, details: &str, reviews: &str) -> String {
    let session = match user {
        Some(user) => format!(
            r#"<p class="navbar-text navbar-right"><i class="glyphicon glyphicon-user"></i> {} <a href="logout" class="navbar-link">sign out</a></p>"#,
            escape_html(user)
        ),
        None => r#"<form class="navbar-form navbar-right" method="post" action="login">
<div class="form-group"><input type="text" name="username" class="form-control" placeholder="username"></div>
<button type="submit" class="btn btn-default">Sign in</button>
</form>"#
            .to_string(),
    };

    page(
        "Simple Bookstore App",
        &format!(
            r##"<nav class="navbar navbar-inverse navbar-static-top">
<div class="container">
<div class="navbar-header"><a class="navbar-brand" href="#">BookInfo Sample</a></div>
{}
</div>
</nav>
<div class="container-fluid">
<div class="row">
<div class="col-md-12">
<h3 class="text-center text-primary">The Comedy of Errors</h3>
<p>Summary: Wikipedia Summary: The Comedy of Errors is one of <b>William Shakespeare's</b> early plays. It is his shortest and one of his most farcical comedies, with a major part of the humour coming from slapstick and mistaken identity, in addition to puns and word play.</p>
</div>
</div>
<div class="row">
<div class="col-md-6">
{}
</div>
<div class="col-md-6">
{}
</div>
</div>
</div>"##,
            session, details, reviews
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_contains_both_payloads() {
        let html = render_product_page(None, "<dl>details</dl>", REVIEWS_FALLBACK);
        assert!(html.contains("<dl>details</dl>"));
        assert!(html.contains(REVIEWS_FALLBACK));
        assert!(html.contains("Sign in"));
    }

    #[test]
    fn test_page_shows_escaped_user() {
        let html = render_product_page(Some("<jason>"), "", "");
        assert!(html.contains("&lt;jason&gt;"));
        assert!(html.contains("sign out"));
        assert!(!html.contains("Sign in"));
    }

    #[test]
    fn test_index_renders_topology() {
        let html = render_index(&ServiceTopology::bookinfo());
        assert!(html.contains("<td>ratings</td>"));
        assert!(html.contains("Normal user"));
    }
}
