//! Book details service: a fixed HTML fragment.

use axum::{response::Html, routing::get, Router};

use crate::render::service_page;

pub const DETAILS_FRAGMENT: &str = r#"
<h4 class="text-center text-primary">Product Details</h4>
<dl>
<dt>Paperback:</dt>200 pages
<dt>Publisher:</dt>O'Reilly Media; 1 edition (March 25, 2015)
<dt>Language:</dt>English
<dt>ISBN-10:</dt>1491914254
<dt>ISBN-13:</dt>978-1491914250
</dl>
"#;

pub fn router() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/details", get(details))
}

async fn index() -> Html<String> {
    Html(service_page("details", DETAILS_FRAGMENT, ""))
}

async fn details() -> Html<&'static str> {
    Html(DETAILS_FRAGMENT)
}
