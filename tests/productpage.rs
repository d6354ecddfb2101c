//! Product page fan-out, fallback and header propagation.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bookinfo::config::BookinfoConfig;
use bookinfo::http::request::Propagation;
use bookinfo::services::productpage::{DETAILS_FALLBACK, REVIEWS_FALLBACK};
use bookinfo::Service;

mod common;

fn productpage_config(proxy_url: String) -> BookinfoConfig {
    let mut config = BookinfoConfig::default();
    config.upstream.proxy_url = Some(proxy_url);
    config.upstream.public_url = "http://bookinfo.example.com".to_string();
    config
}

async fn get_page(addr: std::net::SocketAddr, headers: &[(&str, &str)]) -> (u16, String) {
    let mut request = common::client().get(format!("http://{}/productpage", addr));
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    let res = request.send().await.expect("productpage unreachable");
    let status = res.status().as_u16();
    (status, res.text().await.unwrap())
}

#[tokio::test]
async fn test_page_combines_details_and_reviews() {
    let backend = common::start_programmable_backend(|path| async move {
        match path.as_str() {
            "/details/details" => (200, "<dl>the details</dl>".to_string()),
            "/reviews/reviews" => (200, "<blockquote>the reviews</blockquote>".to_string()),
            _ => (404, "not found".to_string()),
        }
    })
    .await;
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, productpage_config(backend.url())).await;

    let (status, body) = get_page(addr, &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains("<dl>the details</dl>"));
    assert!(body.contains("<blockquote>the reviews</blockquote>"));

    // Details before reviews.
    let paths: Vec<String> = backend.requests().into_iter().map(|r| r.path).collect();
    assert_eq!(paths, vec!["/details/details", "/reviews/reviews"]);

    shutdown.trigger();
}

#[tokio::test]
async fn test_dead_dependencies_render_fallbacks_with_200() {
    let backend = common::start_mock_backend(503, "Service Unavailable").await;
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, productpage_config(backend.url())).await;

    let (status, body) = get_page(addr, &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains(DETAILS_FALLBACK));
    assert!(body.contains(REVIEWS_FALLBACK));

    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_proxy_renders_fallbacks() {
    // Bind and drop to get a port nobody listens on.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let config = productpage_config(format!("http://127.0.0.1:{}", port));
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, config).await;

    let (status, body) = get_page(addr, &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains(DETAILS_FALLBACK));
    assert!(body.contains(REVIEWS_FALLBACK));

    shutdown.trigger();
}

#[tokio::test]
async fn test_reviews_retried_once_details_never() {
    let backend = common::start_mock_backend(500, "Internal Server Error").await;
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, productpage_config(backend.url())).await;

    let (status, _) = get_page(addr, &[]).await;
    assert_eq!(status, 200);
    assert_eq!(backend.requests_to("/details/details").len(), 1);
    assert_eq!(backend.requests_to("/reviews/reviews").len(), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_reviews_recovers_on_second_attempt() {
    let reviews_calls = Arc::new(AtomicU32::new(0));
    let counter = reviews_calls.clone();
    let backend = common::start_programmable_backend(move |path| {
        let counter = counter.clone();
        async move {
            match path.as_str() {
                "/reviews/reviews" if counter.fetch_add(1, Ordering::SeqCst) == 0 => {
                    (503, "Service Unavailable".to_string())
                }
                "/reviews/reviews" => (200, "second time lucky".to_string()),
                _ => (200, "details".to_string()),
            }
        }
    })
    .await;
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, productpage_config(backend.url())).await;

    let (_, body) = get_page(addr, &[]).await;
    assert!(body.contains("second time lucky"));
    assert!(!body.contains(REVIEWS_FALLBACK));
    assert_eq!(reviews_calls.load(Ordering::SeqCst), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn test_slow_reviews_time_out_into_fallback() {
    let backend = common::start_programmable_backend(|path| async move {
        if path == "/reviews/reviews" {
            tokio::time::sleep(Duration::from_secs(5)).await;
        }
        (200, "too late".to_string())
    })
    .await;
    let mut config = productpage_config(backend.url());
    config.calls.reviews.timeout_ms = Some(200);
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, config).await;

    let start = Instant::now();
    let (status, body) = get_page(addr, &[]).await;
    assert_eq!(status, 200);
    assert!(body.contains(REVIEWS_FALLBACK));
    assert!(!body.contains(DETAILS_FALLBACK));
    assert!(start.elapsed() < Duration::from_secs(3), "took {:?}", start.elapsed());

    shutdown.trigger();
}

#[tokio::test]
async fn test_only_whitelisted_headers_are_forwarded() {
    let backend = common::start_mock_backend(200, "ok").await;
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, productpage_config(backend.url())).await;

    get_page(
        addr,
        &[
            ("x-request-id", "abc-123"),
            ("cookie", "theme=dark; user=jason"),
            ("authorization", "Bearer secret"),
            ("x-other", "leak"),
        ],
    )
    .await;

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert_eq!(request.header("x-request-id"), Some("abc-123"), "{}", request.path);
        assert_eq!(request.header("cookie"), Some("user=jason"), "{}", request.path);
        assert!(request.header("authorization").is_none());
        assert!(request.header("x-other").is_none());
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_anonymous_request_forwards_no_cookie() {
    let backend = common::start_mock_backend(200, "ok").await;
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, productpage_config(backend.url())).await;

    let (_, body) = get_page(addr, &[("cookie", "theme=dark")]).await;
    assert!(body.contains("Sign in"));

    for request in backend.requests() {
        assert!(request.header("cookie").is_none());
        assert!(request.header("x-request-id").is_none());
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_gremlin_mode_forwards_gremlin_id_only() {
    let backend = common::start_mock_backend(200, "ok").await;
    let mut config = productpage_config(backend.url());
    config.propagation = Propagation::gremlin();
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, config).await;

    get_page(
        addr,
        &[
            ("x-gremlin-id", "g-42"),
            ("x-request-id", "abc-123"),
            ("cookie", "user=jason"),
        ],
    )
    .await;

    let requests = backend.requests();
    assert_eq!(requests.len(), 2);
    for request in requests {
        assert_eq!(request.header("x-gremlin-id"), Some("g-42"));
        assert!(request.header("x-request-id").is_none());
        assert!(request.header("cookie").is_none());
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_login_sets_cookie_that_is_forwarded() {
    let backend = common::start_mock_backend(200, "ok").await;
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, productpage_config(backend.url())).await;
    let client = common::client();

    let res = client
        .post(format!("http://{}/login", addr))
        .form(&[("username", "jason")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 302);
    assert_eq!(
        res.headers()["location"],
        "http://bookinfo.example.com/productpage/productpage"
    );
    let set_cookie = res.headers()["set-cookie"].to_str().unwrap().to_string();
    assert!(set_cookie.starts_with("user=jason"));

    let cookie = set_cookie.split(';').next().unwrap();
    let (_, body) = get_page(addr, &[("cookie", cookie)]).await;
    assert!(body.contains("jason"));
    assert!(body.contains("sign out"));

    for request in backend.requests() {
        assert_eq!(request.header("cookie"), Some("user=jason"));
    }

    shutdown.trigger();
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let backend = common::start_mock_backend(200, "ok").await;
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, productpage_config(backend.url())).await;

    let res = common::client()
        .get(format!("http://{}/logout", addr))
        .header("cookie", "user=jason")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 302);
    let set_cookie = res.headers()["set-cookie"].to_str().unwrap();
    assert!(set_cookie.starts_with("user=;"));
    assert!(set_cookie.contains("Max-Age=0"));
    assert!(backend.requests().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn test_index_lists_topology() {
    let backend = common::start_mock_backend(200, "ok").await;
    let (addr, shutdown) = common::spawn_service(Service::ProductPage, productpage_config(backend.url())).await;

    for path in ["/", "/index.html"] {
        let res = common::client()
            .get(format!("http://{}{}", addr, path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        let body = res.text().await.unwrap();
        assert!(body.contains("<td>details</td>"));
        assert!(body.contains("<td>reviews</td>"));
    }
    assert!(backend.requests().is_empty());

    shutdown.trigger();
}
