//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the selected service's routes from the frozen config
//! - Add the liveness endpoint
//! - Wire up middleware (tracing, request metrics, inbound timeout,
//!   request id echo)
//! - Serve on a listener until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{request_id::PropagateRequestIdLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::BookinfoConfig;
use crate::health;
use crate::http::middleware::request_metrics_middleware;
use crate::http::request::X_REQUEST_ID;
use crate::services::{Service, ServiceError};
use crate::upstream::DownstreamClient;

/// HTTP server for one bookinfo service.
pub struct HttpServer {
    router: Router,
    service: Service,
    config: Arc<BookinfoConfig>,
}

impl HttpServer {
    /// Create a server for `service`. The config is expected to be validated.
    pub fn new(service: Service, config: BookinfoConfig) -> Result<Self, ServiceError> {
        let client = DownstreamClient::new()?;
        let routes = service.router(&config, client)?;
        let router = Self::build_router(&config, service, routes);

        Ok(Self {
            router,
            service,
            config: Arc::new(config),
        })
    }

    /// Layer the shared middleware stack over the service routes.
    #[allow(deprecated)]
    fn build_router(config: &BookinfoConfig, service: Service, routes: Router) -> Router {
        routes
            .merge(health::router(service))
            .layer(middleware::from_fn_with_state(service, request_metrics_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http().make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .headers()
                        .get(X_REQUEST_ID)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("");
                    tracing::info_span!(
                        "request",
                        service = service.name(),
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id,
                    )
                }),
            )
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let service = self.service.name();
        tracing::info!(
            service,
            address = %addr,
            request_timeout_secs = self.config.timeouts.request_secs,
            "HTTP server starting"
        );

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!(service, "HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving the server without a socket.
    #[cfg(test)]
    pub fn into_router(self) -> Router {
        self.router
    }
}
