//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration for the selected service
//! - Initialize metrics export
//! - Bind the listener and run until a shutdown signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners start last (traffic only when ready)

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{validate_config, BookinfoConfig, ConfigError, ObservabilityConfig};
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::net::{EchoServer, Listener, ListenerError};
use crate::observability::metrics;
use crate::services::{Service, ServiceError};

/// Fatal startup or serve errors.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Validate `config`, bind, and serve `service` until a shutdown signal.
pub async fn serve_http(service: Service, config: BookinfoConfig) -> Result<(), StartupError> {
    validate_config(&config, service).map_err(ConfigError::Validation)?;

    tracing::info!(
        service = service.name(),
        bind_address = %config.listener.bind_address,
        proxy_url = config.upstream.proxy_url.as_deref().unwrap_or("-"),
        enable_ratings = config.features.enable_ratings,
        star_color = %config.features.star_color,
        "Configuration loaded"
    );

    init_metrics(&config.observability)?;

    let server = HttpServer::new(service, config.clone())?;
    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Bind and run the TCP echo server until a shutdown signal.
pub async fn serve_tcp_echo(config: BookinfoConfig) -> Result<(), StartupError> {
    init_metrics(&config.observability)?;

    let server = EchoServer::new(Listener::bind(&config.listener).await?);

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(shutdown.clone());

    server.run(shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_metrics(config: &ObservabilityConfig) -> Result<(), StartupError> {
    // The address was validated for HTTP services; the echo server checks here.
    if let Some(addr) = &config.metrics_address {
        let addr: SocketAddr = addr.parse().map_err(|_| {
            ConfigError::Validation(vec![crate::config::ValidationError::MetricsAddress(addr.clone())])
        })?;
        metrics::init_metrics(addr)?;
    }
    Ok(())
}
