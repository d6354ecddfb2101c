//! Bookinfo demo services.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────┐
//!     Browser ──────────▶│ productpage  │
//!                        └──────┬───────┘
//!                               │  via <proxy_url>
//!                  ┌────────────┴────────────┐
//!                  ▼                         ▼
//!            ┌──────────┐             ┌──────────┐      ┌──────────┐
//!            │ details  │             │ reviews  │─────▶│ ratings  │
//!            └──────────┘             └──────────┘      └──────────┘
//! ```
//!
//! One process runs one service. Downstream calls go through a single proxy
//! base URL and carry only the `user` cookie and the correlation header.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use bookinfo::config::schema::{LogFormat, RatingsVariant, ReviewsFormat};
use bookinfo::config::{apply_env, load_config, BookinfoConfig};
use bookinfo::http::request::Propagation;
use bookinfo::lifecycle::{serve_http, serve_tcp_echo};
use bookinfo::net::echo::DEFAULT_ECHO_PORT;
use bookinfo::observability::logging::init_tracing;
use bookinfo::Service;

#[derive(Parser)]
#[command(name = "bookinfo")]
#[command(about = "Bookinfo sample services", long_about = None)]
struct Cli {
    /// Optional TOML file with timeouts, retry, logging and metrics settings.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true, value_enum)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Front page combining details and reviews
    Productpage {
        port: u16,
        proxy_url: String,
        public_url: String,
        /// Propagate X-Gremlin-ID instead of X-Request-ID, without the user cookie
        #[arg(long)]
        gremlin_header: bool,
    },
    /// Static book details
    Details { port: u16 },
    /// Book reviews, optionally with star ratings
    Reviews {
        port: u16,
        proxy_url: Option<String>,
        /// Serve reviews as JSON
        #[arg(long)]
        json: bool,
    },
    /// Per-reviewer star ratings
    Ratings {
        port: u16,
        /// Answer with the plain-text v1 greeting
        #[arg(long)]
        v1: bool,
    },
    /// Version-labelled greeting
    Helloworld { port: u16 },
    /// Raw TCP echo server
    TcpEcho {
        #[arg(long, default_value_t = DEFAULT_ECHO_PORT)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    apply_env(&mut config, |key| std::env::var(key).ok());
    if let Some(format) = cli.log_format {
        config.observability.log_format = format;
    }

    init_tracing(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "bookinfo starting");

    match apply_command(cli.command, &mut config) {
        Some(service) => serve_http(service, config).await?,
        None => serve_tcp_echo(config).await?,
    }

    Ok(())
}

/// Overlay the subcommand's positionals and flags. Returns the HTTP service
/// to run, or `None` for the TCP echo server.
fn apply_command(command: Commands, config: &mut BookinfoConfig) -> Option<Service> {
    match command {
        Commands::Productpage {
            port,
            proxy_url,
            public_url,
            gremlin_header,
        } => {
            config.listener.set_port(port);
            config.upstream.proxy_url = Some(proxy_url);
            config.upstream.public_url = public_url;
            if gremlin_header {
                config.propagation = Propagation::gremlin();
            }
            Some(Service::ProductPage)
        }
        Commands::Details { port } => {
            config.listener.set_port(port);
            Some(Service::Details)
        }
        Commands::Reviews { port, proxy_url, json } => {
            config.listener.set_port(port);
            if proxy_url.is_some() {
                config.upstream.proxy_url = proxy_url;
            }
            if json {
                config.features.reviews_format = ReviewsFormat::Json;
            }
            Some(Service::Reviews)
        }
        Commands::Ratings { port, v1 } => {
            config.listener.set_port(port);
            if v1 {
                config.features.ratings_variant = RatingsVariant::V1;
            }
            Some(Service::Ratings)
        }
        Commands::Helloworld { port } => {
            config.listener.set_port(port);
            Some(Service::HelloWorld)
        }
        Commands::TcpEcho { port } => {
            config.listener.set_port(port);
            None
        }
    }
}
