//! Bookinfo demo services library.
//!
//! Every service of the bookinfo sample (product page, details, reviews,
//! ratings), the helloworld and TCP echo test services, and the CI trigger
//! helper share this crate; the `bookinfo` binary picks one per process.

pub mod ci;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod render;
pub mod resilience;
pub mod services;
pub mod upstream;

pub use config::schema::BookinfoConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use services::Service;
