//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → services/* handler
//!         → request.rs (ForwardHeaders from cookies and correlation header)
//!         → upstream client (downstream calls, fallback text)
//!     → response.rs (cookies, redirects)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{CorrelationHeader, ForwardHeaders, Propagation, X_GREMLIN_ID, X_REQUEST_ID};
pub use server::HttpServer;
