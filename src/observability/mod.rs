//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers and the downstream client produce:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (request and downstream call counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON lines)
//!     → Prometheus scrape endpoint, when configured
//! ```
//!
//! # Design Decisions
//! - The inbound `X-Request-ID` appears in trace spans, it is never invented
//! - Metrics are recorded through the `metrics` facade; without an installed
//!   exporter they are no-ops

pub mod logging;
pub mod metrics;
