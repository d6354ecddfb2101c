//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Downstream call:
//!     → retries.rs (bounded attempt count, no backoff)
//!     → timeouts.rs (independent deadline per attempt)
//!     → on exhaustion the caller renders its fallback text
//! ```
//!
//! # Design Decisions
//! - Attempts run back to back: no backoff, no jitter, no circuit breaker
//! - Worst-case latency of a call is `attempts × per-attempt timeout`
//! - Each call site owns its own policy value

pub mod retries;
pub mod timeouts;

pub use retries::RetryPolicy;
