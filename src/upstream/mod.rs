//! Downstream service calls.
//!
//! # Data Flow
//! ```text
//! handler
//!     → http/request.rs (ForwardHeaders from the inbound request)
//!     → client.rs (GET per attempt, RetryPolicy bounds the attempts)
//!     → ServiceCallResult
//!     → caller substitutes body or fallback text into its page
//! ```
//!
//! # Design Decisions
//! - Failures never escape as errors; the caller always gets a value
//! - Only `200 OK` counts as success
//! - Calls from one handler are awaited one after another

pub mod client;

pub use client::{CallFailure, Downstream, DownstreamClient, ServiceCallResult};
