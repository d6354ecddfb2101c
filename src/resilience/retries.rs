//! Bounded retry policy.
//!
//! # Responsibilities
//! - Describe how many times a downstream call may be attempted
//! - Carry the per-attempt deadline
//! - Answer "may I try again?" without touching the network
//!
//! # State machine (per call)
//! ```text
//! Idle → Requesting → Succeeded
//!                   → Failed → Requesting      (attempts remain)
//!                            → FallbackRendered (attempts exhausted)
//! ```
//!
//! # Design Decisions
//! - Fixed attempt count, attempts issued back to back
//! - A policy is a plain `Copy` value; nothing is shared between calls

use std::time::Duration;

/// Attempt budget for a single downstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    per_attempt_timeout: Duration,
}

impl RetryPolicy {
    /// Create a policy. A zero attempt count is raised to one.
    pub fn new(max_attempts: u32, per_attempt_timeout: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            per_attempt_timeout,
        }
    }

    /// One attempt, no retry.
    pub fn single(per_attempt_timeout: Duration) -> Self {
        Self::new(1, per_attempt_timeout)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn per_attempt_timeout(&self) -> Duration {
        self.per_attempt_timeout
    }

    /// Whether another attempt is allowed after `attempt` (1-based) failed.
    pub fn should_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Upper bound on the time spent inside one call.
    pub fn worst_case_latency(&self) -> Duration {
        self.per_attempt_timeout.saturating_mul(self.max_attempts)
    }
}
