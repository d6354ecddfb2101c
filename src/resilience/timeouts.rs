//! Per-call-site timeout defaults.
//!
//! # Responsibilities
//! - Hold the default per-attempt deadline of every downstream call
//! - Derive the ratings deadline from the configured star colour
//!
//! The ratings lookup is deliberately slow to fail for the default black
//! stars and fast for any other colour, which is what the fault-injection
//! demos rely on.

use std::time::Duration;

/// Star colour that selects the long ratings timeout.
pub const DEFAULT_STAR_COLOR: &str = "black";

/// productpage → details.
pub const DETAILS_TIMEOUT: Duration = Duration::from_secs(1);

/// productpage → reviews.
pub const REVIEWS_TIMEOUT: Duration = Duration::from_secs(3);

/// reviews → ratings with black stars.
pub const RATINGS_TIMEOUT_BLACK: Duration = Duration::from_secs(10);

/// reviews → ratings with any other star colour.
pub const RATINGS_TIMEOUT_COLORED: Duration = Duration::from_millis(2500);

/// Default ratings deadline for the given star colour.
pub fn ratings_timeout(star_color: &str) -> Duration {
    if star_color == DEFAULT_STAR_COLOR {
        RATINGS_TIMEOUT_BLACK
    } else {
        RATINGS_TIMEOUT_COLORED
    }
}
