//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize, defaults for everything missing)
//!     → loader.rs (environment feature flags)
//!     → CLI positionals (port, proxy url, public url)
//!     → validation.rs (semantic checks for the selected service)
//!     → BookinfoConfig (validated, immutable)
//!     → shared via Arc with the service handlers
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never changes afterwards
//! - All fields have defaults so the services run with positionals alone
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{apply_env, load_config, ConfigError};
pub use schema::{BookinfoConfig, CallPolicies, FeatureConfig, ListenerConfig, ObservabilityConfig};
pub use validation::{validate_config, ValidationError};
