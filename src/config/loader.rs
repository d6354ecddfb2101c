//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::BookinfoConfig;
use crate::config::validation::ValidationError;

pub const ENABLE_RATINGS_ENV: &str = "ENABLE_RATINGS";
pub const STAR_COLOR_ENV: &str = "STAR_COLOR";
pub const SERVICE_VERSION_ENV: &str = "SERVICE_VERSION";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file, or defaults when no file is given.
///
/// Validation happens later, once the service and its positionals are known.
pub fn load_config(path: Option<&Path>) -> Result<BookinfoConfig, ConfigError> {
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        }
        None => Ok(BookinfoConfig::default()),
    }
}

/// Overlay feature flags from the environment.
///
/// `lookup` is `std::env::var` in production; tests pass a map.
pub fn apply_env<F>(config: &mut BookinfoConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENABLE_RATINGS_ENV) {
        // Anything but the exact string "true" disables ratings.
        config.features.enable_ratings = value == "true";
    }
    if let Some(color) = lookup(STAR_COLOR_ENV).filter(|c| !c.is_empty()) {
        config.features.star_color = color;
    }
    if let Some(version) = lookup(SERVICE_VERSION_ENV).filter(|v| !v.is_empty()) {
        config.features.service_version = version;
    }
}
