//! Error types for disha-nav.
//!
//! Runtime navigation conditions (no route, partial route, off mesh) are
//! handled locally by the owning component and never surface as errors;
//! only configuration loading can fail.

use thiserror::Error;

/// disha-nav error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
