//! Error types for chhaya

use thiserror::Error;

/// Shadow filter error type
#[derive(Error, Debug)]
pub enum ShadowFilterError {
    /// A required parameter was not given; the filter cannot be built
    #[error("ShadowsFilter was not given {0}")]
    MissingParameter(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<toml::de::Error> for ShadowFilterError {
    fn from(e: toml::de::Error) -> Self {
        ShadowFilterError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ShadowFilterError>;
