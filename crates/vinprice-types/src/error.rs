//! Error types for vinprice

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Failed to save configuration: {0}")]
    SaveError(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Dataset, rule store or model artifact could not be reached
    #[error("Missing data: {0}")]
    MissingData(String),

    /// Lookup came back empty
    #[error("No match: {0}")]
    NoMatch(String),

    /// Error payload returned by the inference artifact, kept verbatim
    #[error("Prediction error: {0}")]
    InferenceFailure(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Deduction rule not found: {0}")]
    RuleNotFound(u64),
}

impl Error {
    /// Whether the error is an expected empty outcome rather than a failure
    pub fn is_no_match(&self) -> bool {
        matches!(self, Error::NoMatch(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
