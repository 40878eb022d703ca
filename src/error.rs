//! Error types for trueno-metrics
//!
//! Toyota Way: Clear error messages with actionable guidance (Respect for People)

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// trueno-metrics error types
#[derive(Error, Debug)]
pub enum Error {
    /// Query against a series that has never been recorded
    #[error("Metric not found: {0}\nCheck `has_metric` before querying optional series")]
    NotFound(String),

    /// Argument outside its accepted domain (e.g. percentile not in [0, 100])
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration failed to parse or validate
    #[error("Config error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
