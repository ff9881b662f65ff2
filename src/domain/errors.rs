//! Domain error types
//!
//! Two distinct families live here. [`CastorError`] is the fatal taxonomy:
//! anything that should abort the run (storage connectivity, remote
//! translation failure, malformed catalog, configuration). [`RowFailure`]
//! is the recoverable, row-level taxonomy: failures that skip a candidate
//! row or a single fan-out rule and are routed to the exception recorder
//! while the surrounding loop continues.
//!
//! `RowFailure` values travel in `Result` return values, never by
//! unwinding; callers inspect the kind and carry on.

use thiserror::Error;

/// Fatal error taxonomy, one variant per failure category.
///
/// Third-party error types never cross this boundary; adapters stringify
/// their errors into the matching variant.
#[derive(Debug, Error)]
pub enum CastorError {
    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Warehouse or registry storage failed
    #[error("Database error: {0}")]
    Database(String),

    /// Remote translation service errors
    #[error("Translation error: {0}")]
    Translation(String),

    /// Malformed or unusable data catalog
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// JSON or TOML (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File-system access failed (exception log, config file)
    #[error("I/O error: {0}")]
    Io(String),

    /// Anything that fits no other category
    #[error("{0}")]
    Other(String),
}

/// Recoverable row-level failure
///
/// Each variant names the offending column so the exception recorder can
/// produce an actionable log line and audit row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowFailure {
    /// A source field required for unconditional mapping to a target table
    /// is null or absent. Skips the (source row, target table) pair.
    #[error("Mandatory field '{0}' is missing")]
    MandatoryFieldMissing(String),

    /// A source field needed by one fan-out rule is null or absent. Skips
    /// that rule only; sibling rules still execute.
    #[error("Original data field '{0}' is missing")]
    OriginalDataFieldMissing(String),

    /// An assembled target row failed NOT-NULL validation. The candidate
    /// row is dropped before queuing.
    #[error("NOT NULL field '{0}' is missing")]
    NotNullColumnMissing(String),
}

impl RowFailure {
    /// The column name the failure refers to.
    pub fn column(&self) -> &str {
        match self {
            RowFailure::MandatoryFieldMissing(col)
            | RowFailure::OriginalDataFieldMissing(col)
            | RowFailure::NotNullColumnMissing(col) => col,
        }
    }
}

impl From<std::io::Error> for CastorError {
    fn from(err: std::io::Error) -> Self {
        CastorError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CastorError {
    fn from(err: serde_json::Error) -> Self {
        CastorError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for CastorError {
    fn from(err: toml::de::Error) -> Self {
        CastorError::Configuration(format!("TOML parse error: {err}"))
    }
}
