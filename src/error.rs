//! Error types for eagle-database

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Catalogue error type
///
/// Every failure is terminal for the call that produced it. The catalogue is
/// static, so retrying the same lookup can never succeed.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested array or attribute group does not exist in the store
    #[error("Missing group: {0}")]
    MissingGroup(String),

    /// A GalaxyID or NodeIndex lookup had no match
    #[error("Identifier not found: {0}")]
    IdentifierNotFound(String),

    /// A positional request exceeds what the catalogue holds
    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),

    /// The merger tree violates one of its structural invariants
    #[error("Data integrity fault: {0}")]
    DataIntegrity(String),

    /// Column exists but holds the wrong element type
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// Generator or layout settings cannot describe a valid catalogue
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a missing group error
    pub fn missing_group(name: impl Into<String>) -> Self {
        Error::MissingGroup(name.into())
    }

    /// Create an identifier not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::IdentifierNotFound(msg.into())
    }

    /// Create an index out of range error
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        Error::IndexOutOfRange(msg.into())
    }

    /// Create a data integrity error
    pub fn integrity(msg: impl Into<String>) -> Self {
        Error::DataIntegrity(msg.into())
    }

    /// Create a type mismatch error
    pub fn type_mismatch(msg: impl Into<String>) -> Self {
        Error::TypeMismatch(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Error::InvalidConfig(msg.into())
    }
}
