//! Unified error handling for the pact stores.
//!
//! Every failure is fatal to the enclosing operation: the host execution
//! environment reverts whatever the operation wrote, so no variant carries a
//! recovery path and nothing in this crate retries.

use thiserror::Error;

/// Result type alias for pact operations
pub type PactResult<T> = Result<T, PactError>;

/// Errors that can occur while mutating or reading the pact record families
#[derive(Error, Debug)]
pub enum PactError {
    /// Authorization predicate failed, including identity-mismatch checks
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Referenced record does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Enum domain violation or unparsable numeric text
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Signature does not verify against the expected public key
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    /// Underlying keyed storage failed
    #[error("Storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Record (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Deployment configuration could not be loaded or validated
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

impl PactError {
    /// True when the error is an authorization failure
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, PactError::Unauthorized(_))
    }

    /// True when the error reports an absent record
    pub fn is_not_found(&self) -> bool {
        matches!(self, PactError::NotFound(_))
    }
}
