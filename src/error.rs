//! Error types for the Vallu library.
//!
//! Every fallible operation returns [`Result`], whose error side is the
//! [`ValluError`] enum. The variants follow the failure classes of the search
//! pipeline: a single embedding blob that cannot be decoded, a corpus source
//! that cannot be read, a failed call to the embedding service, and bad
//! caller input.
//!
//! # Examples
//!
//! ```
//! use vallu::error::{ValluError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ValluError::invalid_input("top_n must be positive"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classes of embedding service failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbedFailure {
    /// The request never produced an HTTP response.
    Network,
    /// The service rejected the credential (401/403).
    Authentication,
    /// The service answered with a non-success status.
    Api,
    /// The response body did not carry `data[0].embedding`.
    MalformedResponse,
}

impl fmt::Display for EmbedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EmbedFailure::Network => "network",
            EmbedFailure::Authentication => "authentication",
            EmbedFailure::Api => "api",
            EmbedFailure::MalformedResponse => "malformed response",
        };
        f.write_str(name)
    }
}

/// The main error type for Vallu operations.
#[derive(Error, Debug)]
pub enum ValluError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A single embedding blob could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// The corpus row source could not be read.
    #[error("Load error: {0}")]
    Load(String),

    /// The embedding service call failed.
    #[error("Embed error ({kind}): {message}")]
    Embed { kind: EmbedFailure, message: String },

    /// No credential is configured for the embedding service.
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Invalid caller input (top_n, vector dimension, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with ValluError.
pub type Result<T> = std::result::Result<T, ValluError>;

impl ValluError {
    /// Create a new decode error.
    pub fn decode<S: Into<String>>(msg: S) -> Self {
        ValluError::Decode(msg.into())
    }

    /// Create a new load error.
    pub fn load<S: Into<String>>(msg: S) -> Self {
        ValluError::Load(msg.into())
    }

    /// Create a new embed error of the given kind.
    pub fn embed<S: Into<String>>(kind: EmbedFailure, msg: S) -> Self {
        ValluError::Embed {
            kind,
            message: msg.into(),
        }
    }

    /// Create a new missing credential error.
    pub fn missing_credential<S: Into<String>>(msg: S) -> Self {
        ValluError::MissingCredential(msg.into())
    }

    /// Create a new invalid input error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        ValluError::InvalidInput(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        ValluError::InvalidConfig(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ValluError::Other(msg.into())
    }

    /// The embed failure class, if this is an embed error.
    pub fn embed_failure(&self) -> Option<EmbedFailure> {
        match self {
            ValluError::Embed { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = ValluError::decode("odd blob");
        assert_eq!(error.to_string(), "Decode error: odd blob");

        let error = ValluError::invalid_input("top_n must be positive");
        assert_eq!(error.to_string(), "Invalid input: top_n must be positive");

        let error = ValluError::embed(EmbedFailure::Authentication, "401");
        assert_eq!(error.to_string(), "Embed error (authentication): 401");
        assert_eq!(error.embed_failure(), Some(EmbedFailure::Authentication));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = ValluError::from(io_error);

        match error {
            ValluError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
        assert!(ValluError::other("x").embed_failure().is_none());
    }
}
