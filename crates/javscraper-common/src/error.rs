//! Common error types used throughout javscraper.
//!
//! Covers the failures the metadata core reports to callers: reference
//! tokens that do not decode, and cache slots that cannot be read back.

/// Common error type for javscraper.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A reference token could not be decoded.
    #[error("Invalid reference token: {0}")]
    InvalidToken(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a new InvalidToken error.
    pub fn invalid_token<S: Into<String>>(msg: S) -> Self {
        Self::InvalidToken(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
