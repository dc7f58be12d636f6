//! Error types for hexastore-core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// A stored record failed to decode. Signals storage corruption and is
    /// fatal for the read that hit it.
    #[error("Corrupt triple: {0}")]
    CorruptTriple(String),

    /// A triple was rejected before it reached storage (empty subject or
    /// predicate, or a component containing the reserved key delimiter).
    #[error("Invalid triple: {0}")]
    InvalidTriple(String),

    /// The underlying key-value store returned an I/O failure.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl Error {
    /// Create a corrupt-triple error
    pub fn corrupt(msg: impl Into<String>) -> Self {
        Error::CorruptTriple(msg.into())
    }

    /// Create an invalid-triple error
    pub fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidTriple(msg.into())
    }

    /// Create a store-unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Error::StoreUnavailable(msg.into())
    }
}
