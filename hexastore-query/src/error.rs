//! Error types for query execution

use thiserror::Error;

/// Query execution errors
#[derive(Error, Debug)]
pub enum QueryError {
    /// Error from hexastore-core (corrupt record or store failure)
    #[error("Core error: {0}")]
    Core(#[from] hexastore_core::Error),

    /// The query carried neither an id nor any filter clause
    #[error("Query requires an id or at least one filter")]
    AtLeastOneFilter,

    /// A link query with level 0 carried an empty path
    #[error("Link query with level 0 requires a non-empty path")]
    PathEmpty,

    /// Operator outside the enumerated comparator set
    #[error("Unknown comparator: {0}")]
    UnknownComparator(String),
}

/// Result type for query operations
pub type Result<T> = std::result::Result<T, QueryError>;
