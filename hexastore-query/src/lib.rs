//! # Hexastore Query
//!
//! Object-query engine for Hexastore.
//!
//! This crate provides:
//! - The query model: predicate filters, link constraints, pagination
//! - The executor: seed-scan selection, per-record narrowing, page cut
//! - Frontier-based link traversal (explicit paths and id-edge closures)
//!
//! ## Quick Start
//!
//! ```
//! use hexastore_core::{Graph, MemoryKv, Triple};
//! use hexastore_query::{execute, ObjectQueryModel, QueryUnit};
//! use std::sync::Arc;
//!
//! let graph = Graph::new(Arc::new(MemoryKv::new()), "people");
//! graph.insert(&Triple::data("a1", "name", "Alice"))?;
//!
//! let query = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice"));
//! let page = execute(&graph, &query)?;
//! assert_eq!(page.values[0].subject, "a1");
//! # Ok::<(), hexastore_query::QueryError>(())
//! ```

pub mod error;
pub mod executor;
pub mod model;
pub mod options;
mod traverse;

// Re-exports
pub use error::{QueryError, Result};
pub use executor::{execute, execute_with_options};
pub use model::{
    Comparator, FilterClause, LinkQuery, ObjectQueryModel, ObjectQueryResponse, QueryUnit,
};
pub use options::{QueryOptions, DEFAULT_PAGE_SIZE};
