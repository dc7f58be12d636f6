//! # Hexastore Core
//!
//! Storage-facing core of the Hexastore graph engine.
//!
//! This crate provides:
//! - Core types: [`Triple`], [`TypedValue`], [`Datatype`]
//! - The self-describing binary triple codec
//! - Key layouts for all six index permutations (SPO, SOP, PSO, POS, OSP, OPS)
//! - The ordered KV storage seam and an in-memory implementation
//! - The [`Graph`] facade exposing lookup primitives and atomic writes
//!
//! ## Design Principles
//!
//! 1. **Every lookup is a range scan**: six key permutations make any
//!    bound-component pattern a sequential prefix scan.
//! 2. **Lazy, pull-based reads**: primitives return iterators that decode
//!    one record per step; nothing is materialized ahead of the caller.
//! 3. **Atomic writes**: a triple's six keys go through storage as a
//!    single batch; readers never see a partial index update.
//!
//! ## Example
//!
//! ```
//! use hexastore_core::{Graph, MemoryKv, Triple};
//! use std::sync::Arc;
//!
//! let graph = Graph::new(Arc::new(MemoryKv::new()), "people");
//! graph.insert(&Triple::data("a1", "name", "Alice"))?;
//!
//! let hits: Vec<_> = graph.po("name", "Alice", None)?
//!     .collect::<hexastore_core::Result<Vec<_>>>()?;
//! assert_eq!(hits.len(), 1);
//! # Ok::<(), hexastore_core::Error>(())
//! ```

pub mod codec;
pub mod error;
pub mod graph;
pub mod index;
pub mod storage;
pub mod triple;
pub mod value;

// Re-export main types
pub use codec::{decode_triple, encode_triple};
pub use error::{Error, Result};
pub use graph::{Graph, MemoryGraph, TripleScan};
pub use index::{GraphScope, IndexOrder, KEY_DELIM};
pub use storage::{BatchOp, KvPair, KvScan, KvStore, MemoryKv, WriteBatch};
pub use triple::Triple;
pub use value::{Datatype, TypedValue};
