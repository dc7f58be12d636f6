//! Graph facade over the six-way index
//!
//! A [`Graph`] binds a store id and scope to a shared KV store and exposes
//! the lookup primitives without the caller knowing which permutation
//! satisfies a pattern:
//!
//! | Call | Returns triples with | Ordered by | Index |
//! |------|----------------------|------------|-------|
//! | `s(s)` | subject = s | (p, o) | SPO |
//! | `p(p, cont?)` | predicate = p | (o, s) | POS |
//! | `o(o)` | object = o | (s, p) | OSP |
//! | `sp(s, p)` | subject = s and predicate = p | (o) | SPO |
//! | `po(p, o, cont?)` | predicate = p and object = o | (s) | POS |
//! | `exists(s, p, o)` | membership test | - | SPO |
//!
//! Scans are lazy: each step pulls one KV record and decodes it. A
//! continuation triple resumes a scan strictly past its key in the active
//! index.
//!
//! Writes touch all six permutations through a single atomic batch, so a
//! reader never observes a partially indexed triple.

use crate::codec::{decode_triple, encode_triple};
use crate::error::{Error, Result};
use crate::index::{index_prefix, scan_prefix, triple_key, GraphScope, IndexOrder, KEY_DELIM};
use crate::storage::{KvScan, KvStore, MemoryKv, WriteBatch};
use crate::triple::Triple;
use std::sync::Arc;

/// Graph handle over an in-memory store
pub type MemoryGraph = Graph<MemoryKv>;

/// A store- and scope-local view of the triple indices
pub struct Graph<S> {
    store: Arc<S>,
    store_id: String,
    scope: GraphScope,
}

impl<S> Clone for Graph<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            store_id: self.store_id.clone(),
            scope: self.scope,
        }
    }
}

impl<S: KvStore> Graph<S> {
    /// Open the data graph of a store
    pub fn new(store: Arc<S>, store_id: impl Into<String>) -> Self {
        Self::with_scope(store, store_id, GraphScope::Data)
    }

    /// Open a specific graph scope of a store
    pub fn with_scope(store: Arc<S>, store_id: impl Into<String>, scope: GraphScope) -> Self {
        Self {
            store,
            store_id: store_id.into(),
            scope,
        }
    }

    /// Open the inference graph of a store
    pub fn infer(store: Arc<S>, store_id: impl Into<String>) -> Self {
        Self::with_scope(store, store_id, GraphScope::Infer)
    }

    /// Open the metadata graph of a store
    pub fn meta(store: Arc<S>, store_id: impl Into<String>) -> Self {
        Self::with_scope(store, store_id, GraphScope::Meta)
    }

    /// Store id this handle is bound to
    pub fn store_id(&self) -> &str {
        &self.store_id
    }

    /// Graph scope this handle is bound to
    pub fn scope(&self) -> GraphScope {
        self.scope
    }

    // === Lookup primitives ===

    /// All triples of a subject, ordered by (predicate, object)
    pub fn s(&self, subject: &str) -> Result<TripleScan<'_>> {
        self.scan(IndexOrder::Spo, &[subject], None)
    }

    /// All triples of a predicate, ordered by (object, subject)
    pub fn p(&self, predicate: &str, continuation: Option<&Triple>) -> Result<TripleScan<'_>> {
        self.scan(IndexOrder::Pos, &[predicate], continuation)
    }

    /// All triples with an object, ordered by (subject, predicate)
    pub fn o(&self, object: &str) -> Result<TripleScan<'_>> {
        self.scan(IndexOrder::Osp, &[object], None)
    }

    /// All triples of a subject-predicate pair, ordered by object
    pub fn sp(&self, subject: &str, predicate: &str) -> Result<TripleScan<'_>> {
        self.scan(IndexOrder::Spo, &[subject, predicate], None)
    }

    /// All triples of a predicate-object pair, ordered by subject
    pub fn po(
        &self,
        predicate: &str,
        object: &str,
        continuation: Option<&Triple>,
    ) -> Result<TripleScan<'_>> {
        self.scan(IndexOrder::Pos, &[predicate, object], continuation)
    }

    /// Membership test via a point lookup on the SPO index
    pub fn exists(&self, subject: &str, predicate: &str, object: &str) -> Result<bool> {
        let mut key = scan_prefix(IndexOrder::Spo, self.scope, &self.store_id, &[subject, predicate]);
        key.extend_from_slice(object.as_bytes());
        Ok(self.store.get(&key)?.is_some())
    }

    fn scan(
        &self,
        order: IndexOrder,
        parts: &[&str],
        continuation: Option<&Triple>,
    ) -> Result<TripleScan<'_>> {
        let prefix = scan_prefix(order, self.scope, &self.store_id, parts);
        let after = continuation.map(|t| triple_key(order, self.scope, &self.store_id, t));
        tracing::trace!(index = %order, parts = parts.len(), resumed = after.is_some(), "index scan");
        let inner = self.store.scan(&prefix, after.as_deref())?;
        Ok(TripleScan { inner })
    }

    // === Writes ===

    /// Write one triple to all six indices atomically
    pub fn insert(&self, triple: &Triple) -> Result<()> {
        self.insert_all(std::slice::from_ref(triple))
    }

    /// Delete one triple from all six indices atomically
    pub fn remove(&self, triple: &Triple) -> Result<()> {
        self.remove_all(std::slice::from_ref(triple))
    }

    /// Write a batch of triples in one atomic store batch
    ///
    /// Idempotent: re-inserting a triple overwrites its six keys in place.
    pub fn insert_all(&self, triples: &[Triple]) -> Result<()> {
        let mut batch = WriteBatch::new();
        for triple in triples {
            validate_components(triple)?;
            let payload = encode_triple(triple);
            for order in IndexOrder::all() {
                batch.put(
                    triple_key(*order, self.scope, &self.store_id, triple),
                    payload.clone(),
                );
            }
        }
        tracing::debug!(
            store = %self.store_id,
            scope = %self.scope,
            triples = triples.len(),
            "inserting triples"
        );
        self.store.apply(batch)
    }

    /// Delete a batch of triples in one atomic store batch
    ///
    /// Idempotent: removing an absent triple is a no-op.
    pub fn remove_all(&self, triples: &[Triple]) -> Result<()> {
        let mut batch = WriteBatch::new();
        for triple in triples {
            for order in IndexOrder::all() {
                batch.delete(triple_key(*order, self.scope, &self.store_id, triple));
            }
        }
        tracing::debug!(
            store = %self.store_id,
            scope = %self.scope,
            triples = triples.len(),
            "removing triples"
        );
        self.store.apply(batch)
    }

    /// Delete every triple of this (store, scope) pair in one batch
    pub fn clear(&self) -> Result<()> {
        let prefix = index_prefix(IndexOrder::Spo, self.scope, &self.store_id);
        let mut batch = WriteBatch::new();
        let mut dropped = 0usize;
        for record in self.store.scan(&prefix, None)? {
            let (_, value) = record?;
            let triple = decode_triple(&value)?;
            for order in IndexOrder::all() {
                batch.delete(triple_key(*order, self.scope, &self.store_id, &triple));
            }
            dropped += 1;
        }
        tracing::debug!(store = %self.store_id, scope = %self.scope, triples = dropped, "clearing graph");
        self.store.apply(batch)
    }

    /// Number of triples in this (store, scope) pair
    pub fn count(&self) -> Result<usize> {
        let prefix = index_prefix(IndexOrder::Spo, self.scope, &self.store_id);
        let mut n = 0usize;
        for record in self.store.scan(&prefix, None)? {
            record?;
            n += 1;
        }
        Ok(n)
    }
}

/// Components must survive the key layout: non-empty subject and
/// predicate, and no delimiter byte anywhere.
fn validate_components(triple: &Triple) -> Result<()> {
    if triple.subject.is_empty() || triple.predicate.is_empty() {
        return Err(Error::invalid(format!(
            "subject and predicate must be non-empty: {}",
            triple
        )));
    }
    let delim = KEY_DELIM as char;
    if triple.subject.contains(delim)
        || triple.predicate.contains(delim)
        || triple.object.raw.contains(delim)
    {
        return Err(Error::invalid(format!(
            "components must not contain the key delimiter: {}",
            triple
        )));
    }
    Ok(())
}

/// Lazy sequence of decoded triples in index order
pub struct TripleScan<'a> {
    inner: KvScan<'a>,
}

impl Iterator for TripleScan<'_> {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next()? {
            Ok((_, value)) => Some(decode_triple(&value)),
            Err(e) => Some(Err(e)),
        }
    }
}
