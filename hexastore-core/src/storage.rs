//! Ordered key-value storage seam
//!
//! The index layer needs three capabilities from its store: point lookups,
//! ascending byte-ordered iteration over a key prefix, and atomic
//! application of a write batch. Anything providing those (an embedded LSM
//! or B-tree store in production, [`MemoryKv`] in tests and examples) can
//! back a graph.
//!
//! Scans are pull-based: the returned iterator yields one record per step
//! and surfaces store failures in-stream, so callers stay lazy and decode
//! errors taint exactly the read that hit them.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

/// One key-value record
pub type KvPair = (Vec<u8>, Vec<u8>);

/// Lazy scan over ordered records
pub type KvScan<'a> = Box<dyn Iterator<Item = Result<KvPair>> + Send + 'a>;

/// A single mutation inside a write batch
#[derive(Clone, Debug)]
pub enum BatchOp {
    /// Insert or overwrite a record
    Put {
        /// Record key
        key: Vec<u8>,
        /// Record value
        value: Vec<u8>,
    },
    /// Delete a record (no-op when absent)
    Delete {
        /// Record key
        key: Vec<u8>,
    },
}

/// An ordered set of mutations applied atomically
///
/// Readers never observe a batch half-applied; the six permutation keys of
/// a triple go through storage as one batch.
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a put
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(BatchOp::Put { key, value });
    }

    /// Queue a delete
    pub fn delete(&mut self, key: Vec<u8>) {
        self.ops.push(BatchOp::Delete { key });
    }

    /// Number of queued mutations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Consume the batch, yielding its mutations in order
    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

/// Ordered byte-key store with prefix scans and atomic batches
pub trait KvStore: Send + Sync {
    /// Point lookup
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Ascending scan over keys starting with `prefix`
    ///
    /// When `after` is given, only keys strictly greater than it are
    /// yielded; this is the continuation seek.
    fn scan(&self, prefix: &[u8], after: Option<&[u8]>) -> Result<KvScan<'_>>;

    /// Apply a batch atomically
    fn apply(&self, batch: WriteBatch) -> Result<()>;
}

/// In-memory store over a `BTreeMap`
///
/// The scan is a cursor that re-acquires the lock at every step, so long
/// scans never pin the map and observe writes that land mid-scan. That is
/// the consistency the executor is specified against: stable at
/// single-lookup granularity, eventually consistent across lookups.
#[derive(Debug, Default)]
pub struct MemoryKv {
    inner: RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryKv {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored
    pub fn len(&self) -> usize {
        self.inner.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemoryKv {
    fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let map = self
            .inner
            .read()
            .map_err(|_| Error::unavailable("memory kv lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn scan(&self, prefix: &[u8], after: Option<&[u8]>) -> Result<KvScan<'_>> {
        // A cursor below the prefix region would stop the scan at the first
        // foreign key; start from the prefix instead.
        let cursor = after.filter(|a| *a >= prefix).map(<[u8]>::to_vec);
        Ok(Box::new(MemoryScan {
            map: &self.inner,
            prefix: prefix.to_vec(),
            cursor,
            done: false,
        }))
    }

    fn apply(&self, batch: WriteBatch) -> Result<()> {
        let mut map = self
            .inner
            .write()
            .map_err(|_| Error::unavailable("memory kv lock poisoned"))?;
        for op in batch.into_ops() {
            match op {
                BatchOp::Put { key, value } => {
                    map.insert(key, value);
                }
                BatchOp::Delete { key } => {
                    map.remove(&key);
                }
            }
        }
        Ok(())
    }
}

/// Cursor-based scan over a `MemoryKv`
struct MemoryScan<'a> {
    map: &'a RwLock<BTreeMap<Vec<u8>, Vec<u8>>>,
    prefix: Vec<u8>,
    cursor: Option<Vec<u8>>,
    done: bool,
}

impl Iterator for MemoryScan<'_> {
    type Item = Result<KvPair>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let map = match self.map.read() {
            Ok(map) => map,
            Err(_) => {
                self.done = true;
                return Some(Err(Error::unavailable("memory kv lock poisoned")));
            }
        };
        let start: Bound<&[u8]> = match &self.cursor {
            Some(last) => Bound::Excluded(last.as_slice()),
            None => Bound::Included(self.prefix.as_slice()),
        };
        // Keys sharing the prefix are contiguous, so the first key past the
        // cursor either matches or ends the scan.
        if let Some((key, value)) = map.range::<[u8], _>((start, Bound::Unbounded)).next() {
            if key.starts_with(&self.prefix) {
                self.cursor = Some(key.clone());
                return Some(Ok((key.clone(), value.clone())));
            }
        }
        self.done = true;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryKv {
        let kv = MemoryKv::new();
        let mut batch = WriteBatch::new();
        for key in [&b"a/1"[..], b"a/2", b"a/3", b"b/1"] {
            batch.put(key.to_vec(), key.to_vec());
        }
        kv.apply(batch).unwrap();
        kv
    }

    #[test]
    fn test_get() {
        let kv = seeded();
        assert_eq!(kv.get(b"a/2").unwrap(), Some(b"a/2".to_vec()));
        assert_eq!(kv.get(b"a/9").unwrap(), None);
    }

    #[test]
    fn test_scan_prefix() {
        let kv = seeded();
        let keys: Vec<Vec<u8>> = kv
            .scan(b"a/", None)
            .unwrap()
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(keys, vec![b"a/1".to_vec(), b"a/2".to_vec(), b"a/3".to_vec()]);
    }

    #[test]
    fn test_scan_after() {
        let kv = seeded();
        let keys: Vec<Vec<u8>> = kv
            .scan(b"a/", Some(b"a/1"))
            .unwrap()
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(keys, vec![b"a/2".to_vec(), b"a/3".to_vec()]);
    }

    #[test]
    fn test_scan_after_below_prefix() {
        let kv = seeded();
        let keys: Vec<Vec<u8>> = kv
            .scan(b"b/", Some(b"a/0"))
            .unwrap()
            .map(|r| r.unwrap().0)
            .collect();
        assert_eq!(keys, vec![b"b/1".to_vec()]);
    }

    #[test]
    fn test_batch_delete() {
        let kv = seeded();
        let mut batch = WriteBatch::new();
        batch.delete(b"a/2".to_vec());
        batch.delete(b"missing".to_vec());
        kv.apply(batch).unwrap();
        assert_eq!(kv.get(b"a/2").unwrap(), None);
        assert_eq!(kv.len(), 3);
    }

    #[test]
    fn test_scan_sees_writes_behind_cursor_position() {
        let kv = seeded();
        let mut scan = kv.scan(b"a/", None).unwrap();
        assert_eq!(scan.next().unwrap().unwrap().0, b"a/1".to_vec());

        let mut batch = WriteBatch::new();
        batch.put(b"a/25".to_vec(), b"late".to_vec());
        kv.apply(batch).unwrap();

        let rest: Vec<Vec<u8>> = scan.map(|r| r.unwrap().0).collect();
        assert_eq!(rest, vec![b"a/2".to_vec(), b"a/25".to_vec(), b"a/3".to_vec()]);
    }
}
