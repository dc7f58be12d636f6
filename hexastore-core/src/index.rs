//! Index permutations and key layout
//!
//! Hexastore maintains all six orderings of triple components so that every
//! lookup pattern becomes a sequential key-range scan:
//!
//! | Index | Order | Use Case |
//! |-------|-------|----------|
//! | SPO | s, p, o | Subject and subject-predicate lookups |
//! | SOP | s, o, p | Subject-object lookups |
//! | PSO | p, s, o | Predicate-subject lookups |
//! | POS | p, o, s | Predicate and predicate-value lookups |
//! | OSP | o, s, p | Object lookups |
//! | OPS | o, p, s | Object-predicate lookups |
//!
//! ## Key layout
//!
//! ```text
//! order:    u8      index permutation code
//! scope:    u8      graph scope code (data/infer/meta)
//! store_id: [u8]    store name UTF-8
//! delim:    0x00
//! part1:    [u8]    first component UTF-8
//! delim:    0x00
//! part2:    [u8]
//! delim:    0x00
//! part3:    [u8]    no trailing delimiter
//! ```
//!
//! The 0x00 delimiter sorts below every byte that can appear in a
//! canonicalized UTF-8 component, so a prefix bounding the first N parts
//! scans exactly the matching triples in ascending order of the remaining
//! parts. Components must not contain the delimiter; writes enforce this.

use crate::triple::Triple;
use std::fmt;

/// Reserved byte separating key components
pub const KEY_DELIM: u8 = 0x00;

/// Index permutation enumeration
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IndexOrder {
    /// Subject-Predicate-Object
    Spo,
    /// Subject-Object-Predicate
    Sop,
    /// Predicate-Subject-Object
    Pso,
    /// Predicate-Object-Subject
    Pos,
    /// Object-Subject-Predicate
    Osp,
    /// Object-Predicate-Subject
    Ops,
}

impl IndexOrder {
    /// All six permutations, in key-prefix code order
    pub fn all() -> &'static [IndexOrder] {
        &[
            IndexOrder::Spo,
            IndexOrder::Sop,
            IndexOrder::Pso,
            IndexOrder::Pos,
            IndexOrder::Osp,
            IndexOrder::Ops,
        ]
    }

    /// Stable one-byte key prefix code
    pub const fn code(self) -> u8 {
        match self {
            IndexOrder::Spo => 0,
            IndexOrder::Sop => 1,
            IndexOrder::Pso => 2,
            IndexOrder::Pos => 3,
            IndexOrder::Osp => 4,
            IndexOrder::Ops => 5,
        }
    }

    /// Short name of this index
    pub fn name(self) -> &'static str {
        match self {
            IndexOrder::Spo => "spo",
            IndexOrder::Sop => "sop",
            IndexOrder::Pso => "pso",
            IndexOrder::Pos => "pos",
            IndexOrder::Osp => "osp",
            IndexOrder::Ops => "ops",
        }
    }

    /// The triple's components in this index's key order
    pub fn parts<'a>(self, triple: &'a Triple) -> [&'a str; 3] {
        let (s, p, o) = (
            triple.subject.as_str(),
            triple.predicate.as_str(),
            triple.object.raw.as_str(),
        );
        match self {
            IndexOrder::Spo => [s, p, o],
            IndexOrder::Sop => [s, o, p],
            IndexOrder::Pso => [p, s, o],
            IndexOrder::Pos => [p, o, s],
            IndexOrder::Osp => [o, s, p],
            IndexOrder::Ops => [o, p, s],
        }
    }
}

impl fmt::Display for IndexOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Conceptual graph within a store
///
/// Every store owns three graphs keyed apart by a one-byte scope code:
/// asserted data, reasoner inferences, and store metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GraphScope {
    /// Asserted data
    #[default]
    Data,
    /// Reasoner-derived triples
    Infer,
    /// Store metadata
    Meta,
}

impl GraphScope {
    /// Stable one-byte key prefix code
    pub const fn code(self) -> u8 {
        match self {
            GraphScope::Data => 0,
            GraphScope::Infer => 1,
            GraphScope::Meta => 2,
        }
    }

    /// Short name of this scope
    pub fn name(self) -> &'static str {
        match self {
            GraphScope::Data => "data",
            GraphScope::Infer => "infer",
            GraphScope::Meta => "meta",
        }
    }
}

impl fmt::Display for GraphScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Key prefix covering every triple of a (store, scope) pair in one index
pub fn index_prefix(order: IndexOrder, scope: GraphScope, store_id: &str) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + store_id.len() + 1);
    key.push(order.code());
    key.push(scope.code());
    key.extend_from_slice(store_id.as_bytes());
    key.push(KEY_DELIM);
    key
}

/// Key prefix bounding the first `parts` components of an index
///
/// Each bound part is followed by the delimiter, so a part that is a
/// strict prefix of another cannot alias it.
pub fn scan_prefix(
    order: IndexOrder,
    scope: GraphScope,
    store_id: &str,
    parts: &[&str],
) -> Vec<u8> {
    debug_assert!(parts.len() <= 2, "a scan prefix binds at most two parts");
    let mut key = index_prefix(order, scope, store_id);
    for part in parts {
        key.extend_from_slice(part.as_bytes());
        key.push(KEY_DELIM);
    }
    key
}

/// Full key of a triple in one index
pub fn triple_key(
    order: IndexOrder,
    scope: GraphScope,
    store_id: &str,
    triple: &Triple,
) -> Vec<u8> {
    let [p1, p2, p3] = order.parts(triple);
    let mut key = scan_prefix(order, scope, store_id, &[p1, p2]);
    key.extend_from_slice(p3.as_bytes());
    key
}
