//! Triple - the fundamental data unit in Hexastore
//!
//! A Triple is an immutable `(subject, predicate, object)` record. The
//! subject and predicate are non-empty strings; the object is a
//! [`TypedValue`] carrying raw text, a datatype tag, and an id flag.
//!
//! Triples with an id object are graph edges; everything else is a data
//! attribute of its subject.

use crate::value::TypedValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single fact in the graph
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    /// Subject name
    pub subject: String,
    /// Predicate (relation) name
    pub predicate: String,
    /// Object value
    pub object: TypedValue,
}

impl Triple {
    /// Create a new Triple
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: TypedValue,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object,
        }
    }

    /// Create a data triple, inferring the object's tag from raw text
    pub fn data(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        raw: impl Into<String>,
    ) -> Self {
        Self::new(subject, predicate, TypedValue::from_raw(raw))
    }

    /// Create an edge triple whose object names another subject
    pub fn edge(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::new(subject, predicate, TypedValue::id(target))
    }

    /// Check if this triple is a graph edge (object names a subject)
    pub fn is_edge(&self) -> bool {
        self.object.is_id
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {} {}]", self.subject, self.predicate, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Datatype;

    #[test]
    fn test_triple_creation() {
        let t = Triple::data("a1", "name", "Alice");
        assert_eq!(t.subject, "a1");
        assert_eq!(t.predicate, "name");
        assert_eq!(t.object.raw, "Alice");
        assert_eq!(t.object.tag, Datatype::String);
        assert!(!t.is_edge());
    }

    #[test]
    fn test_edge_triple() {
        let t = Triple::edge("a1", "knows", "a2");
        assert!(t.is_edge());
        assert_eq!(t.object.raw, "a2");
    }

    #[test]
    fn test_equality_covers_object_type() {
        let a = Triple::data("s", "p", "5");
        let b = Triple::new("s", "p", TypedValue::typed("5", Datatype::String, false));
        assert_ne!(a, b);
    }

    #[test]
    fn test_json_round_trip() {
        let t = Triple::edge("a1", "knows", "a2");
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(serde_json::from_str::<Triple>(&json).unwrap(), t);

        let v = serde_json::to_value(&Triple::data("a1", "age", "30")).unwrap();
        assert_eq!(v["object"]["tag"], "integer");
        assert_eq!(v["object"]["is_id"], false);
    }
}
