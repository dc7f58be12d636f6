//! Query model types
//!
//! An [`ObjectQueryModel`] is the request shape the executor consumes:
//! predicate filters, outgoing/incoming link constraints, and pagination
//! state. The model derives serde so the outer surface can exchange it as
//! JSON; the `filter` map keeps document order, which makes seed selection
//! deterministic for a fixed query.

use crate::error::{QueryError, Result};
use hexastore_core::{Triple, TypedValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a filter clause
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Exact match (raw-text equality via the index)
    Eq,
    /// Greater than
    Gt,
    /// Greater than or equal
    Ge,
    /// Less than
    Lt,
    /// Less than or equal
    Le,
    /// Substring match (strings only)
    Contains,
}

impl Comparator {
    /// Wire name of this operator
    pub fn as_str(self) -> &'static str {
        match self {
            Comparator::Eq => "eq",
            Comparator::Gt => "gt",
            Comparator::Ge => "ge",
            Comparator::Lt => "lt",
            Comparator::Le => "le",
            Comparator::Contains => "contains",
        }
    }

    /// Parse a wire name; anything outside the enumerated set fails
    pub fn parse(s: &str) -> Result<Comparator> {
        match s {
            "eq" => Ok(Comparator::Eq),
            "gt" => Ok(Comparator::Gt),
            "ge" => Ok(Comparator::Ge),
            "lt" => Ok(Comparator::Lt),
            "le" => Ok(Comparator::Le),
            "contains" => Ok(Comparator::Contains),
            other => Err(QueryError::UnknownComparator(other.to_string())),
        }
    }

    /// Evaluate this operator between a candidate object and a bound value
    ///
    /// Dispatches to the value model, so cross-class operands are simply
    /// false for every operator.
    pub fn evaluate(self, candidate: &TypedValue, bound: &TypedValue) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Comparator::Eq => matches!(candidate.compare(bound), Some(Equal)),
            Comparator::Gt => matches!(candidate.compare(bound), Some(Greater)),
            Comparator::Ge => matches!(candidate.compare(bound), Some(Greater | Equal)),
            Comparator::Lt => matches!(candidate.compare(bound), Some(Less)),
            Comparator::Le => matches!(candidate.compare(bound), Some(Less | Equal)),
            Comparator::Contains => candidate.contains(&bound.raw),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Comparator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self> {
        Comparator::parse(s)
    }
}

impl Serialize for Comparator {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Comparator {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Comparator::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// One predicate constraint: an operator and its bound value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryUnit {
    /// Comparison operator
    pub operator: Comparator,
    /// Bound value, raw text
    pub value: String,
}

impl QueryUnit {
    /// Create a query unit
    pub fn new(operator: Comparator, value: impl Into<String>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }

    /// Equality unit
    pub fn eq(value: impl Into<String>) -> Self {
        Self::new(Comparator::Eq, value)
    }

    /// The bound value with its inferred tag
    pub fn typed_value(&self) -> TypedValue {
        TypedValue::from_raw(self.value.as_str())
    }
}

/// A filter entry: predicate plus its constraint
#[derive(Clone, Debug, PartialEq)]
pub struct FilterClause {
    /// Predicate name the constraint applies to
    pub predicate: String,
    /// The constraint
    pub unit: QueryUnit,
}

/// A graph traversal constraint attached to a query
///
/// Exactly one of `path` or `level` governs the walk: `level > 0` expands
/// the transitive closure of id-edges up to that many hops; `level == 0`
/// follows the explicit dot-separated predicate sequence in `path`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkQuery {
    /// Dot-separated predicate sequence (used when `level == 0`)
    pub path: String,
    /// Hop bound for id-edge closure (0 selects path mode)
    pub level: u32,
    /// Query the reached subjects must match
    pub target: ObjectQueryModel,
}

impl LinkQuery {
    /// Path-mode link
    pub fn path(path: impl Into<String>, target: ObjectQueryModel) -> Self {
        Self {
            path: path.into(),
            level: 0,
            target,
        }
    }

    /// Level-mode link
    pub fn level(level: u32, target: ObjectQueryModel) -> Self {
        Self {
            path: String::new(),
            level,
            target,
        }
    }

    /// Non-empty path segments in document order
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('.').filter(|s| !s.is_empty())
    }
}

/// A structured query over one graph
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectQueryModel {
    /// Subject shortcut; when set, the query returns `s(id).first()`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Predicate constraints, in document order
    #[serde(with = "filter_serde", skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<FilterClause>,
    /// Outgoing link constraints, applied in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub has_object: Vec<LinkQuery>,
    /// Incoming link constraints, applied after outgoing
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub has_subject: Vec<LinkQuery>,
    /// Page size; 0 selects the system default
    pub page_size: usize,
    /// Last triple of the previous page, when resuming
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<Triple>,
}

impl ObjectQueryModel {
    /// Query that resolves a single subject by name
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Query seeded from a single filter clause
    pub fn filtered(predicate: impl Into<String>, unit: QueryUnit) -> Self {
        Self::default().with_filter(predicate, unit)
    }

    /// Append a filter clause
    pub fn with_filter(mut self, predicate: impl Into<String>, unit: QueryUnit) -> Self {
        self.filter.push(FilterClause {
            predicate: predicate.into(),
            unit,
        });
        self
    }

    /// Append an outgoing link constraint
    pub fn with_outgoing(mut self, link: LinkQuery) -> Self {
        self.has_object.push(link);
        self
    }

    /// Append an incoming link constraint
    pub fn with_incoming(mut self, link: LinkQuery) -> Self {
        self.has_subject.push(link);
        self
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Resume after a previous page's last triple
    pub fn with_continuation(mut self, continuation: Triple) -> Self {
        self.continuation = Some(continuation);
        self
    }
}

/// One page of query results
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectQueryResponse {
    /// Triples that survived every stage, in seed-scan order
    pub values: Vec<Triple>,
    /// Pass back to resume; absent on the final page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continuation: Option<Triple>,
}

/// Serde adapter keeping the filter map in document order
mod filter_serde {
    use super::{FilterClause, QueryUnit};
    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(
        filter: &[FilterClause],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(filter.len()))?;
        for clause in filter {
            map.serialize_entry(&clause.predicate, &clause.unit)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<FilterClause>, D::Error> {
        struct FilterVisitor;

        impl<'de> Visitor<'de> for FilterVisitor {
            type Value = Vec<FilterClause>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "a map of predicate to query unit")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> Result<Self::Value, A::Error> {
                let mut filter = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((predicate, unit)) = access.next_entry::<String, QueryUnit>()? {
                    filter.push(FilterClause { predicate, unit });
                }
                Ok(filter)
            }
        }

        deserializer.deserialize_map(FilterVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparator_parse() {
        for (name, op) in [
            ("eq", Comparator::Eq),
            ("gt", Comparator::Gt),
            ("ge", Comparator::Ge),
            ("lt", Comparator::Lt),
            ("le", Comparator::Le),
            ("contains", Comparator::Contains),
        ] {
            assert_eq!(Comparator::parse(name).unwrap(), op);
            assert_eq!(op.as_str(), name);
        }

        assert!(matches!(
            Comparator::parse("neq"),
            Err(QueryError::UnknownComparator(ref s)) if s == "neq"
        ));
    }

    #[test]
    fn test_filter_order_survives_json() {
        let json = r#"{
            "filter": {
                "zeta": {"operator": "eq", "value": "1"},
                "alpha": {"operator": "gt", "value": "2"},
                "mid": {"operator": "contains", "value": "x"}
            }
        }"#;
        let model: ObjectQueryModel = serde_json::from_str(json).unwrap();
        let predicates: Vec<&str> = model.filter.iter().map(|c| c.predicate.as_str()).collect();
        assert_eq!(predicates, vec!["zeta", "alpha", "mid"]);

        let back = serde_json::to_string(&model).unwrap();
        let reparsed: ObjectQueryModel = serde_json::from_str(&back).unwrap();
        assert_eq!(reparsed, model);
    }

    #[test]
    fn test_unknown_operator_rejected_at_parse() {
        let json = r#"{"filter": {"name": {"operator": "neq", "value": "x"}}}"#;
        let err = serde_json::from_str::<ObjectQueryModel>(json).unwrap_err();
        assert!(err.to_string().contains("neq"));
    }

    #[test]
    fn test_defaults() {
        let model: ObjectQueryModel = serde_json::from_str("{}").unwrap();
        assert_eq!(model, ObjectQueryModel::default());
        assert_eq!(model.page_size, 0);
        assert!(model.filter.is_empty());
    }

    #[test]
    fn test_path_segments() {
        let link = LinkQuery::path("knows.worksAt", ObjectQueryModel::by_id("x"));
        let segments: Vec<&str> = link.path_segments().collect();
        assert_eq!(segments, vec!["knows", "worksAt"]);

        let empty = LinkQuery::path("", ObjectQueryModel::by_id("x"));
        assert_eq!(empty.path_segments().count(), 0);
    }

    #[test]
    fn test_builders() {
        let q = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice"))
            .with_filter("age", QueryUnit::new(Comparator::Gt, "21"))
            .with_page_size(10);
        assert_eq!(q.filter.len(), 2);
        assert_eq!(q.filter[0].predicate, "name");
        assert_eq!(q.page_size, 10);
    }
}
