//! Query execution
//!
//! The executor turns an [`ObjectQueryModel`] into one page of triples:
//!
//! 1. Validate the model (and every nested link target) up front, so
//!    input errors surface before any scan.
//! 2. Resolve the id shortcut, if present.
//! 3. Pick a seed clause and open its index scan: an `eq` clause scans
//!    `po(predicate, value)` directly; comparator clauses scan
//!    `p(predicate)` and filter per record.
//! 4. Pull seed triples one at a time, dropping any whose subject fails a
//!    remaining filter or a link constraint.
//! 5. Cut the page and emit the last triple as the continuation when the
//!    page filled.
//!
//! Nothing before the page cut is materialized; every stage is a
//! per-record check against the graph primitives.

use crate::error::{QueryError, Result};
use crate::model::{Comparator, FilterClause, ObjectQueryModel, ObjectQueryResponse};
use crate::options::QueryOptions;
use crate::traverse::{link_matches, Direction};
use hexastore_core::{Graph, KvStore, Triple};

/// Execute a query with default options
pub fn execute<S: KvStore>(
    graph: &Graph<S>,
    query: &ObjectQueryModel,
) -> Result<ObjectQueryResponse> {
    execute_with_options(graph, query, &QueryOptions::default())
}

/// Execute a query against one graph
pub fn execute_with_options<S: KvStore>(
    graph: &Graph<S>,
    query: &ObjectQueryModel,
    options: &QueryOptions,
) -> Result<ObjectQueryResponse> {
    validate(query)?;

    if let Some(id) = &query.id {
        let first = graph.s(id)?.next().transpose()?;
        tracing::debug!(store = %graph.store_id(), id = %id, hit = first.is_some(), "id shortcut");
        return Ok(ObjectQueryResponse {
            values: first.into_iter().collect(),
            continuation: None,
        });
    }

    let page_size = options.resolve(query.page_size);
    let continuation = query.continuation.as_ref();

    // The seed clause drives the scan; an eq clause is preferred because
    // it bounds both predicate and object in the POS index.
    let seed_idx = query
        .filter
        .iter()
        .position(|clause| clause.unit.operator == Comparator::Eq)
        .unwrap_or(0);
    let seed = &query.filter[seed_idx];
    tracing::debug!(
        predicate = %seed.predicate,
        operator = %seed.unit.operator,
        resumed = continuation.is_some(),
        "seed clause"
    );

    let scan = match seed.unit.operator {
        Comparator::Eq => graph.po(&seed.predicate, &seed.unit.value, continuation)?,
        _ => graph.p(&seed.predicate, continuation)?,
    };
    let seed_bound = seed.unit.typed_value();

    let mut values: Vec<Triple> = Vec::new();
    'scan: for item in scan {
        let triple = item?;

        if seed.unit.operator != Comparator::Eq
            && !seed.unit.operator.evaluate(&triple.object, &seed_bound)
        {
            continue;
        }
        if !subject_matches_filters(graph, &triple.subject, &query.filter, Some(seed_idx))? {
            continue;
        }
        for link in &query.has_object {
            if !link_matches(graph, &triple.subject, link, Direction::Outgoing)? {
                continue 'scan;
            }
        }
        for link in &query.has_subject {
            if !link_matches(graph, &triple.subject, link, Direction::Incoming)? {
                continue 'scan;
            }
        }

        values.push(triple);
        if values.len() == page_size {
            break;
        }
    }

    let continuation = if values.len() == page_size {
        values.last().cloned()
    } else {
        None
    };
    tracing::debug!(returned = values.len(), more = continuation.is_some(), "page cut");
    Ok(ObjectQueryResponse {
        values,
        continuation,
    })
}

/// Check a subject against filter clauses, optionally skipping the seed
///
/// An `eq` clause is a point membership test; comparator clauses scan the
/// subject's values for the predicate and accept on any match.
pub(crate) fn subject_matches_filters<S: KvStore>(
    graph: &Graph<S>,
    subject: &str,
    clauses: &[FilterClause],
    skip: Option<usize>,
) -> Result<bool> {
    for (idx, clause) in clauses.iter().enumerate() {
        if Some(idx) == skip {
            continue;
        }
        if !subject_matches_clause(graph, subject, clause)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn subject_matches_clause<S: KvStore>(
    graph: &Graph<S>,
    subject: &str,
    clause: &FilterClause,
) -> Result<bool> {
    if clause.unit.operator == Comparator::Eq {
        return Ok(graph.exists(subject, &clause.predicate, &clause.unit.value)?);
    }
    let bound = clause.unit.typed_value();
    for item in graph.sp(subject, &clause.predicate)? {
        let triple = item?;
        if clause.unit.operator.evaluate(&triple.object, &bound) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Reject malformed queries before touching storage
///
/// Link targets are validated recursively, so a bad nested model fails
/// the whole query up front.
fn validate(query: &ObjectQueryModel) -> Result<()> {
    if query.id.is_none() && query.filter.is_empty() {
        return Err(QueryError::AtLeastOneFilter);
    }
    for link in query.has_object.iter().chain(&query.has_subject) {
        if link.level == 0 && link.path_segments().next().is_none() {
            return Err(QueryError::PathEmpty);
        }
        validate(&link.target)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinkQuery, QueryUnit};
    use hexastore_core::{MemoryGraph, MemoryKv};
    use std::sync::Arc;

    fn graph() -> MemoryGraph {
        let g = MemoryGraph::new(Arc::new(MemoryKv::new()), "people");
        g.insert_all(&[
            Triple::data("a1", "name", "Alice"),
            Triple::data("a1", "age", "30"),
            Triple::data("a2", "name", "Bob"),
            Triple::data("a2", "age", "25"),
        ])
        .unwrap();
        g
    }

    #[test]
    fn test_validation_failures() {
        let g = graph();

        assert!(matches!(
            execute(&g, &ObjectQueryModel::default()),
            Err(QueryError::AtLeastOneFilter)
        ));

        let bad_link = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice"))
            .with_outgoing(LinkQuery::path("", ObjectQueryModel::by_id("a2")));
        assert!(matches!(execute(&g, &bad_link), Err(QueryError::PathEmpty)));

        // A nested target must itself carry an id or a filter
        let bad_target = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice"))
            .with_outgoing(LinkQuery::path("knows", ObjectQueryModel::default()));
        assert!(matches!(
            execute(&g, &bad_target),
            Err(QueryError::AtLeastOneFilter)
        ));
    }

    #[test]
    fn test_id_shortcut() {
        let g = graph();
        let response = execute(&g, &ObjectQueryModel::by_id("a1")).unwrap();
        assert_eq!(response.values.len(), 1);
        assert_eq!(response.values[0].subject, "a1");
        assert!(response.continuation.is_none());

        let missing = execute(&g, &ObjectQueryModel::by_id("nobody")).unwrap();
        assert!(missing.values.is_empty());
        assert!(missing.continuation.is_none());
    }

    #[test]
    fn test_eq_seed_preferred_over_comparator() {
        let g = graph();
        // Comparator clause first; the eq clause must still seed the scan,
        // so returned triples carry the eq predicate.
        let q = ObjectQueryModel::filtered("age", QueryUnit::new(Comparator::Gt, "20"))
            .with_filter("name", QueryUnit::eq("Alice"));
        let response = execute(&g, &q).unwrap();
        assert_eq!(response.values.len(), 1);
        assert_eq!(response.values[0].predicate, "name");
        assert_eq!(response.values[0].subject, "a1");
    }

    #[test]
    fn test_comparator_seed() {
        let g = graph();
        let q = ObjectQueryModel::filtered("age", QueryUnit::new(Comparator::Gt, "26"));
        let response = execute(&g, &q).unwrap();
        assert_eq!(response.values.len(), 1);
        assert_eq!(response.values[0].subject, "a1");
        assert_eq!(response.values[0].object.raw, "30");
    }
}
