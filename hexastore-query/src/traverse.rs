//! Link traversal: frontier expansion over graph edges
//!
//! Both link modes reduce to an iterative frontier walk:
//!
//! - **Path mode** consumes the dot-separated predicate sequence one
//!   segment at a time, replacing the frontier with the nodes reachable
//!   over that segment. Incoming walks consume the segments in reverse
//!   and look up edges by (predicate, object). Only id-edges count in
//!   either direction; a data value that happens to equal a subject name
//!   is not an edge.
//! - **Level mode** expands the closure of id-edges hop by hop, bounded
//!   by `level`, with the source itself in the reached set at depth 0.
//!
//! Frontiers are deduplicated at every step, so cycles cannot loop the
//! walk and repeated nodes are expanded once.

use crate::error::Result;
use crate::executor::subject_matches_filters;
use crate::model::{LinkQuery, ObjectQueryModel};
use hexastore_core::{Graph, KvStore};
use rustc_hash::FxHashSet;

/// Which way a link constraint traverses edges
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    /// Follow edges from the candidate subject (`has_object`)
    Outgoing,
    /// Follow edges into the candidate subject (`has_subject`)
    Incoming,
}

/// Check one link constraint against a candidate subject
///
/// Walks the frontier to the link's endpoints, then accepts the candidate
/// iff any reached node matches the link target (the target's `id`
/// short-circuits to name equality; otherwise its filter clauses and its
/// own nested links apply, recursively).
pub(crate) fn link_matches<S: KvStore>(
    graph: &Graph<S>,
    subject: &str,
    link: &LinkQuery,
    direction: Direction,
) -> Result<bool> {
    let frontier = if link.level == 0 {
        walk_path(graph, subject, link, direction)?
    } else {
        expand_levels(graph, subject, link.level, direction)?
    };
    tracing::trace!(
        subject,
        ?direction,
        reached = frontier.len(),
        "link frontier"
    );

    if let Some(id) = &link.target.id {
        return Ok(frontier.contains(id));
    }
    for node in &frontier {
        if subject_matches_target(graph, node, &link.target)? {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Check a reached node against a link target
///
/// Every filter clause must hold, and every nested link on the target
/// must hold in turn, so a target is matched with the same rules as a
/// top-level candidate. Recursion depth is bounded by the query shape.
fn subject_matches_target<S: KvStore>(
    graph: &Graph<S>,
    subject: &str,
    target: &ObjectQueryModel,
) -> Result<bool> {
    if !subject_matches_filters(graph, subject, &target.filter, None)? {
        return Ok(false);
    }
    for link in &target.has_object {
        if !link_matches(graph, subject, link, Direction::Outgoing)? {
            return Ok(false);
        }
    }
    for link in &target.has_subject {
        if !link_matches(graph, subject, link, Direction::Incoming)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Follow an explicit predicate sequence
fn walk_path<S: KvStore>(
    graph: &Graph<S>,
    source: &str,
    link: &LinkQuery,
    direction: Direction,
) -> Result<FxHashSet<String>> {
    let mut segments: Vec<&str> = link.path_segments().collect();
    if direction == Direction::Incoming {
        segments.reverse();
    }

    let mut frontier = FxHashSet::default();
    frontier.insert(source.to_owned());

    for segment in segments {
        let mut next = FxHashSet::default();
        for node in &frontier {
            match direction {
                Direction::Outgoing => {
                    for item in graph.sp(node, segment)? {
                        let triple = item?;
                        if triple.object.is_id {
                            next.insert(triple.object.raw);
                        }
                    }
                }
                Direction::Incoming => {
                    for item in graph.po(segment, node, None)? {
                        let triple = item?;
                        if triple.object.is_id {
                            next.insert(triple.subject);
                        }
                    }
                }
            }
        }
        if next.is_empty() {
            return Ok(next);
        }
        frontier = next;
    }
    Ok(frontier)
}

/// Expand the id-edge closure up to `level` hops
fn expand_levels<S: KvStore>(
    graph: &Graph<S>,
    source: &str,
    level: u32,
    direction: Direction,
) -> Result<FxHashSet<String>> {
    let mut reached = FxHashSet::default();
    reached.insert(source.to_owned());
    let mut current = vec![source.to_owned()];

    for _ in 0..level {
        let mut next = Vec::new();
        for node in &current {
            match direction {
                Direction::Outgoing => {
                    for item in graph.s(node)? {
                        let triple = item?;
                        if triple.object.is_id && reached.insert(triple.object.raw.clone()) {
                            next.push(triple.object.raw);
                        }
                    }
                }
                Direction::Incoming => {
                    for item in graph.o(node)? {
                        let triple = item?;
                        if triple.object.is_id && reached.insert(triple.subject.clone()) {
                            next.push(triple.subject);
                        }
                    }
                }
            }
        }
        if next.is_empty() {
            break;
        }
        current = next;
    }
    Ok(reached)
}
