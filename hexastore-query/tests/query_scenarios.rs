//! End-to-end query scenarios over an in-memory graph: filter seeds, link
//! traversal in both directions, pagination, and input validation.

use hexastore_core::{MemoryGraph, MemoryKv, Triple};
use hexastore_query::{
    execute, Comparator, LinkQuery, ObjectQueryModel, QueryError, QueryUnit,
};
use std::sync::Arc;

fn people() -> MemoryGraph {
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

fn social() -> MemoryGraph {
    let g = people();
    g.insert_all(&[
        Triple::edge("a1", "knows", "a2"),
        Triple::edge("a2", "knows", "a3"),
        Triple::data("a3", "name", "Carol"),
    ])
    .unwrap();
    g
}

#[test]
fn eq_filter_returns_the_matching_triple() {
    let g = people();
    let q = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice"));
    let page = execute(&g, &q).unwrap();

    assert_eq!(page.values, vec![Triple::data("a1", "name", "Alice")]);
    assert!(page.continuation.is_none());
}

#[test]
fn comparator_filter_scans_and_narrows() {
    let g = people();
    let q = ObjectQueryModel::filtered("age", QueryUnit::new(Comparator::Gt, "26"));
    let page = execute(&g, &q).unwrap();

    assert_eq!(page.values.len(), 1);
    assert_eq!(page.values[0].subject, "a1");
    assert!(page.continuation.is_none());
}

#[test]
fn outgoing_path_link_constrains_the_result() {
    let g = social();
    let q = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice")).with_outgoing(
        LinkQuery::path(
            "knows",
            ObjectQueryModel::filtered("name", QueryUnit::eq("Bob")),
        ),
    );
    let page = execute(&g, &q).unwrap();

    assert_eq!(page.values.len(), 1);
    assert_eq!(page.values[0].subject, "a1");

    // The same link pointed at Carol fails: she is two hops away
    let miss = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice")).with_outgoing(
        LinkQuery::path(
            "knows",
            ObjectQueryModel::filtered("name", QueryUnit::eq("Carol")),
        ),
    );
    assert!(execute(&g, &miss).unwrap().values.is_empty());
}

#[test]
fn level_link_reaches_across_hops() {
    let g = social();
    let q = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice")).with_outgoing(
        LinkQuery::level(
            2,
            ObjectQueryModel::filtered("name", QueryUnit::eq("Carol")),
        ),
    );
    let page = execute(&g, &q).unwrap();

    assert_eq!(page.values.len(), 1);
    assert_eq!(page.values[0].subject, "a1");

    // One hop is not enough
    let shallow = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice")).with_outgoing(
        LinkQuery::level(
            1,
            ObjectQueryModel::filtered("name", QueryUnit::eq("Carol")),
        ),
    );
    assert!(execute(&g, &shallow).unwrap().values.is_empty());
}

#[test]
fn incoming_link_traverses_in_reverse() {
    let g = social();
    // Bob is known by Alice
    let q = ObjectQueryModel::filtered("name", QueryUnit::eq("Bob")).with_incoming(
        LinkQuery::path(
            "knows",
            ObjectQueryModel::filtered("name", QueryUnit::eq("Alice")),
        ),
    );
    let page = execute(&g, &q).unwrap();
    assert_eq!(page.values.len(), 1);
    assert_eq!(page.values[0].subject, "a2");

    // Nobody knows Alice
    let miss = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice")).with_incoming(
        LinkQuery::path(
            "knows",
            ObjectQueryModel::filtered("name", QueryUnit::eq("Bob")),
        ),
    );
    assert!(execute(&g, &miss).unwrap().values.is_empty());
}

#[test]
fn pagination_walks_every_page_without_overlap() {
    let g = MemoryGraph::new(Arc::new(MemoryKv::new()), "things");
    for i in 1..=5 {
        g.insert(&Triple::data(format!("s{}", i), "type", "T")).unwrap();
    }

    let base = ObjectQueryModel::filtered("type", QueryUnit::eq("T")).with_page_size(2);

    let page1 = execute(&g, &base).unwrap();
    assert_eq!(subjects(&page1.values), vec!["s1", "s2"]);
    let cont1 = page1.continuation.expect("page 1 must continue");

    let page2 = execute(&g, &base.clone().with_continuation(cont1)).unwrap();
    assert_eq!(subjects(&page2.values), vec!["s3", "s4"]);
    let cont2 = page2.continuation.expect("page 2 must continue");

    let page3 = execute(&g, &base.with_continuation(cont2)).unwrap();
    assert_eq!(subjects(&page3.values), vec!["s5"]);
    assert!(page3.continuation.is_none());
}

#[test]
fn paged_and_unpaged_results_agree() {
    let g = MemoryGraph::new(Arc::new(MemoryKv::new()), "things");
    for i in 1..=13 {
        g.insert(&Triple::data(format!("s{:02}", i), "type", "T")).unwrap();
    }

    let all = execute(
        &g,
        &ObjectQueryModel::filtered("type", QueryUnit::eq("T")).with_page_size(100),
    )
    .unwrap();

    let mut paged = Vec::new();
    let mut query = ObjectQueryModel::filtered("type", QueryUnit::eq("T")).with_page_size(3);
    loop {
        let page = execute(&g, &query).unwrap();
        paged.extend(page.values);
        match page.continuation {
            Some(cont) => query.continuation = Some(cont),
            None => break,
        }
    }
    assert_eq!(paged, all.values);
}

#[test]
fn adding_a_filter_never_enlarges_the_result() {
    let g = people();
    let broad = ObjectQueryModel::filtered("age", QueryUnit::new(Comparator::Ge, "0"));
    let narrow = broad
        .clone()
        .with_filter("name", QueryUnit::eq("Alice"));

    let broad_hits = execute(&g, &broad).unwrap().values;
    let narrow_hits = execute(&g, &narrow).unwrap().values;

    assert_eq!(broad_hits.len(), 2);
    assert_eq!(narrow_hits.len(), 1);
    for t in &narrow_hits {
        assert!(broad_hits.contains(t));
    }
}

#[test]
fn contains_matches_substrings_of_strings() {
    let g = people();
    let q = ObjectQueryModel::filtered("name", QueryUnit::new(Comparator::Contains, "li"));
    let page = execute(&g, &q).unwrap();
    assert_eq!(subjects(&page.values), vec!["a1"]);

    // Substring match is not defined on numbers
    let none = ObjectQueryModel::filtered("age", QueryUnit::new(Comparator::Contains, "3"));
    assert!(execute(&g, &none).unwrap().values.is_empty());
}

#[test]
fn cross_type_comparisons_never_match() {
    let g = people();
    // "Alice" and "Bob" are strings; a numeric bound cannot order them
    let q = ObjectQueryModel::filtered("name", QueryUnit::new(Comparator::Gt, "5"));
    assert!(execute(&g, &q).unwrap().values.is_empty());
}

#[test]
fn validation_errors_terminate_the_query() {
    let g = people();

    assert!(matches!(
        execute(&g, &ObjectQueryModel::default()),
        Err(QueryError::AtLeastOneFilter)
    ));

    let empty_path = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice"))
        .with_outgoing(LinkQuery::path("", ObjectQueryModel::by_id("a2")));
    assert!(matches!(
        execute(&g, &empty_path),
        Err(QueryError::PathEmpty)
    ));

    assert!(matches!(
        Comparator::parse("neq"),
        Err(QueryError::UnknownComparator(_))
    ));
}

#[test]
fn nested_link_targets_constrain_the_far_endpoint() {
    let g = social();
    g.insert_all(&[
        Triple::edge("a2", "worksAt", "c1"),
        Triple::data("c1", "name", "Acme"),
    ])
    .unwrap();

    // Alice, who knows someone working at Acme
    let hit = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice")).with_outgoing(
        LinkQuery::path(
            "knows",
            ObjectQueryModel::filtered("name", QueryUnit::eq("Bob")).with_outgoing(
                LinkQuery::path(
                    "worksAt",
                    ObjectQueryModel::filtered("name", QueryUnit::eq("Acme")),
                ),
            ),
        ),
    );
    assert_eq!(subjects(&execute(&g, &hit).unwrap().values), vec!["a1"]);

    // The nested employer constraint is enforced, not just validated
    let miss = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice")).with_outgoing(
        LinkQuery::path(
            "knows",
            ObjectQueryModel::filtered("name", QueryUnit::eq("Bob")).with_outgoing(
                LinkQuery::path(
                    "worksAt",
                    ObjectQueryModel::filtered("name", QueryUnit::eq("Globex")),
                ),
            ),
        ),
    );
    assert!(execute(&g, &miss).unwrap().values.is_empty());
}

#[test]
fn incoming_links_only_follow_id_edges() {
    let g = social();
    // A string value equal to a2's name, not an edge
    g.insert(&Triple::data("b1", "knows", "a2")).unwrap();

    let q = ObjectQueryModel::filtered("name", QueryUnit::eq("Bob"))
        .with_incoming(LinkQuery::path("knows", ObjectQueryModel::by_id("b1")));
    assert!(execute(&g, &q).unwrap().values.is_empty());
}

#[test]
fn link_target_id_short_circuits() {
    let g = social();
    let q = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice"))
        .with_outgoing(LinkQuery::path("knows", ObjectQueryModel::by_id("a2")));
    assert_eq!(execute(&g, &q).unwrap().values.len(), 1);

    let miss = ObjectQueryModel::filtered("name", QueryUnit::eq("Alice"))
        .with_outgoing(LinkQuery::path("knows", ObjectQueryModel::by_id("a9")));
    assert!(execute(&g, &miss).unwrap().values.is_empty());
}

#[test]
fn json_query_round_trips_through_the_executor() {
    let g = people();
    let q: ObjectQueryModel = serde_json::from_str(
        r#"{"filter": {"name": {"operator": "eq", "value": "Bob"}}, "page_size": 5}"#,
    )
    .unwrap();
    let page = execute(&g, &q).unwrap();
    assert_eq!(subjects(&page.values), vec!["a2"]);

    let body = serde_json::to_string(&page).unwrap();
    assert!(body.contains("\"Bob\""));
}

fn subjects(values: &[Triple]) -> Vec<&str> {
    values.iter().map(|t| t.subject.as_str()).collect()
}
