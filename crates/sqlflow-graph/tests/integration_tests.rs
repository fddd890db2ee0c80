//! Integration tests for lineage loading and reachability

use pretty_assertions::assert_eq;
use sqlflow_core::LayoutConfig;
use sqlflow_graph::{
    find_active_set, find_ancestors, find_descendants, import_response, load_graph, Column,
    ColumnRef, LineageDocument, Node, NodeKind, Relation,
};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/lineage").join(name)
}

fn keys(refs: &[ColumnRef]) -> Vec<String> {
    refs.iter().map(ColumnRef::key).collect()
}

fn single_column(name: &str, kind: NodeKind, column: &str) -> Node {
    Node::new(name, name, kind).with_columns(vec![Column::new(column, column)])
}

fn scenario() -> (Vec<Node>, Vec<Relation>) {
    (
        vec![
            single_column("orders", NodeKind::Origin, "id"),
            single_column("customers", NodeKind::Origin, "id"),
            single_column("report", NodeKind::ResultSet, "total"),
        ],
        vec![
            Relation::between("orders", "id", "report", "total"),
            Relation::between("customers", "id", "report", "total"),
        ],
    )
}

#[test]
fn hovering_the_report_lights_up_both_inputs() {
    let (_, relations) = scenario();
    let active = keys(&find_active_set(&relations, "report", "total"));

    assert!(active.contains(&"orders.id".to_string()));
    assert!(active.contains(&"customers.id".to_string()));
    assert!(active.contains(&"report.total".to_string()));
    assert!(active.iter().all(|k| ["report.total", "orders.id", "customers.id"].contains(&k.as_str())));
}

#[test]
fn hovering_one_input_skips_its_sibling() {
    let (_, relations) = scenario();
    let active = keys(&find_active_set(&relations, "orders", "id"));

    assert!(active.contains(&"orders.id".to_string()));
    assert!(active.contains(&"report.total".to_string()));
    assert!(!active.contains(&"customers.id".to_string()));
}

#[test]
fn every_endpoint_includes_itself() {
    let (_, relations) = scenario();
    for relation in &relations {
        for endpoint in [&relation.source, &relation.target] {
            let active = find_active_set(&relations, &endpoint.parent_name, &endpoint.column);
            assert!(active.contains(endpoint), "{} missing from its own active set", endpoint);
        }
    }
}

#[test]
fn direction_and_transitivity() {
    let relations = vec![
        Relation::between("a", "x", "b", "x"),
        Relation::between("b", "x", "c", "x"),
    ];

    let from_b = keys(&find_active_set(&relations, "b", "x"));
    assert!(from_b.contains(&"a.x".to_string()));
    assert!(from_b.contains(&"c.x".to_string()));

    let from_c = keys(&find_active_set(&relations, "c", "x"));
    assert!(from_c.contains(&"a.x".to_string()));

    let from_a = keys(&find_active_set(&relations, "a", "x"));
    assert!(from_a.contains(&"c.x".to_string()));
}

#[test]
fn dangling_relation_has_no_effect() {
    let (nodes, mut relations) = scenario();
    relations.push(Relation::between("ghost", "id", "phantom", "total"));
    let graph = load_graph(nodes, relations.clone());

    let active = keys(&find_active_set(&relations, "orders", "id"));
    assert_eq!(active, vec!["orders.id", "orders.id", "report.total"]);
    assert_eq!(keys(&graph.active_set("orders", "id")), active);
}

#[test]
fn isolated_column_yields_singletons() {
    let (_, relations) = scenario();
    assert_eq!(keys(&find_descendants(&relations, "audit", "ts")), vec!["audit.ts"]);
    assert_eq!(keys(&find_ancestors(&relations, "audit", "ts")), vec!["audit.ts"]);
}

#[test]
fn cyclic_fixture_terminates_with_bounded_result() {
    let graph = LineageDocument::from_file(&fixture("cyclic.json")).unwrap().into_graph();
    let relations = graph.relations();

    let descendants = keys(&find_descendants(relations, "c", "x"));
    assert_eq!(descendants, vec!["c.x", "b.x", "a.x"]);

    let ancestors = keys(&find_ancestors(relations, "a", "x"));
    assert_eq!(ancestors, vec!["a.x", "b.x", "c.x"]);

    assert_eq!(graph.cyclic_keys(), vec!["a.x", "b.x"]);
    assert!(graph.topological_order().is_none());
}

#[test]
fn slice_and_indexed_walks_agree_on_fixture() {
    let graph = LineageDocument::from_file(&fixture("data.json")).unwrap().into_graph();

    for key in graph.column_keys() {
        let column = ColumnRef::parse_element_id(&key).unwrap();
        assert_eq!(
            graph.active_set(&column.parent_name, &column.column),
            find_active_set(graph.relations(), &column.parent_name, &column.column),
            "walks disagree for {}",
            key
        );
    }
}

#[test]
fn fixture_report_total_lineage() {
    let graph = LineageDocument::from_file(&fixture("data.json")).unwrap().into_graph();

    assert_eq!(
        keys(&graph.descendants("report", "total")),
        vec!["report.total", "order_totals.total", "orders.amount", "archive.amount"]
    );
    assert_eq!(keys(&graph.ancestors("report", "total")), vec!["report.total"]);
    assert_eq!(
        keys(&graph.ancestors("customers", "region")),
        vec!["customers.region", "regions.region", "report.region"]
    );
}

#[test]
fn imported_service_response_is_walkable() {
    let json = std::fs::read_to_string(fixture("service_response.json")).unwrap();
    let doc = import_response(&json, &LayoutConfig::default()).unwrap();

    assert_eq!(doc.nodes.len(), 4);
    assert_eq!(doc.nodes[3].kind, NodeKind::ResultSet);

    let graph = doc.into_graph();
    let upstream = keys(&graph.descendants("dwdaily_revenue", "descripton"));
    assert_eq!(
        upstream,
        vec![
            "dwdaily_revenue.descripton",
            "odsorders.descripton",
            "odsrefunds.descripton",
            "dimregion.descripton",
        ]
    );
}
