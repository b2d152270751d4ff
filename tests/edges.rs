//! Connection validation and edge synthesis at the store boundary.

mod common;
use common::*;

use pipeweave::edge::{Connection, DEFAULT_STROKE, Edge};
use pipeweave::node::Position;
use pipeweave::store::FlowStore;
use pipeweave::types::NodeKind;

#[test]
fn self_loops_are_rejected_silently() {
    let mut store = FlowStore::new();
    let node = store.new_node(NodeKind::Node, Position::default());
    store.on_connect(Connection::between(&node.id, &node.id));
    assert!(store.edges().is_empty());
}

#[test]
fn half_open_connections_are_rejected() {
    let mut store = pipeline_store();
    let before = store.edges().len();
    store.on_connect(Connection {
        source: Some("start-1".into()),
        ..Default::default()
    });
    store.on_connect(Connection::default());
    assert_eq!(store.edges().len(), before);
}

#[test]
fn synthesized_edges_carry_default_presentation() {
    let mut store = FlowStore::new();
    let a = store.new_node(NodeKind::Node, Position::default());
    let b = store.new_node(NodeKind::Node, Position::default());
    store.on_connect(Connection::between(&a.id, &b.id));

    let edge = &store.edges()[0];
    assert!(edge.animated);
    assert_eq!(edge.stroke.as_deref(), Some(DEFAULT_STROKE));
    assert_eq!(edge.kind.as_deref(), Some("default"));
    assert!(!edge.selected);
}

#[test]
fn dedup_treats_empty_and_absent_handles_alike() {
    let mut store = FlowStore::new();
    let a = store.new_node(NodeKind::Node, Position::default());
    let b = store.new_node(NodeKind::Node, Position::default());

    store.on_connect(Connection::between(&a.id, &b.id).from_handle(""));
    store.on_connect(Connection::between(&a.id, &b.id));
    assert_eq!(store.edges().len(), 1);
}

#[test]
fn reversed_direction_is_a_distinct_edge() {
    let mut store = FlowStore::new();
    let a = store.new_node(NodeKind::Node, Position::default());
    let b = store.new_node(NodeKind::Node, Position::default());

    store.on_connect(Connection::between(&a.id, &b.id));
    store.on_connect(Connection::between(&b.id, &a.id));
    assert_eq!(store.edges().len(), 2);
}

#[test]
fn edge_ids_are_deterministic_for_a_tuple() {
    let conn = Connection::between("router-1", "node-2").from_handle("fallback");
    let first = Edge::from_connection(&conn).unwrap();
    let second = Edge::from_connection(&conn).unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.id, "edge-router-1-fallback-node-2-");
}

#[test]
fn edge_wire_shape_matches_canvas_expectations() {
    let edge = Edge::from_connection(
        &Connection::between("a", "b").from_handle("out"),
    )
    .unwrap();
    let json = serde_json::to_value(&edge).unwrap();
    assert_eq!(json["id"], "edge-a-out-b-");
    assert_eq!(json["sourceHandle"], "out");
    assert_eq!(json["type"], "default");
    assert_eq!(json["animated"], true);
    // Unset selection flags stay off the wire.
    assert!(json.get("selected").is_none());
}
