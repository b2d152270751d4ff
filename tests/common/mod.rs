#![allow(dead_code)]

use pipeweave::edge::Connection;
use pipeweave::node::{Node, Position};
use pipeweave::store::FlowStore;
use pipeweave::types::NodeKind;

/// A bare node at the origin, for collection-level tests.
pub fn node_at_origin(id: &str, kind: NodeKind) -> Node {
    Node::new(id, kind, Position::default())
}

/// A store with the canonical three-step pipeline:
/// `start-1 -> node-2 -> end-3`, connected.
pub fn pipeline_store() -> FlowStore {
    let mut store = FlowStore::new();
    let start = store.new_node(NodeKind::Start, Position::new(0.0, 100.0));
    let step = store.new_node(NodeKind::Node, Position::new(250.0, 100.0));
    let end = store.new_node(NodeKind::End, Position::new(500.0, 100.0));
    store.on_connect(Connection::between(&start.id, &step.id));
    store.on_connect(Connection::between(&step.id, &end.id));
    store
}
