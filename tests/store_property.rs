#[macro_use]
extern crate proptest;

use proptest::prelude::{Strategy, prop};

use pipeweave::changes::NodeChange;
use pipeweave::edge::Connection;
use pipeweave::node::Position;
use pipeweave::store::FlowStore;
use pipeweave::types::NodeKind;

// Generators shared by the store property tests.

/// A small pool of node ids so that generated connections collide often.
fn node_id_strategy() -> impl Strategy<Value = String> {
    (1u8..=5).prop_map(|n| format!("node-{n}"))
}

/// Optional handle drawn from a small vocabulary; `Some("")` exercises
/// the empty-string normalization path.
fn handle_strategy() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec![
        String::new(),
        "yes".to_string(),
        "no".to_string(),
    ]))
}

fn connection_strategy() -> impl Strategy<Value = Connection> {
    (
        node_id_strategy(),
        node_id_strategy(),
        handle_strategy(),
        handle_strategy(),
    )
        .prop_map(|(source, target, source_handle, target_handle)| Connection {
            source: Some(source),
            target: Some(target),
            source_handle,
            target_handle,
        })
}

fn store_with_node_pool() -> FlowStore {
    let mut store = FlowStore::new();
    for n in 1..=5 {
        store.add_node(pipeweave::node::Node::new(
            format!("node-{n}"),
            NodeKind::Node,
            Position::default(),
        ));
    }
    store
}

proptest! {
    // However many connect attempts arrive, the edge set never contains
    // a self-loop or two edges with the same endpoint tuple.
    #[test]
    fn prop_edges_stay_deduped_and_loop_free(
        conns in prop::collection::vec(connection_strategy(), 0..40),
    ) {
        let mut store = store_with_node_pool();
        for conn in conns {
            store.on_connect(conn);
        }

        let mut seen = std::collections::HashSet::new();
        for edge in store.edges() {
            prop_assert_ne!(&edge.source, &edge.target);
            let tuple = (
                edge.source.clone(),
                edge.source_handle.clone(),
                edge.target.clone(),
                edge.target_handle.clone(),
            );
            prop_assert!(seen.insert(tuple), "duplicate endpoint tuple");
            // Normalization holds: no empty-string handles survive.
            prop_assert_ne!(edge.source_handle.as_deref(), Some(""));
            prop_assert_ne!(edge.target_handle.as_deref(), Some(""));
        }
    }

    // Edge ids mirror the endpoint tuple exactly, so id equality and
    // tuple equality coincide.
    #[test]
    fn prop_edge_id_is_a_faithful_tuple_encoding(
        conns in prop::collection::vec(connection_strategy(), 0..40),
    ) {
        let mut store = store_with_node_pool();
        for conn in conns {
            store.on_connect(conn);
        }
        let mut ids = std::collections::HashSet::new();
        for edge in store.edges() {
            let expected = format!(
                "edge-{}-{}-{}-{}",
                edge.source,
                edge.source_handle.as_deref().unwrap_or(""),
                edge.target,
                edge.target_handle.as_deref().unwrap_or(""),
            );
            prop_assert_eq!(&edge.id, &expected);
            prop_assert!(ids.insert(edge.id.clone()));
        }
    }

    // Within one batch, the last position record for an id wins.
    #[test]
    fn prop_last_position_record_wins(
        positions in prop::collection::vec((0.0f64..1000.0, 0.0f64..1000.0), 1..20),
    ) {
        let mut store = FlowStore::new();
        let node = store.new_node(NodeKind::Node, Position::default());

        let batch: Vec<NodeChange> = positions
            .iter()
            .map(|&(x, y)| NodeChange::Position {
                id: node.id.clone(),
                position: Position::new(x, y),
            })
            .collect();
        store.apply_node_changes(&batch);

        let (x, y) = *positions.last().unwrap();
        prop_assert_eq!(store.node(&node.id).unwrap().position, Position::new(x, y));
    }

    // Removing a node leaves no edge referencing it, whatever was
    // connected beforehand.
    #[test]
    fn prop_cascade_leaves_no_dangling_edges(
        conns in prop::collection::vec(connection_strategy(), 0..40),
        victim in node_id_strategy(),
    ) {
        let mut store = store_with_node_pool();
        for conn in conns {
            store.on_connect(conn);
        }
        store.remove_node(&victim);

        prop_assert!(store.node(&victim).is_none());
        for edge in store.edges() {
            prop_assert_ne!(&edge.source, &victim);
            prop_assert_ne!(&edge.target, &victim);
        }
    }
}

// Strategies above stay in sync with the store's normalization rules;
// this pins the generator contract itself.
proptest! {
    #[test]
    fn prop_generated_connections_name_pool_nodes(conn in connection_strategy()) {
        let store = store_with_node_pool();
        prop_assert!(store.node(conn.source.as_deref().unwrap()).is_some());
        prop_assert!(store.node(conn.target.as_deref().unwrap()).is_some());
    }
}
