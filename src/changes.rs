//! Change folding: applying canvas-originated change batches to the graph.
//!
//! The canvas reports incremental mutations as ordered batches of change
//! records. [`apply_node_changes`] and [`apply_edge_changes`] left-fold a
//! batch over the current collection and return a new collection; the
//! inputs are never mutated. Entities are shared via [`Arc`], and only the
//! entities a batch actually touches are re-allocated — untouched entries
//! keep their pointer identity, which is what the canvas's
//! reference-equality change detection relies on.
//!
//! Order within a batch is significant: a `Remove` after a `Position` for
//! the same id is the final word. Records naming an unknown id are no-ops.
//!
//! ```rust
//! use std::sync::Arc;
//! use pipeweave::changes::{apply_node_changes, NodeChange};
//! use pipeweave::node::{Node, Position};
//! use pipeweave::types::NodeKind;
//!
//! let nodes = vec![Arc::new(Node::new("node-1", NodeKind::Node, Position::default()))];
//! let folded = apply_node_changes(
//!     &[
//!         NodeChange::Position { id: "node-1".into(), position: Position::new(10.0, 0.0) },
//!         NodeChange::Position { id: "node-1".into(), position: Position::new(20.0, 5.0) },
//!     ],
//!     &nodes,
//! );
//! assert_eq!(folded[0].position, Position::new(20.0, 5.0));
//! ```

use std::sync::Arc;

use crate::edge::Edge;
use crate::node::{Node, Position};

/// One incremental node mutation reported by the canvas.
///
/// Marked non-exhaustive: future canvas event kinds extend this enum
/// without breaking downstream matchers.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum NodeChange {
    /// Append the node verbatim.
    Add(Node),
    /// Drop the node with this id.
    Remove(String),
    /// Clear the whole collection (precedes loading a different flow).
    Reset,
    /// Merge a new canvas position into the node.
    Position { id: String, position: Position },
    /// Merge measured dimensions into the node.
    Dimensions {
        id: String,
        width: f64,
        height: f64,
    },
    /// Merge the selection flag into the node.
    Select { id: String, selected: bool },
}

/// One incremental edge mutation reported by the canvas.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum EdgeChange {
    Add(Edge),
    Remove(String),
    Reset,
    Select { id: String, selected: bool },
}

/// Fold an ordered batch of node changes over the current collection.
///
/// Pure: returns a new vector, sharing untouched nodes with the input.
#[must_use]
pub fn apply_node_changes(changes: &[NodeChange], nodes: &[Arc<Node>]) -> Vec<Arc<Node>> {
    changes.iter().fold(nodes.to_vec(), |acc, change| {
        apply_node_change(change, acc)
    })
}

fn apply_node_change(change: &NodeChange, mut acc: Vec<Arc<Node>>) -> Vec<Arc<Node>> {
    match change {
        NodeChange::Add(node) => {
            acc.push(Arc::new(node.clone()));
            acc
        }
        NodeChange::Remove(id) => {
            acc.retain(|node| node.id != *id);
            acc
        }
        NodeChange::Reset => Vec::new(),
        NodeChange::Position { id, position } => {
            touch_node(acc, id, |node| node.position = *position)
        }
        NodeChange::Dimensions { id, width, height } => touch_node(acc, id, |node| {
            node.width = Some(*width);
            node.height = Some(*height);
        }),
        NodeChange::Select { id, selected } => {
            touch_node(acc, id, |node| node.selected = *selected)
        }
    }
}

/// Fold an ordered batch of edge changes over the current collection.
#[must_use]
pub fn apply_edge_changes(changes: &[EdgeChange], edges: &[Arc<Edge>]) -> Vec<Arc<Edge>> {
    changes.iter().fold(edges.to_vec(), |mut acc, change| {
        match change {
            EdgeChange::Add(edge) => acc.push(Arc::new(edge.clone())),
            EdgeChange::Remove(id) => acc.retain(|edge| edge.id != *id),
            EdgeChange::Reset => acc = Vec::new(),
            EdgeChange::Select { id, selected } => {
                if let Some(slot) = acc.iter_mut().find(|edge| edge.id == *id) {
                    let mut edge = (**slot).clone();
                    edge.selected = *selected;
                    *slot = Arc::new(edge);
                }
            }
        }
        acc
    })
}

// Copy-on-write merge of a single node; unknown ids fall through untouched.
fn touch_node(
    mut acc: Vec<Arc<Node>>,
    id: &str,
    mutate: impl FnOnce(&mut Node),
) -> Vec<Arc<Node>> {
    if let Some(slot) = acc.iter_mut().find(|node| node.id == id) {
        let mut node = (**slot).clone();
        mutate(&mut node);
        *slot = Arc::new(node);
    }
    acc
}
