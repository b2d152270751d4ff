//! The canonical graph store.
//!
//! [`FlowStore`] is the single owner of the node and edge collections;
//! every other component mutates the graph through it. It is an explicit
//! object — create one per editor (or per test) with [`FlowStore::new`];
//! there is no ambient global instance.
//!
//! Mutation contract (see also [`crate::changes`]):
//!
//! - All operations are non-throwing. Operations naming an absent id are
//!   no-ops, and invalid or duplicate connection attempts are silently
//!   dropped (logged at debug level) to keep drag-connect interactions
//!   fluid.
//! - Every mutation is copy-on-write per touched entity: collections hold
//!   `Arc`s, and only entities a mutation actually changes get a new
//!   allocation. The canvas's reference-equality change detection depends
//!   on this.
//! - Removing a node cascades to every edge referencing it.
//!
//! # Examples
//!
//! ```rust
//! use pipeweave::edge::Connection;
//! use pipeweave::node::Position;
//! use pipeweave::store::FlowStore;
//! use pipeweave::types::NodeKind;
//!
//! let mut store = FlowStore::new();
//! let start = store.new_node(NodeKind::Start, Position::new(0.0, 0.0));
//! let step = store.new_node(NodeKind::Node, Position::new(200.0, 0.0));
//!
//! store.on_connect(Connection::between(&start.id, &step.id));
//! assert_eq!(store.edges().len(), 1);
//!
//! // Connecting the same endpoints again is idempotent.
//! store.on_connect(Connection::between(&start.id, &step.id));
//! assert_eq!(store.edges().len(), 1);
//!
//! // Removing a node cascades to its edges.
//! store.remove_node(&step.id);
//! assert!(store.edges().is_empty());
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use rustc_hash::FxHashMap;
use uuid::Uuid;

use crate::changes::{self, EdgeChange, NodeChange};
use crate::edge::{Connection, Edge, EdgePatch};
use crate::node::{Node, NodePatch, Position};
use crate::types::NodeKind;

/// Issues collision-free node ids of the form `{kind}-{n}`.
///
/// The counter is monotonic per store, so rapid programmatic creation
/// never produces duplicate ids (unlike timestamp-derived schemes).
/// [`IdGenerator::random_id`] is the fallback for callers that need ids
/// unique across stores.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next sequential id for the given category, e.g. `node-3`.
    pub fn next_id(&self, kind: NodeKind) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{kind}-{n}")
    }

    /// A globally unique id for the given category, e.g.
    /// `node-5e93…`. Use when ids may be merged across stores.
    #[must_use]
    pub fn random_id(kind: NodeKind) -> String {
        format!("{kind}-{}", Uuid::new_v4())
    }
}

/// The canonical in-memory collection of all nodes and edges.
///
/// Both collections are insertion-ordered arenas with id indexes, so
/// lookups are O(1) and cascades are O(E). The render arrays handed to
/// the canvas are the arenas themselves, in order.
#[derive(Debug, Default)]
pub struct FlowStore {
    nodes: Vec<Arc<Node>>,
    edges: Vec<Arc<Edge>>,
    node_index: FxHashMap<String, usize>,
    edge_index: FxHashMap<String, usize>,
    ids: IdGenerator,
}

impl FlowStore {
    /// Creates an empty store. Each editor instance (and each test) gets
    /// its own.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The render array of nodes, in insertion order.
    #[must_use]
    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    /// The render array of edges, in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Arc<Edge>] {
        &self.edges
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: &str) -> Option<&Arc<Node>> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Look up an edge by id.
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&Arc<Edge>> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    /// The currently selected node, if any. Selection is single in
    /// practice; with multiple flags set the first in render order wins.
    #[must_use]
    pub fn find_selected_node(&self) -> Option<&Arc<Node>> {
        self.nodes.iter().find(|node| node.selected)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    // ------------------------------------------------------------------
    // Wholesale replacement (trusted input from persistence)
    // ------------------------------------------------------------------

    /// Replace the node collection wholesale. No validation is performed;
    /// the persistence collaborator is trusted.
    pub fn set_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes.into_iter().map(Arc::new).collect();
        self.reindex_nodes();
    }

    /// Replace the edge collection wholesale. No validation is performed.
    pub fn set_edges(&mut self, edges: Vec<Edge>) {
        self.edges = edges.into_iter().map(Arc::new).collect();
        self.reindex_edges();
    }

    // ------------------------------------------------------------------
    // Node operations
    // ------------------------------------------------------------------

    /// Append a well-formed node. The caller supplies id, category,
    /// position, and data already consistent; no duplicate-id check is
    /// performed (ids from [`IdGenerator`] cannot collide).
    pub fn add_node(&mut self, node: Node) {
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(Arc::new(node));
    }

    /// Create, append, and return a node with a fresh id and the default
    /// payload for its category (the toolbar "add node" path).
    pub fn new_node(&mut self, kind: NodeKind, position: Position) -> Arc<Node> {
        let node = Arc::new(Node::new(self.ids.next_id(kind), kind, position));
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(Arc::clone(&node));
        node
    }

    /// Merge a patch into the node with this id. Absent id is a no-op,
    /// not an error. Top-level fields shallow-merge; `data` deep-merges,
    /// preserving fields the patch does not name.
    pub fn update_node(&mut self, id: &str, patch: NodePatch) {
        let Some(&i) = self.node_index.get(id) else {
            tracing::debug!(id, "update_node: no such node, ignoring");
            return;
        };
        let mut node = (*self.nodes[i]).clone();
        node.apply(patch);
        self.nodes[i] = Arc::new(node);
    }

    /// Remove the node with this id and every edge referencing it as
    /// source or target. Absent id is a no-op.
    pub fn remove_node(&mut self, id: &str) {
        if !self.node_index.contains_key(id) {
            return;
        }
        self.nodes.retain(|node| node.id != id);
        self.edges.retain(|edge| !edge.touches(id));
        self.reindex_nodes();
        self.reindex_edges();
    }

    // ------------------------------------------------------------------
    // Edge operations
    // ------------------------------------------------------------------

    /// Validate a connection attempt, synthesize the canonical edge, and
    /// append it unless an edge with the same endpoint tuple exists.
    /// Rejections and duplicates leave state unchanged and are dropped
    /// silently; drag-connect UX surfaces no error.
    pub fn add_edge(&mut self, conn: Connection) {
        if conn.source.is_none() || conn.target.is_none() {
            tracing::warn!(?conn, "cannot create edge: source or target is missing");
            return;
        }
        if !conn.is_valid() {
            tracing::debug!(?conn, "rejected connection");
            return;
        }
        if self.edges.iter().any(|edge| edge.same_endpoints(&conn)) {
            tracing::debug!(?conn, "duplicate connection, keeping existing edge");
            return;
        }
        let Some(edge) = Edge::from_connection(&conn) else {
            return;
        };
        self.insert_edge(edge);
    }

    /// The canvas connect-attempt callback. Alias for [`add_edge`](Self::add_edge).
    pub fn on_connect(&mut self, conn: Connection) {
        self.add_edge(conn);
    }

    /// Append an already-synthesized edge verbatim (canvas `add` change
    /// records and trusted loads). No validation.
    pub fn insert_edge(&mut self, edge: Edge) {
        self.edge_index.insert(edge.id.clone(), self.edges.len());
        self.edges.push(Arc::new(edge));
    }

    /// Merge a cosmetic patch into the edge with this id; no-op if absent.
    pub fn update_edge(&mut self, id: &str, patch: EdgePatch) {
        let Some(&i) = self.edge_index.get(id) else {
            tracing::debug!(id, "update_edge: no such edge, ignoring");
            return;
        };
        let mut edge = (*self.edges[i]).clone();
        edge.apply(patch);
        self.edges[i] = Arc::new(edge);
    }

    /// Remove the edge with this id; no-op if absent.
    pub fn remove_edge(&mut self, id: &str) {
        if !self.edge_index.contains_key(id) {
            return;
        }
        self.edges.retain(|edge| edge.id != id);
        self.reindex_edges();
    }

    // ------------------------------------------------------------------
    // Canvas change batches
    // ------------------------------------------------------------------

    /// Fold an ordered node change batch into the store
    /// (the `onNodesChange` callback).
    pub fn apply_node_changes(&mut self, batch: &[NodeChange]) {
        self.nodes = changes::apply_node_changes(batch, &self.nodes);
        self.reindex_nodes();
    }

    /// Fold an ordered edge change batch into the store
    /// (the `onEdgesChange` callback).
    pub fn apply_edge_changes(&mut self, batch: &[EdgeChange]) {
        self.edges = changes::apply_edge_changes(batch, &self.edges);
        self.reindex_edges();
    }

    // ------------------------------------------------------------------

    fn reindex_nodes(&mut self) {
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.clone(), i))
            .collect();
    }

    fn reindex_edges(&mut self) {
        self.edge_index = self
            .edges
            .iter()
            .enumerate()
            .map(|(i, edge)| (edge.id.clone(), i))
            .collect();
    }
}
