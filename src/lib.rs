//! # Pipeweave: Graph State Engine for Visual Pipeline Editing
//!
//! Pipeweave is the headless state engine behind a visual AI-pipeline
//! editor: it owns the canonical node/edge graph, folds canvas change
//! batches into it, validates and synthesizes connections, keeps the
//! property panel's draft in sync, and talks to the backend catalog and
//! flow-persistence APIs.
//!
//! ## Core Concepts
//!
//! - **Store**: [`store::FlowStore`] is the single owner of the graph;
//!   every mutation is copy-on-write per touched entity and non-throwing
//! - **Changes**: ordered canvas change batches fold left-to-right
//!   ([`changes`])
//! - **Connections**: drag-connect attempts are validated and collapsed
//!   onto deterministic edge ids ([`edge`])
//! - **Panel**: a draft-and-flush protocol batches property edits into
//!   single store writes ([`panel`])
//! - **Persistence**: wholesale graph snapshots round-trip through the
//!   flows API ([`flows`]); pickers populate from the catalog
//!   ([`catalog`])
//!
//! ## Quick Start
//!
//! ### Building a graph
//!
//! ```
//! use pipeweave::edge::Connection;
//! use pipeweave::node::Position;
//! use pipeweave::store::FlowStore;
//! use pipeweave::types::NodeKind;
//!
//! let mut store = FlowStore::new();
//! let start = store.new_node(NodeKind::Start, Position::new(0.0, 100.0));
//! let classify = store.new_node(NodeKind::Node, Position::new(250.0, 100.0));
//! let done = store.new_node(NodeKind::End, Position::new(500.0, 100.0));
//!
//! store.on_connect(Connection::between(&start.id, &classify.id));
//! store.on_connect(Connection::between(&classify.id, &done.id));
//!
//! assert_eq!(store.nodes().len(), 3);
//! assert_eq!(store.edges().len(), 2);
//!
//! // Deleting a node takes its edges with it.
//! store.remove_node(&classify.id);
//! assert!(store.edges().is_empty());
//! ```
//!
//! ### Editing node properties
//!
//! ```
//! use pipeweave::node::Position;
//! use pipeweave::panel::{FlushOutcome, PanelSession};
//! use pipeweave::store::FlowStore;
//! use pipeweave::types::NodeKind;
//!
//! let mut store = FlowStore::new();
//! let node = store.new_node(NodeKind::Node, Position::default());
//!
//! let mut panel = PanelSession::new();
//! panel.select(&store, Some(&node.id));
//! if let Some(draft) = panel.draft_mut() {
//!     draft.label = "Summarize".to_string();
//!     if let Some(llm) = draft.llm.as_mut() {
//!         llm.model = "gpt-4o".to_string();
//!     }
//! }
//!
//! // One batched write, only because something changed.
//! assert_eq!(panel.flush(&mut store), FlushOutcome::Written);
//! assert_eq!(panel.flush(&mut store), FlushOutcome::Clean);
//! ```
//!
//! ### Saving and restoring
//!
//! ```
//! use pipeweave::store::FlowStore;
//! use pipeweave::node::Position;
//! use pipeweave::types::NodeKind;
//!
//! let mut store = FlowStore::new();
//! store.new_node(NodeKind::Start, Position::default());
//!
//! let snapshot = store.serialize_graph();
//! let mut restored = FlowStore::new();
//! restored.load_graph(snapshot.clone());
//! assert_eq!(restored.serialize_graph(), snapshot);
//! ```
//!
//! ## Module Guide
//!
//! - [`types`]: node categories and their handle/shape contract
//! - [`node`]: the node data model and its patch types
//! - [`edge`]: connections, validation, edge synthesis
//! - [`changes`]: canvas change-batch folding
//! - [`store`]: the canonical graph store
//! - [`panel`]: property-panel draft/flush protocol and stale-fetch guard
//! - [`catalog`]: backend catalog client (providers, models, tools)
//! - [`flows`]: graph serialization and the flow persistence client
//! - [`telemetry`]: tracing subscriber setup for binaries and tests

pub mod catalog;
pub mod changes;
pub mod edge;
pub mod flows;
pub mod node;
pub mod panel;
pub mod store;
pub mod telemetry;
pub mod types;
