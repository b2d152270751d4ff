//! Core types for the pipeweave graph engine.
//!
//! This module defines the closed set of node categories used throughout the
//! system and the category→visual mapping the canvas collaborator renders
//! from. These are the core domain concepts that define what a pipeline
//! graph *is*.
//!
//! # Key Types
//!
//! - [`NodeKind`]: the rendering/behavior category of a node
//! - [`NodeShape`]: how a category is drawn (pill vs. two-handle box)
//!
//! # Extension Contract
//!
//! Adding a new category is a single-place, compile-checked change: a new
//! [`NodeKind`] variant forces updates to every exhaustive `match` in this
//! module and to the default payload constructor in
//! [`NodeData::for_kind`](crate::node::NodeData::for_kind). There is no way
//! to add a category with a missing shape mapping or missing default
//! payload.
//!
//! # Examples
//!
//! ```rust
//! use pipeweave::types::{NodeKind, NodeShape};
//!
//! let start = NodeKind::Start;
//! assert_eq!(start.shape(), NodeShape::Pill);
//! assert!(start.has_source_handle());
//! assert!(!start.has_target_handle());
//!
//! let step = NodeKind::Node;
//! assert_eq!(step.shape(), NodeShape::Box);
//! assert_eq!(step.to_string(), "node");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// The rendering/behavior category of a node in the pipeline graph.
///
/// `NodeKind` is serialized with the lowercase strings the canvas and the
/// persistence backend exchange (`"node"`, `"router"`, `"trigger"`,
/// `"start"`, `"end"`). It appears twice on every node — as the node's own
/// category and inside its `data` payload — and the engine keeps the two in
/// lockstep (see [`Node::new`](crate::node::Node::new)).
///
/// # Examples
///
/// ```rust
/// use pipeweave::types::NodeKind;
///
/// let kind: NodeKind = "router".into();
/// assert_eq!(kind, NodeKind::Router);
/// assert_eq!(serde_json::to_string(&kind).unwrap(), "\"router\"");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// An LLM-bearing pipeline step. Carries the LLM configuration and
    /// agent-logic payload sections.
    Node,

    /// A routing step that dispatches to one of several downstream nodes.
    /// Carries a plain function payload.
    Router,

    /// An externally-triggered step. No extra payload.
    Trigger,

    /// Entry marker of the pipeline. Rendered as a pill with a single
    /// source handle; no extra payload.
    Start,

    /// Exit marker of the pipeline. Rendered as a pill with a single
    /// target handle; no extra payload.
    End,
}

/// How the canvas draws a node category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeShape {
    /// Start/end marker: a pill with one handle side.
    Pill,
    /// Everything else: a box with a target handle on the left and a
    /// source handle on the right.
    Box,
}

impl NodeKind {
    /// All categories, in toolbar order.
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Start,
        NodeKind::Node,
        NodeKind::Router,
        NodeKind::Trigger,
        NodeKind::End,
    ];

    /// The shape the canvas renders this category as.
    #[must_use]
    pub fn shape(&self) -> NodeShape {
        match self {
            NodeKind::Start | NodeKind::End => NodeShape::Pill,
            NodeKind::Node | NodeKind::Router | NodeKind::Trigger => NodeShape::Box,
        }
    }

    /// Whether this category exposes a source handle (outgoing port).
    ///
    /// End nodes have none; edges out of an end node cannot be drawn.
    #[must_use]
    pub fn has_source_handle(&self) -> bool {
        !matches!(self, NodeKind::End)
    }

    /// Whether this category exposes a target handle (incoming port).
    ///
    /// Start nodes have none; edges into a start node cannot be drawn.
    #[must_use]
    pub fn has_target_handle(&self) -> bool {
        !matches!(self, NodeKind::Start)
    }

    /// Returns `true` if this is a [`Start`](Self::Start) node.
    #[must_use]
    pub fn is_start(&self) -> bool {
        matches!(self, Self::Start)
    }

    /// Returns `true` if this is an [`End`](Self::End) node.
    #[must_use]
    pub fn is_end(&self) -> bool {
        matches!(self, Self::End)
    }

    /// The lowercase wire string for this category.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Node => "node",
            NodeKind::Router => "router",
            NodeKind::Trigger => "trigger",
            NodeKind::Start => "start",
            NodeKind::End => "end",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Developer experience: allow using wire strings where a NodeKind is
// expected. Unknown strings fall back to the plain step category.
impl From<&str> for NodeKind {
    fn from(s: &str) -> Self {
        match s {
            "router" => NodeKind::Router,
            "trigger" => NodeKind::Trigger,
            "start" => NodeKind::Start,
            "end" => NodeKind::End,
            _ => NodeKind::Node,
        }
    }
}
