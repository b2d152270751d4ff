//! Edges, connection validation, and edge synthesis.
//!
//! An [`Edge`] is a directed link between two distinct nodes, optionally
//! through named handles (ports). The canvas reports a connect attempt as
//! a [`Connection`]; the engine validates it ([`Connection::is_valid`]),
//! then synthesizes a canonical edge ([`Edge::from_connection`]) whose id
//! is a deterministic composite of the endpoint tuple, so identical
//! connections collapse to one id.
//!
//! Visual metadata (`animated`, `stroke`, `kind`) is cosmetic and plays no
//! part in edge identity.
//!
//! # Examples
//!
//! ```rust
//! use pipeweave::edge::{Connection, Edge};
//!
//! let conn = Connection::between("start-1", "node-1");
//! assert!(conn.is_valid());
//!
//! let edge = Edge::from_connection(&conn).unwrap();
//! assert_eq!(edge.id, "edge-start-1--node-1-");
//!
//! // Self-loops are never legal.
//! assert!(!Connection::between("node-1", "node-1").is_valid());
//! ```

use serde::{Deserialize, Serialize};

/// Default stroke color applied to synthesized edges.
pub const DEFAULT_STROKE: &str = "#4B5563";

/// Default edge kind understood by the canvas.
pub const DEFAULT_EDGE_KIND: &str = "default";

/// A connect attempt as reported by the canvas drag gesture.
///
/// Handles are optional port discriminators; an empty handle string from
/// the canvas normalizes to `None` so that dedup comparisons treat "no
/// handle" uniformly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_handle: Option<String>,
}

impl Connection {
    /// A handle-less connection between two node ids.
    #[must_use]
    pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
            source_handle: None,
            target_handle: None,
        }
    }

    /// Attach a source handle (e.g. a named router output).
    #[must_use]
    pub fn from_handle(mut self, handle: impl Into<String>) -> Self {
        self.source_handle = Some(handle.into());
        self
    }

    /// Attach a target handle.
    #[must_use]
    pub fn to_handle(mut self, handle: impl Into<String>) -> Self {
        self.target_handle = Some(handle.into());
        self
    }

    /// Pure connection predicate. Rejects missing endpoints and
    /// self-loops; any pair of distinct nodes may otherwise connect.
    /// Cycles, fan-in/fan-out, and disconnected components are all legal —
    /// the pipeline graph is intentionally unconstrained here.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        match (&self.source, &self.target) {
            (Some(source), Some(target)) => source != target,
            _ => false,
        }
    }

    /// Source handle with empty strings normalized away.
    #[must_use]
    pub fn normalized_source_handle(&self) -> Option<&str> {
        self.source_handle.as_deref().filter(|h| !h.is_empty())
    }

    /// Target handle with empty strings normalized away.
    #[must_use]
    pub fn normalized_target_handle(&self) -> Option<&str> {
        self.target_handle.as_deref().filter(|h| !h.is_empty())
    }
}

/// A directed connection between two distinct nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub source_handle: Option<String>,
    #[serde(default)]
    pub target_handle: Option<String>,
    /// Canvas edge kind, e.g. `"default"` or `"smoothstep"`. Cosmetic.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub animated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
}

impl Edge {
    /// Synthesize the canonical edge for an accepted connection.
    ///
    /// Returns `None` when either endpoint is missing — the caller drops
    /// the request with no state change. The id is
    /// `edge-{source}-{sourceHandle|''}-{target}-{targetHandle|''}`, so
    /// two requests for the same endpoint tuple produce the same id.
    #[must_use]
    pub fn from_connection(conn: &Connection) -> Option<Self> {
        let source = conn.source.as_deref()?;
        let target = conn.target.as_deref()?;
        let source_handle = conn.normalized_source_handle();
        let target_handle = conn.normalized_target_handle();
        Some(Self {
            id: format!(
                "edge-{source}-{}-{target}-{}",
                source_handle.unwrap_or(""),
                target_handle.unwrap_or(""),
            ),
            source: source.to_string(),
            target: target.to_string(),
            source_handle: source_handle.map(str::to_string),
            target_handle: target_handle.map(str::to_string),
            kind: Some(DEFAULT_EDGE_KIND.to_string()),
            animated: true,
            stroke: Some(DEFAULT_STROKE.to_string()),
            selected: false,
        })
    }

    /// Whether this edge already covers the connection's endpoint tuple
    /// `(source, sourceHandle, target, targetHandle)`, handles normalized.
    #[must_use]
    pub fn same_endpoints(&self, conn: &Connection) -> bool {
        conn.source.as_deref() == Some(self.source.as_str())
            && conn.target.as_deref() == Some(self.target.as_str())
            && conn.normalized_source_handle() == self.source_handle.as_deref()
            && conn.normalized_target_handle() == self.target_handle.as_deref()
    }

    /// Whether the edge references the given node id as source or target.
    /// Cascade deletion in the store is built on this.
    #[must_use]
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }

    /// Apply a cosmetic/selection patch.
    pub fn apply(&mut self, patch: EdgePatch) {
        if let Some(kind) = patch.kind {
            self.kind = Some(kind);
        }
        if let Some(animated) = patch.animated {
            self.animated = animated;
        }
        if let Some(stroke) = patch.stroke {
            self.stroke = Some(stroke);
        }
        if let Some(selected) = patch.selected {
            self.selected = selected;
        }
    }
}

/// Partial update for an [`Edge`]. Identity fields are deliberately
/// absent: endpoints never change after synthesis, only cosmetics do.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgePatch {
    pub kind: Option<String>,
    pub animated: Option<bool>,
    pub stroke: Option<String>,
    pub selected: Option<bool>,
}

impl EdgePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_animated(mut self, animated: bool) -> Self {
        self.animated = Some(animated);
        self
    }

    #[must_use]
    pub fn with_stroke(mut self, stroke: impl Into<String>) -> Self {
        self.stroke = Some(stroke.into());
        self
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_embeds_endpoint_tuple() {
        let edge = Edge::from_connection(
            &Connection::between("router-1", "node-2")
                .from_handle("yes")
                .to_handle("in"),
        )
        .unwrap();
        assert_eq!(edge.id, "edge-router-1-yes-node-2-in");
    }

    #[test]
    fn empty_handles_normalize_to_none() {
        let conn = Connection {
            source: Some("a".into()),
            target: Some("b".into()),
            source_handle: Some(String::new()),
            target_handle: None,
        };
        let edge = Edge::from_connection(&conn).unwrap();
        assert_eq!(edge.source_handle, None);
        assert!(edge.same_endpoints(&Connection::between("a", "b")));
    }

    #[test]
    fn missing_endpoint_aborts_synthesis() {
        let conn = Connection {
            source: Some("a".into()),
            ..Default::default()
        };
        assert!(!conn.is_valid());
        assert!(Edge::from_connection(&conn).is_none());
    }

    #[test]
    fn handles_distinguish_endpoint_tuples() {
        let plain = Edge::from_connection(&Connection::between("a", "b")).unwrap();
        let handled = Connection::between("a", "b").from_handle("out2");
        assert!(!plain.same_endpoints(&handled));
    }
}
