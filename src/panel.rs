//! Property-panel synchronization protocol.
//!
//! The side panel edits the configuration of the currently selected node
//! against a local draft, not against the store. [`PanelSession`] mediates
//! between the two:
//!
//! - Selecting a node snapshots its editable fields into a [`NodeDraft`]
//!   and records the snapshot as the last-written values.
//! - Edits mutate only the draft.
//! - [`PanelSession::flush`] compares the whole draft against the
//!   last-written snapshot and, only when something differs, performs a
//!   single batched [`update_node`](crate::store::FlowStore::update_node)
//!   carrying every draft field, then advances the snapshot.
//!
//! This shape rules out the two classic failure modes: a two-way binding
//! that rewrites the store on every render (the flush is a no-op when the
//! draft equals what was last written), and lost sibling fields (the
//! store merge in [`crate::node`] never replaces sections wholesale).
//!
//! Asynchronous catalog lookups (providers, models, default prompts) race
//! selection changes; [`FetchGuard`] issues generation-stamped tickets so
//! a late response for a previous selection is discarded instead of
//! applied.
//!
//! # Examples
//!
//! ```rust
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
//!
//! // Nothing edited yet: flushing writes nothing.
//! assert_eq!(panel.flush(&mut store), FlushOutcome::Clean);
//!
//! panel.draft_mut().unwrap().label = "Classify".to_string();
//! assert_eq!(panel.flush(&mut store), FlushOutcome::Written);
//! assert_eq!(store.node(&node.id).unwrap().data.label, "Classify");
//!
//! // Same draft again: no redundant write.
//! assert_eq!(panel.flush(&mut store), FlushOutcome::Clean);
//! ```

use crate::node::{
    AgentPatch, FunctionPatch, LlmPatch, Node, NodeDataPatch, NodePatch, OutputMode, ProviderKind,
    ToolRef,
};
use crate::store::FlowStore;

/// Editable snapshot of an LLM section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LlmDraft {
    pub alias: String,
    pub provider: String,
    pub model: String,
    pub provider_kind: ProviderKind,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

/// Editable snapshot of an agent-logic section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentDraft {
    pub tool: Option<ToolRef>,
    pub system_prompt: String,
    pub user_prompt: String,
    pub input_format: String,
    pub output_mode: OutputMode,
}

/// Editable snapshot of a function section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionDraft {
    pub name: String,
    pub description: String,
}

/// The panel's locally-edited copy of a selected node's configuration.
///
/// Sections mirror the node: a draft for a router carries no LLM section,
/// so flushing it can never conjure one onto the node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeDraft {
    pub label: String,
    pub description: String,
    pub llm: Option<LlmDraft>,
    pub agent: Option<AgentDraft>,
    pub function: Option<FunctionDraft>,
}

impl NodeDraft {
    /// Snapshot the editable fields of a node.
    #[must_use]
    pub fn from_node(node: &Node) -> Self {
        Self {
            label: node.data.label.clone(),
            description: node.data.description.clone().unwrap_or_default(),
            llm: node.data.llm.as_ref().map(|llm| LlmDraft {
                alias: llm.alias.clone(),
                provider: llm.provider.clone(),
                model: llm.model.clone(),
                provider_kind: llm.provider_kind,
                temperature: llm.temperature,
                max_tokens: llm.max_tokens,
            }),
            agent: node.data.agent.as_ref().map(|agent| AgentDraft {
                tool: agent.tool.clone(),
                system_prompt: agent.system_prompt.clone().unwrap_or_default(),
                user_prompt: agent.user_prompt.clone().unwrap_or_default(),
                input_format: agent.input_format.clone().unwrap_or_default(),
                output_mode: agent.output_mode,
            }),
            function: node.data.function.as_ref().map(|function| FunctionDraft {
                name: function.name.clone(),
                description: function.description.clone(),
            }),
        }
    }

    /// The single batched patch carrying every draft field.
    #[must_use]
    pub fn to_patch(&self) -> NodePatch {
        let mut data = NodeDataPatch::new()
            .with_label(self.label.clone())
            .with_description(self.description.clone());
        if let Some(llm) = &self.llm {
            let mut patch = LlmPatch::new()
                .with_alias(llm.alias.clone())
                .with_provider(llm.provider.clone())
                .with_model(llm.model.clone())
                .with_provider_kind(llm.provider_kind);
            patch.temperature = llm.temperature;
            patch.max_tokens = llm.max_tokens;
            data = data.with_llm(patch);
        }
        if let Some(agent) = &self.agent {
            let mut patch = AgentPatch::new()
                .with_system_prompt(agent.system_prompt.clone())
                .with_user_prompt(agent.user_prompt.clone())
                .with_output_mode(agent.output_mode);
            patch.input_format = Some(agent.input_format.clone());
            patch.tool = agent.tool.clone();
            data = data.with_agent(patch);
        }
        if let Some(function) = &self.function {
            data = data.with_function(
                FunctionPatch::new()
                    .with_name(function.name.clone())
                    .with_description(function.description.clone()),
            );
        }
        NodePatch::new().with_data(data)
    }
}

/// Result of a [`PanelSession::flush`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlushOutcome {
    /// No node selected; nothing to write.
    Idle,
    /// Draft equals the last-written values; no write performed.
    Clean,
    /// One batched `update_node` was performed.
    Written,
}

#[derive(Debug, Default)]
enum PanelState {
    #[default]
    Idle,
    Loaded {
        node_id: String,
        draft: NodeDraft,
        last_written: NodeDraft,
    },
}

/// Per-panel editing session: selection tracking, draft state, flush
/// loop guard, and the stale-fetch guard.
#[derive(Debug, Default)]
pub struct PanelSession {
    state: PanelState,
    fetches: FetchGuard,
}

impl PanelSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The id of the node the panel is editing, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&str> {
        match &self.state {
            PanelState::Idle => None,
            PanelState::Loaded { node_id, .. } => Some(node_id),
        }
    }

    /// Track a selection change.
    ///
    /// When the selected identity actually changes, the draft is
    /// re-snapshotted from the store (stale draft state never carries
    /// across selections) and all outstanding fetch tickets are
    /// invalidated. Re-selecting the current node keeps the draft as-is.
    /// Selecting an id the store does not know lands in the idle state.
    pub fn select(&mut self, store: &FlowStore, id: Option<&str>) {
        if self.selected_id() == id {
            return;
        }
        self.fetches.invalidate();
        self.state = match id.and_then(|id| store.node(id)) {
            Some(node) => {
                let draft = NodeDraft::from_node(node);
                PanelState::Loaded {
                    node_id: node.id.clone(),
                    last_written: draft.clone(),
                    draft,
                }
            }
            None => PanelState::Idle,
        };
    }

    /// The current draft, when a node is selected.
    #[must_use]
    pub fn draft(&self) -> Option<&NodeDraft> {
        match &self.state {
            PanelState::Idle => None,
            PanelState::Loaded { draft, .. } => Some(draft),
        }
    }

    /// Mutable access to the draft for field edits. Edits touch only the
    /// draft; call [`flush`](Self::flush) to propagate them.
    pub fn draft_mut(&mut self) -> Option<&mut NodeDraft> {
        match &mut self.state {
            PanelState::Idle => None,
            PanelState::Loaded { draft, .. } => Some(draft),
        }
    }

    /// Write the draft back to the store iff it differs from what was
    /// last written, as one batched update carrying all draft fields.
    ///
    /// A selected node that has since been removed from the store drops
    /// the session to idle instead of pretending a write happened.
    pub fn flush(&mut self, store: &mut FlowStore) -> FlushOutcome {
        let gone = matches!(
            &self.state,
            PanelState::Loaded { node_id, .. } if store.node(node_id).is_none()
        );
        if gone {
            self.state = PanelState::Idle;
            return FlushOutcome::Idle;
        }
        let PanelState::Loaded {
            node_id,
            draft,
            last_written,
        } = &mut self.state
        else {
            return FlushOutcome::Idle;
        };
        if draft == last_written {
            return FlushOutcome::Clean;
        }
        store.update_node(node_id, draft.to_patch());
        *last_written = draft.clone();
        FlushOutcome::Written
    }

    /// Re-snapshot the draft from the store's current state of the
    /// selected node, discarding unflushed edits. Used when another code
    /// path rewrote the node while the panel was open. A node that has
    /// disappeared drops the session back to idle.
    pub fn refresh(&mut self, store: &FlowStore) {
        let PanelState::Loaded { node_id, .. } = &self.state else {
            return;
        };
        self.state = match store.node(node_id) {
            Some(node) => {
                let draft = NodeDraft::from_node(node);
                PanelState::Loaded {
                    node_id: node.id.clone(),
                    last_written: draft.clone(),
                    draft,
                }
            }
            None => PanelState::Idle,
        };
    }

    /// The stale-response guard for this session's catalog lookups.
    #[must_use]
    pub fn fetches(&self) -> &FetchGuard {
        &self.fetches
    }

    /// Invalidate outstanding fetch tickets without changing selection
    /// (e.g. the user switched provider, making the in-flight model list
    /// irrelevant).
    pub fn invalidate_fetches(&mut self) {
        self.fetches.invalidate();
    }
}

/// Generation counter guarding against stale asynchronous responses.
///
/// Issue a ticket when starting a request; when the response arrives,
/// [`admit`](Self::admit) tells you whether the world has moved on in the
/// meantime. There is no cancellation of the underlying request — late
/// results are simply discarded.
///
/// ```rust
/// use pipeweave::panel::FetchGuard;
///
/// let mut guard = FetchGuard::default();
/// let ticket = guard.issue("models:openai");
/// guard.invalidate(); // selection changed mid-flight
/// assert!(!guard.admit(&ticket));
/// ```
#[derive(Debug, Default)]
pub struct FetchGuard {
    generation: u64,
}

/// A generation-stamped token for one in-flight request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
    key: String,
    generation: u64,
}

impl FetchTicket {
    /// The request key the ticket was issued for (diagnostics only).
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FetchGuard {
    /// Stamp a ticket for a request starting now.
    #[must_use]
    pub fn issue(&self, key: impl Into<String>) -> FetchTicket {
        FetchTicket {
            key: key.into(),
            generation: self.generation,
        }
    }

    /// Whether a response carrying this ticket may still be applied.
    #[must_use]
    pub fn admit(&self, ticket: &FetchTicket) -> bool {
        let fresh = ticket.generation == self.generation;
        if !fresh {
            tracing::debug!(key = ticket.key(), "discarding stale response");
        }
        fresh
    }

    /// Invalidate every outstanding ticket.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Position;
    use crate::types::NodeKind;

    #[test]
    fn router_draft_carries_no_llm_section() {
        let mut store = FlowStore::new();
        let router = store.new_node(NodeKind::Router, Position::default());
        let draft = NodeDraft::from_node(&router);
        assert!(draft.llm.is_none());
        assert!(draft.function.is_some());

        // Flushing the draft must not conjure an LLM section.
        let mut panel = PanelSession::new();
        panel.select(&store, Some(&router.id));
        panel.draft_mut().unwrap().label = "Route by topic".to_string();
        assert_eq!(panel.flush(&mut store), FlushOutcome::Written);
        assert!(store.node(&router.id).unwrap().data.llm.is_none());
    }

    #[test]
    fn reselecting_same_node_keeps_unflushed_draft() {
        let mut store = FlowStore::new();
        let node = store.new_node(NodeKind::Node, Position::default());
        let mut panel = PanelSession::new();
        panel.select(&store, Some(&node.id));
        panel.draft_mut().unwrap().label = "edited".to_string();
        panel.select(&store, Some(&node.id));
        assert_eq!(panel.draft().unwrap().label, "edited");
    }

    #[test]
    fn selecting_unknown_id_goes_idle() {
        let store = FlowStore::new();
        let mut panel = PanelSession::new();
        panel.select(&store, Some("ghost"));
        assert_eq!(panel.selected_id(), None);
        assert!(panel.draft().is_none());
    }

    #[test]
    fn tickets_survive_unrelated_time_but_not_invalidation() {
        let mut guard = FetchGuard::default();
        let ticket = guard.issue("providers:remote");
        assert!(guard.admit(&ticket));
        guard.invalidate();
        assert!(!guard.admit(&ticket));
        let fresh = guard.issue("providers:remote");
        assert!(guard.admit(&fresh));
    }
}
