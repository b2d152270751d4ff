//! Node data model for the pipeweave graph engine.
//!
//! A [`Node`] is one vertex of the pipeline graph: an opaque id, a
//! [`NodeKind`] category, a canvas-owned position, and a [`NodeData`]
//! payload holding the user-editable configuration. The payload is
//! polymorphic over the category: LLM-bearing steps carry an
//! [`LlmConfig`] and [`AgentLogic`] section, routers carry a
//! [`FunctionConfig`], pills carry nothing extra.
//!
//! Updates flow through patch types ([`NodePatch`], [`NodeDataPatch`] and
//! the per-section patches) rather than whole-value replacement. A patch
//! only touches the fields it names; everything else is preserved. That
//! merge-not-replace contract is what lets independent editors of
//! different sections (label vs. LLM config vs. prompts) coexist without
//! clobbering each other.
//!
//! # Examples
//!
//! ```rust
//! use pipeweave::node::{LlmPatch, Node, NodeDataPatch, NodePatch, Position};
//! use pipeweave::types::NodeKind;
//!
//! let mut node = Node::new("node-1", NodeKind::Node, Position::new(0.0, 0.0));
//! node.apply(
//!     NodePatch::new().with_data(
//!         NodeDataPatch::new()
//!             .with_label("Summarize")
//!             .with_llm(LlmPatch::new().with_model("gpt-4")),
//!     ),
//! );
//!
//! assert_eq!(node.data.label, "Summarize");
//! assert_eq!(node.data.llm.as_ref().unwrap().model, "gpt-4");
//! // The category invariant holds through any patch.
//! assert_eq!(node.data.kind, node.kind);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::NodeKind;

/// A canvas coordinate. Owned by the rendering collaborator; the store
/// persists whatever the canvas reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Whether an LLM provider is reached over an API or runs locally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Api,
    Local,
}

/// How an LLM step emits its result.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    #[default]
    Text,
    Structured,
}

/// LLM selection for an LLM-bearing step.
///
/// `alias` identifies a configured provider entry in the catalog;
/// `provider` is the vendor name behind it. `model` may be empty while the
/// user has picked a provider but not yet a model.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    pub alias: String,
    pub provider: String,
    pub model: String,
    #[serde(rename = "providerType")]
    pub provider_kind: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// Reference to a tool definition served by the backend catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRef {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Agent-logic configuration of an LLM-bearing step: the selected tool and
/// the prompt/format fields driving it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentLogic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<ToolRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_format: Option<String>,
    #[serde(default)]
    pub output_mode: OutputMode,
}

/// Payload of a plain logic/router step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfig {
    pub name: String,
    pub description: String,
}

/// The user-editable configuration of a node.
///
/// The payload sections present depend on the category; see
/// [`NodeData::for_kind`]. The `kind` field always equals the owning
/// node's `kind` — patches carry no kind, so no update path can de-sync
/// the two.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentLogic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionConfig>,
}

impl NodeData {
    /// Default payload for a category, part of the extension contract in
    /// [`crate::types`]: every category names its sections here.
    #[must_use]
    pub fn for_kind(kind: NodeKind) -> Self {
        let (llm, agent, function) = match kind {
            NodeKind::Node => (
                Some(LlmConfig::default()),
                Some(AgentLogic::default()),
                None,
            ),
            NodeKind::Router => (
                None,
                None,
                Some(FunctionConfig {
                    name: "route".to_string(),
                    description: String::new(),
                }),
            ),
            NodeKind::Trigger | NodeKind::Start | NodeKind::End => (None, None, None),
        };
        Self {
            label: Self::default_label(kind).to_string(),
            description: None,
            kind,
            llm,
            agent,
            function,
        }
    }

    /// Toolbar label for a freshly created node of this category.
    #[must_use]
    pub fn default_label(kind: NodeKind) -> &'static str {
        match kind {
            NodeKind::Node => "New Node",
            NodeKind::Router => "New Router",
            NodeKind::Trigger => "New Trigger",
            NodeKind::Start => "Start",
            NodeKind::End => "End",
        }
    }

    /// Merge a data patch into this payload. Fields absent from the patch
    /// are preserved; section patches merge field-by-field. A section
    /// patch against a node that lacks the section creates it.
    pub fn merge(&mut self, patch: NodeDataPatch) {
        if let Some(label) = patch.label {
            self.label = label;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(llm) = patch.llm {
            llm.merge_into(self.llm.get_or_insert_with(LlmConfig::default));
        }
        if let Some(agent) = patch.agent {
            agent.merge_into(self.agent.get_or_insert_with(AgentLogic::default));
        }
        if let Some(function) = patch.function {
            function.merge_into(self.function.get_or_insert_with(FunctionConfig::default));
        }
    }
}

/// One vertex of the pipeline graph.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub position: Position,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub selected: bool,
    pub data: NodeData,
}

impl Node {
    /// Create a node with the default payload for its category. The
    /// `data.kind == kind` invariant is established here and preserved by
    /// every patch path.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: NodeKind, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
            width: None,
            height: None,
            selected: false,
            data: NodeData::for_kind(kind),
        }
    }

    /// Replace the default label, builder style.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.data.label = label.into();
        self
    }

    /// Apply a patch: top-level fields shallow-merge, `data` deep-merges.
    pub fn apply(&mut self, patch: NodePatch) {
        if let Some(position) = patch.position {
            self.position = position;
        }
        if let Some(width) = patch.width {
            self.width = Some(width);
        }
        if let Some(height) = patch.height {
            self.height = Some(height);
        }
        if let Some(selected) = patch.selected {
            self.selected = selected;
        }
        if let Some(data) = patch.data {
            self.data.merge(data);
        }
    }
}

// ============================================================================
// Patches
// ============================================================================

/// Partial update for a [`Node`]. All fields optional; absent fields are
/// untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodePatch {
    pub position: Option<Position>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub selected: Option<bool>,
    pub data: Option<NodeDataPatch>,
}

impl NodePatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }

    #[must_use]
    pub fn with_data(mut self, data: NodeDataPatch) -> Self {
        self.data = Some(data);
        self
    }
}

/// Partial update for [`NodeData`]. Carries no `kind`: the category of an
/// existing node cannot be changed by patching.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeDataPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub llm: Option<LlmPatch>,
    pub agent: Option<AgentPatch>,
    pub function: Option<FunctionPatch>,
}

impl NodeDataPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_llm(mut self, llm: LlmPatch) -> Self {
        self.llm = Some(llm);
        self
    }

    #[must_use]
    pub fn with_agent(mut self, agent: AgentPatch) -> Self {
        self.agent = Some(agent);
        self
    }

    #[must_use]
    pub fn with_function(mut self, function: FunctionPatch) -> Self {
        self.function = Some(function);
        self
    }
}

/// Partial update for an [`LlmConfig`] section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LlmPatch {
    pub alias: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub provider_kind: Option<ProviderKind>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
}

impl LlmPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    #[must_use]
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    #[must_use]
    pub fn with_provider_kind(mut self, kind: ProviderKind) -> Self {
        self.provider_kind = Some(kind);
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn merge_into(self, config: &mut LlmConfig) {
        if let Some(alias) = self.alias {
            config.alias = alias;
        }
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(kind) = self.provider_kind {
            config.provider_kind = kind;
        }
        if let Some(temperature) = self.temperature {
            config.temperature = Some(temperature);
        }
        if let Some(max_tokens) = self.max_tokens {
            config.max_tokens = Some(max_tokens);
        }
    }
}

/// Partial update for an [`AgentLogic`] section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AgentPatch {
    pub tool: Option<ToolRef>,
    pub system_prompt: Option<String>,
    pub user_prompt: Option<String>,
    pub input_format: Option<String>,
    pub output_mode: Option<OutputMode>,
}

impl AgentPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tool(mut self, tool: ToolRef) -> Self {
        self.tool = Some(tool);
        self
    }

    #[must_use]
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn with_user_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.user_prompt = Some(prompt.into());
        self
    }

    #[must_use]
    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = Some(mode);
        self
    }

    fn merge_into(self, agent: &mut AgentLogic) {
        if let Some(tool) = self.tool {
            agent.tool = Some(tool);
        }
        if let Some(prompt) = self.system_prompt {
            agent.system_prompt = Some(prompt);
        }
        if let Some(prompt) = self.user_prompt {
            agent.user_prompt = Some(prompt);
        }
        if let Some(format) = self.input_format {
            agent.input_format = Some(format);
        }
        if let Some(mode) = self.output_mode {
            agent.output_mode = mode;
        }
    }
}

/// Partial update for a [`FunctionConfig`] section.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FunctionPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl FunctionPatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn merge_into(self, function: &mut FunctionConfig) {
        if let Some(name) = self.name {
            function.name = name;
        }
        if let Some(description) = self.description {
            function.description = description;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn for_kind_seeds_sections_by_category() {
        let llm_step = NodeData::for_kind(NodeKind::Node);
        assert!(llm_step.llm.is_some());
        assert!(llm_step.agent.is_some());
        assert!(llm_step.function.is_none());

        let router = NodeData::for_kind(NodeKind::Router);
        assert!(router.llm.is_none());
        assert!(router.function.is_some());

        for kind in [NodeKind::Trigger, NodeKind::Start, NodeKind::End] {
            let pill = NodeData::for_kind(kind);
            assert!(pill.llm.is_none() && pill.agent.is_none() && pill.function.is_none());
        }
    }

    #[test]
    fn section_patch_preserves_sibling_fields() {
        let mut node = Node::new("node-1", NodeKind::Node, Position::default()).with_label("A");
        node.apply(NodePatch::new().with_data(
            NodeDataPatch::new().with_llm(LlmPatch::new().with_model("x")),
        ));
        node.apply(NodePatch::new().with_data(
            NodeDataPatch::new().with_llm(LlmPatch::new().with_temperature(0.5)),
        ));

        let llm = node.data.llm.as_ref().unwrap();
        assert_eq!(node.data.label, "A");
        assert_eq!(llm.model, "x");
        assert_eq!(llm.temperature, Some(0.5));
    }

    #[test]
    fn patch_cannot_change_category() {
        let mut node = Node::new("router-1", NodeKind::Router, Position::default());
        node.apply(NodePatch::new().with_data(NodeDataPatch::new().with_label("renamed")));
        assert_eq!(node.kind, NodeKind::Router);
        assert_eq!(node.data.kind, NodeKind::Router);
    }

    #[test]
    fn wire_shape_uses_original_field_names() {
        let mut node = Node::new("node-1", NodeKind::Node, Position::new(1.0, 2.0));
        node.data.agent = Some(AgentLogic {
            system_prompt: Some("be brief".into()),
            ..Default::default()
        });
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "node");
        assert_eq!(json["data"]["type"], "node");
        assert_eq!(json["data"]["llm"]["providerType"], "api");
        assert_eq!(json["data"]["agent"]["systemPrompt"], "be brief");
        assert_eq!(json["data"]["agent"]["outputMode"], "text");
    }
}
