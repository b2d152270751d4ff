//! Read-only client for the backend configuration catalog.
//!
//! The editor populates its provider, model, tool, and default-prompt
//! pickers from a REST catalog. [`CatalogApi`] is the seam the panel layer
//! programs against; [`CatalogClient`] is the HTTP implementation. Tests
//! substitute a mock server behind the same base URL.
//!
//! All operations are reads. Failures surface as [`ClientError`] values
//! with diagnostic codes; callers decide whether a picker degrades to an
//! empty list or shows the error.

use async_trait::async_trait;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::node::ProviderKind;

/// Errors from the backend HTTP clients.
#[derive(Debug, Error, Diagnostic)]
pub enum ClientError {
    /// Transport-level failure: connection refused, timeout, TLS.
    #[error(transparent)]
    #[diagnostic(
        code(pipeweave::client::transport),
        help("Check that the backend is running and PIPEWEAVE_API_BASE points at it.")
    )]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status} for {url}")]
    #[diagnostic(code(pipeweave::client::status))]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The response body did not match the expected shape.
    #[error("malformed response from {url}: {source}")]
    #[diagnostic(code(pipeweave::client::decode))]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Base-URL configuration for the backend clients.
///
/// Resolution order: explicit value, then the `PIPEWEAVE_API_BASE`
/// environment variable (a `.env` file is honored), then the development
/// default `http://localhost:8000/api`.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_base: String,
}

impl ClientConfig {
    pub const ENV_VAR: &'static str = "PIPEWEAVE_API_BASE";
    pub const DEFAULT_API_BASE: &'static str = "http://localhost:8000/api";

    /// Configuration with an explicit base URL (trailing slash trimmed).
    #[must_use]
    pub fn new(api_base: impl Into<String>) -> Self {
        let mut api_base = api_base.into();
        while api_base.ends_with('/') {
            api_base.pop();
        }
        Self { api_base }
    }

    /// Resolve the base URL from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        match std::env::var(Self::ENV_VAR) {
            Ok(value) if !value.trim().is_empty() => Self::new(value.trim()),
            _ => Self::new(Self::DEFAULT_API_BASE),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// One configured LLM provider entry, as served by the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmProvider {
    pub alias: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: ProviderKind,
}

/// Model listing for one provider entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<String>,
}

/// One tool definition served by the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRecord {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Default prompt pair for a tool, used to seed a step's agent section.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPrompts {
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub user_prompt: String,
}

/// The catalog read surface the panel layer consumes.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Providers reached over a remote API.
    async fn remote_providers(&self) -> Result<Vec<LlmProvider>, ClientError>;

    /// Providers running locally.
    async fn local_providers(&self) -> Result<Vec<LlmProvider>, ClientError>;

    /// Models available under one provider entry.
    async fn models(&self, kind: ProviderKind, alias: &str) -> Result<ModelList, ClientError>;

    /// All tool definitions.
    async fn tools(&self) -> Result<Vec<ToolRecord>, ClientError>;

    /// Default prompts for one tool.
    async fn tool_prompts(&self, name: &str) -> Result<AgentPrompts, ClientError>;
}

/// HTTP implementation of [`CatalogApi`].
#[derive(Clone, Debug)]
pub struct CatalogClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl CatalogClient {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Client against the environment-resolved base URL.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(ClientConfig::from_env())
    }

    pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
        http: &reqwest::Client,
        config: &ClientConfig,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = config.url(path);
        tracing::debug!(%url, "catalog GET");
        let response = http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { status, url });
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { url, source })
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        Self::get_json(&self.http, &self.config, path).await
    }
}

fn provider_scope(kind: ProviderKind) -> &'static str {
    match kind {
        ProviderKind::Api => "remote",
        ProviderKind::Local => "local",
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn remote_providers(&self) -> Result<Vec<LlmProvider>, ClientError> {
        self.get("llms/remote").await
    }

    async fn local_providers(&self) -> Result<Vec<LlmProvider>, ClientError> {
        self.get("llms/local").await
    }

    async fn models(&self, kind: ProviderKind, alias: &str) -> Result<ModelList, ClientError> {
        self.get(&format!("llms/{}/{alias}/models", provider_scope(kind)))
            .await
    }

    async fn tools(&self) -> Result<Vec<ToolRecord>, ClientError> {
        self.get("tools").await
    }

    async fn tool_prompts(&self, name: &str) -> Result<AgentPrompts, ClientError> {
        self.get(&format!("tools/{name}/prompts")).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_base_url_is_normalized() {
        let config = ClientConfig::new("http://backend:9000/api///");
        assert_eq!(config.api_base, "http://backend:9000/api");
        assert_eq!(config.url("llms/remote"), "http://backend:9000/api/llms/remote");
    }

    #[test]
    fn provider_entries_decode_catalog_shape() {
        let providers: Vec<LlmProvider> = serde_json::from_str(
            r#"[{"alias":"main","provider":"openai","model":"gpt-4o","type":"api"},
                {"alias":"ollama","provider":"ollama","type":"local"}]"#,
        )
        .unwrap();
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].kind, ProviderKind::Api);
        assert_eq!(providers[1].kind, ProviderKind::Local);
        assert_eq!(providers[1].model, None);
    }

    #[test]
    fn prompts_default_missing_fields() {
        let prompts: AgentPrompts = serde_json::from_str(r#"{"systemPrompt":"be terse"}"#).unwrap();
        assert_eq!(prompts.system_prompt, "be terse");
        assert_eq!(prompts.user_prompt, "");
    }
}
