//! Flow persistence: serializing the graph and talking to the flows API.
//!
//! A flow is a named, saved graph. [`SerializedGraph`] is the wholesale
//! snapshot exchanged with the backend; loading one replaces the store's
//! collections without validation, because persisted graphs were valid
//! when saved and the persistence collaborator is trusted.
//!
//! [`FlowsApi`] is the CRUD-plus-codegen surface; [`FlowsClient`] is the
//! HTTP implementation sharing [`ClientConfig`] with the catalog client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogClient, ClientConfig, ClientError};
use crate::edge::Edge;
use crate::node::Node;
use crate::store::FlowStore;

/// Wholesale snapshot of a store's collections, in render order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SerializedGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// A flow as submitted for create/update.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedFlow {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub graph: SerializedGraph,
}

/// A flow as returned by the backend, with its assigned id and timestamps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub graph: SerializedGraph,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl FlowStore {
    /// Snapshot the current graph for persistence.
    #[must_use]
    pub fn serialize_graph(&self) -> SerializedGraph {
        SerializedGraph {
            nodes: self.nodes().iter().map(|node| (**node).clone()).collect(),
            edges: self.edges().iter().map(|edge| (**edge).clone()).collect(),
        }
    }

    /// Replace the store's collections with a persisted graph. Trusted
    /// input: no connection validation or dedup is re-run.
    pub fn load_graph(&mut self, graph: SerializedGraph) {
        self.set_nodes(graph.nodes);
        self.set_edges(graph.edges);
    }
}

/// The flow persistence surface.
#[async_trait]
pub trait FlowsApi: Send + Sync {
    async fn list(&self) -> Result<Vec<FlowRecord>, ClientError>;

    async fn get(&self, id: i64) -> Result<FlowRecord, ClientError>;

    async fn create(&self, flow: &PersistedFlow) -> Result<FlowRecord, ClientError>;

    async fn update(&self, id: i64, flow: &PersistedFlow) -> Result<FlowRecord, ClientError>;

    async fn delete(&self, id: i64) -> Result<FlowRecord, ClientError>;

    /// Generate runnable source for a graph. The output is an opaque
    /// string; the engine never inspects it.
    async fn generate(&self, graph: &SerializedGraph) -> Result<String, ClientError>;
}

/// HTTP implementation of [`FlowsApi`].
#[derive(Clone, Debug)]
pub struct FlowsClient {
    config: ClientConfig,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    graph: &'a SerializedGraph,
}

#[derive(Deserialize)]
struct GenerateResponse {
    code: String,
}

impl FlowsClient {
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

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        CatalogClient::get_json(&self.http, &self.config, path).await
    }

    async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: String,
    ) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Status { status, url });
        }
        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Decode { url, source })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.api_base)
    }
}

#[async_trait]
impl FlowsApi for FlowsClient {
    async fn list(&self) -> Result<Vec<FlowRecord>, ClientError> {
        self.get_json("flows/").await
    }

    async fn get(&self, id: i64) -> Result<FlowRecord, ClientError> {
        self.get_json(&format!("flows/{id}")).await
    }

    async fn create(&self, flow: &PersistedFlow) -> Result<FlowRecord, ClientError> {
        let url = self.url("flows/");
        tracing::debug!(%url, name = %flow.name, "creating flow");
        self.send_json(self.http.post(&url).json(flow), url.clone())
            .await
    }

    async fn update(&self, id: i64, flow: &PersistedFlow) -> Result<FlowRecord, ClientError> {
        let url = self.url(&format!("flows/{id}"));
        tracing::debug!(%url, "updating flow");
        self.send_json(self.http.put(&url).json(flow), url.clone())
            .await
    }

    async fn delete(&self, id: i64) -> Result<FlowRecord, ClientError> {
        let url = self.url(&format!("flows/{id}"));
        tracing::debug!(%url, "deleting flow");
        self.send_json(self.http.delete(&url), url.clone()).await
    }

    async fn generate(&self, graph: &SerializedGraph) -> Result<String, ClientError> {
        let url = self.url("flows/generate");
        let response: GenerateResponse = self
            .send_json(
                self.http.post(&url).json(&GenerateRequest { graph }),
                url.clone(),
            )
            .await?;
        Ok(response.code)
    }
}
