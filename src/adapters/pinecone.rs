use super::http::check_status;
use crate::domain::model::{
    CreateIndexRequest, IndexDescription, Metric, QueryMatch, QueryRequest, Vector,
};
use crate::domain::ports::VectorStore;
use crate::utils::error::{QaError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;

const SERVICE: &str = "Pinecone";

pub const DEFAULT_CONTROL_URL: &str = "https://api.pinecone.io";
pub const DEFAULT_API_VERSION: &str = "2024-07";

#[derive(Debug, Clone)]
pub struct PineconeSettings {
    pub api_key: String,
    pub control_url: String,
    pub api_version: String,
    /// Skips the describe call when the data-plane host is already known.
    pub index_host: Option<String>,
    pub namespace: String,
    pub timeout: Duration,
}

impl PineconeSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            control_url: DEFAULT_CONTROL_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            index_host: None,
            namespace: String::new(),
            timeout: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Deserialize)]
struct IndexList {
    #[serde(default)]
    indexes: Vec<IndexModel>,
}

#[derive(Debug, Deserialize)]
struct IndexModel {
    name: String,
    #[serde(default)]
    dimension: Option<usize>,
    #[serde(default)]
    host: Option<String>,
    #[serde(default)]
    status: Option<IndexStatus>,
}

#[derive(Debug, Deserialize)]
struct IndexStatus {
    #[serde(default)]
    ready: bool,
}

#[derive(Debug, Serialize)]
struct CreateIndexBody<'a> {
    name: &'a str,
    dimension: usize,
    metric: Metric,
    spec: IndexSpec<'a>,
}

#[derive(Debug, Serialize)]
struct IndexSpec<'a> {
    serverless: Serverless<'a>,
}

#[derive(Debug, Serialize)]
struct Serverless<'a> {
    cloud: &'a str,
    region: &'a str,
}

#[derive(Debug, Serialize)]
struct UpsertBody<'a> {
    vectors: &'a [Vector],
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryBody<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    namespace: &'a str,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

/// Pinecone REST client. Index hosts are resolved once per index name.
pub struct PineconeClient {
    settings: PineconeSettings,
    client: Client,
    hosts: Mutex<HashMap<String, String>>,
}

impl PineconeClient {
    pub fn new(settings: PineconeSettings) -> Result<Self> {
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            settings,
            client,
            hosts: Mutex::new(HashMap::new()),
        })
    }

    fn control(&self, path: &str) -> String {
        format!("{}{}", self.settings.control_url.trim_end_matches('/'), path)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Api-Key", &self.settings.api_key)
            .header("X-Pinecone-API-Version", &self.settings.api_version)
    }

    async fn index_host(&self, index_name: &str) -> Result<String> {
        if let Some(host) = &self.settings.index_host {
            return Ok(normalize_host(host));
        }
        if let Some(host) = self.hosts.lock().await.get(index_name) {
            return Ok(host.clone());
        }

        let description = self.describe_index(index_name).await?;
        let host = description
            .host
            .filter(|h| !h.is_empty())
            .map(|h| normalize_host(&h))
            .ok_or_else(|| QaError::ProcessingError {
                message: format!("Index '{}' has no host yet", index_name),
            })?;

        tracing::debug!("Resolved host for {}: {}", index_name, host);
        self.hosts
            .lock()
            .await
            .insert(index_name.to_string(), host.clone());
        Ok(host)
    }
}

/// Describe responses return a bare hostname.
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

#[async_trait]
impl VectorStore for PineconeClient {
    async fn list_indexes(&self) -> Result<Vec<String>> {
        let response = self
            .authed(self.client.get(self.control("/indexes")))
            .send()
            .await?;
        let list: IndexList = check_status(SERVICE, response).await?.json().await?;
        Ok(list.indexes.into_iter().map(|i| i.name).collect())
    }

    async fn create_index(&self, request: &CreateIndexRequest) -> Result<()> {
        let body = CreateIndexBody {
            name: &request.name,
            dimension: request.dimension,
            metric: request.metric,
            spec: IndexSpec {
                serverless: Serverless {
                    cloud: &request.cloud,
                    region: &request.region,
                },
            },
        };
        let response = self
            .authed(self.client.post(self.control("/indexes")))
            .json(&body)
            .send()
            .await?;
        check_status(SERVICE, response).await?;
        Ok(())
    }

    async fn describe_index(&self, name: &str) -> Result<IndexDescription> {
        let response = self
            .authed(self.client.get(self.control(&format!("/indexes/{}", name))))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(QaError::IndexNotFound {
                name: name.to_string(),
            });
        }

        let model: IndexModel = check_status(SERVICE, response).await?.json().await?;
        Ok(IndexDescription {
            name: model.name,
            dimension: model.dimension,
            host: model.host,
            ready: model.status.map(|s| s.ready).unwrap_or(false),
        })
    }

    async fn upsert(&self, index_name: &str, vectors: &[Vector]) -> Result<usize> {
        let host = self.index_host(index_name).await?;
        let response = self
            .authed(self.client.post(format!("{}/vectors/upsert", host)))
            .json(&UpsertBody {
                vectors,
                namespace: &self.settings.namespace,
            })
            .send()
            .await?;
        let body: UpsertResponse = check_status(SERVICE, response).await?.json().await?;
        // Some deployments answer `{}`; count what was sent then.
        Ok(body.upserted_count.unwrap_or(vectors.len()))
    }

    async fn query(&self, index_name: &str, request: &QueryRequest) -> Result<Vec<QueryMatch>> {
        let host = self.index_host(index_name).await?;
        let response = self
            .authed(self.client.post(format!("{}/query", host)))
            .json(&QueryBody {
                vector: &request.vector,
                top_k: request.top_k,
                include_metadata: request.include_metadata,
                include_values: request.include_values,
                namespace: &self.settings.namespace,
            })
            .send()
            .await?;
        let body: QueryResponse = check_status(SERVICE, response).await?.json().await?;
        Ok(body.matches)
    }
}
