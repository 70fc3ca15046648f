//! Pinecone index over its REST data plane

use super::{EntryMetadata, IndexEntry, ScoredEntry, VectorIndex};
use crate::config::IndexConfig;
use crate::error::{Result, SatPrepError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

const CONTROL_PLANE_URL: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2024-07";

/// Pinecone limits upsert requests to 1000 vectors; smaller batches keep
/// request bodies well under the 2 MB cap with 1536-dim embeddings.
const UPSERT_BATCH_SIZE: usize = 100;

/// Client for one Pinecone index
pub struct PineconeIndex {
    http_client: reqwest::Client,
    name: String,
    host: String,
    api_key: String,
    namespace: Option<String>,
}

#[derive(Serialize)]
struct UpsertVector<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: Map<String, Value>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<UpsertVector<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
    vector: &'a [f32],
    top_k: usize,
    include_metadata: bool,
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct DescribeIndexResponse {
    host: String,
}

impl PineconeIndex {
    /// Create a client for a known data-plane host
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        api_key: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            http_client,
            name: name.into(),
            host: normalize_host(&host.into()),
            api_key: api_key.into(),
            namespace: None,
        })
    }

    /// Store and query within a namespace
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|n| !n.is_empty());
        self
    }

    /// Build a client from configuration, asking the control plane for the
    /// index host when it is not configured.
    pub async fn connect(config: &IndexConfig, timeout_secs: u64) -> Result<Self> {
        let name = config
            .name
            .clone()
            .ok_or_else(|| SatPrepError::Config("missing required setting: INDEX_NAME".into()))?;
        let api_key = config.api_key.clone().ok_or_else(|| {
            SatPrepError::Config("missing required setting: PINECONE_API_KEY".into())
        })?;

        let host = match &config.host {
            Some(host) => host.clone(),
            None => describe_index_host(&name, &api_key, timeout_secs).await?,
        };

        Ok(Self::new(name, host, api_key, timeout_secs)?.with_namespace(config.namespace.clone()))
    }

    /// Data-plane base URL
    pub fn host(&self) -> &str {
        &self.host
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.host, path);
        let response = self
            .http_client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SatPrepError::Index(format!(
                "Pinecone {} failed (HTTP {}): {}",
                path, status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    fn name(&self) -> &str {
        &self.name
    }

    /// Batches are independent requests. When one fails, the batches
    /// already sent stay in the index.
    async fn upsert(&self, entries: &[IndexEntry]) -> Result<()> {
        for batch in entries.chunks(UPSERT_BATCH_SIZE) {
            let request = UpsertRequest {
                vectors: batch
                    .iter()
                    .map(|e| UpsertVector {
                        id: &e.id,
                        values: &e.embedding,
                        metadata: e.metadata.to_map(&e.text),
                    })
                    .collect(),
                namespace: self.namespace.as_deref(),
            };
            self.post("/vectors/upsert", &request).await?;
            tracing::debug!(index = %self.name, vectors = batch.len(), "upserted batch");
        }
        Ok(())
    }

    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredEntry>> {
        let request = QueryRequest {
            vector: embedding,
            top_k,
            include_metadata: true,
            include_values: false,
            namespace: self.namespace.as_deref(),
        };

        let response: QueryResponse = self.post("/query", &request).await?.json().await?;

        let mut results: Vec<ScoredEntry> = response
            .matches
            .into_iter()
            .map(scored_from_match)
            .collect();
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(top_k);
        Ok(results)
    }
}

fn scored_from_match(m: QueryMatch) -> ScoredEntry {
    let metadata = m.metadata.unwrap_or_default();
    let text = metadata
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    ScoredEntry {
        id: m.id,
        text,
        metadata: EntryMetadata::from_map(&metadata),
        score: m.score,
    }
}

async fn describe_index_host(name: &str, api_key: &str, timeout_secs: u64) -> Result<String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;

    let url = format!("{}/indexes/{}", CONTROL_PLANE_URL, name);
    let response = client
        .get(&url)
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(SatPrepError::Index(format!(
            "could not describe Pinecone index '{}' (HTTP {}): {}",
            name, status, body
        )));
    }

    let described: DescribeIndexResponse = response.json().await?;
    tracing::debug!(index = name, host = %described.host, "resolved Pinecone host");
    Ok(described.host)
}

/// Hosts come back from the control plane without a scheme
fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
