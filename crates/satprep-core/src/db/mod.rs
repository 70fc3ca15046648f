//! Vector index layer
//!
//! [`VectorIndex`] is the capability both pipelines share:
//! - Pinecone over its REST data plane
//! - a local SQLite file with brute-force cosine similarity
//!
//! Entries are append-only from this crate's point of view. Nothing here
//! deduplicates: every entry carries a fresh random id, so ingesting the
//! same document twice stores it twice.

mod pinecone;
mod schema;
pub mod vectors;

pub use pinecone::PineconeIndex;
pub use schema::SqliteIndex;

use crate::config::{Config, IndexBackend};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Storage backend for embeddings with nearest-neighbour search
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Index name
    fn name(&self) -> &str;

    /// Store a batch of entries
    async fn upsert(&self, entries: &[IndexEntry]) -> Result<()>;

    /// Up to `top_k` entries most similar to `embedding`, best first
    async fn query(&self, embedding: &[f32], top_k: usize) -> Result<Vec<ScoredEntry>>;
}

/// Provenance stored alongside each chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryMetadata {
    /// Source file path
    pub source: String,
    /// Character offset of the chunk within the document
    pub position: usize,
    /// Chunk sequence number within the document
    pub seq: usize,
    #[serde(default)]
    pub page_count: usize,
    /// SHA-256 of the document text
    #[serde(default)]
    pub doc_hash: String,
}

impl EntryMetadata {
    /// Flatten into a JSON object, adding the chunk text under `text`
    pub fn to_map(&self, text: &str) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("text".into(), Value::from(text));
        map.insert("source".into(), Value::from(self.source.as_str()));
        map.insert("position".into(), Value::from(self.position as u64));
        map.insert("seq".into(), Value::from(self.seq as u64));
        map.insert("page_count".into(), Value::from(self.page_count as u64));
        map.insert("doc_hash".into(), Value::from(self.doc_hash.as_str()));
        map
    }

    /// Rebuild from a JSON object. Missing keys default, and numbers stored
    /// as floats are accepted.
    pub fn from_map(map: &Map<String, Value>) -> Self {
        let num = |key: &str| {
            map.get(key)
                .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f as u64)))
                .unwrap_or(0) as usize
        };
        let string = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            source: string("source"),
            position: num("position"),
            seq: num("seq"),
            page_count: num("page_count"),
            doc_hash: string("doc_hash"),
        }
    }
}

/// One stored unit: embedding, chunk text, provenance and id
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub id: String,
    pub embedding: Vec<f32>,
    pub text: String,
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    /// Create an entry with a fresh random id
    pub fn new(embedding: Vec<f32>, text: String, metadata: EntryMetadata) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            embedding,
            text,
            metadata,
        }
    }
}

/// A query hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntry {
    pub id: String,
    pub text: String,
    pub metadata: EntryMetadata,
    pub score: f32,
}

/// Hash content using SHA-256
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Open the index selected by `config.index`
pub async fn open_index(config: &Config) -> Result<Arc<dyn VectorIndex>> {
    let name = config.index_name()?;
    match config.index.backend {
        IndexBackend::Pinecone => {
            let index = PineconeIndex::connect(&config.index, config.llm_service.timeout_secs)
                .await?;
            Ok(Arc::new(index))
        }
        IndexBackend::Sqlite => {
            let index = SqliteIndex::open(config.index.sqlite_path(), name)?;
            Ok(Arc::new(index))
        }
    }
}
