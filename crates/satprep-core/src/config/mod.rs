//! Configuration management
//!
//! Settings come from an optional YAML file, then environment variables
//! (a `.env` file is honoured), then CLI flags. Required values are checked
//! per command by [`Config::validate_for_ingest`] and
//! [`Config::validate_for_generate`] before any pipeline is built.

use crate::error::{Result, SatPrepError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Directory scanned recursively for PDFs during ingestion
    #[serde(default)]
    pub root_directory: Option<PathBuf>,

    /// Embedding and chat completion service
    #[serde(default)]
    pub llm_service: LLMServiceConfig,

    /// Vector index selection
    #[serde(default)]
    pub index: IndexConfig,

    #[serde(default)]
    pub chunking: ChunkingConfig,

    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// OpenAI-compatible service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LLMServiceConfig {
    /// Base URL for chat completions
    #[serde(default = "default_llm_url")]
    pub url: String,

    /// Model name for question generation
    #[serde(default = "default_chat_model")]
    pub model: String,

    /// Sampling temperature for question generation
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Base URL for embeddings service (can be different from LLM URL)
    #[serde(default)]
    pub embedding_url: Option<String>,

    /// Model name for embeddings
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Embedding dimensions, if known ahead of the first request
    #[serde(default)]
    pub embedding_dimensions: Option<usize>,

    /// API key for chat completions
    #[serde(default)]
    pub api_key: Option<String>,

    /// API key for embeddings (falls back to `api_key`)
    #[serde(default)]
    pub embedding_api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl LLMServiceConfig {
    /// Get the embeddings URL (falls back to main URL if not specified)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.url)
    }

    /// Credential used for embedding requests
    pub fn embedding_credential(&self) -> Option<&str> {
        self.embedding_api_key
            .as_deref()
            .or(self.api_key.as_deref())
            .filter(|k| !k.trim().is_empty())
    }

    /// Credential used for chat completion requests
    pub fn generation_credential(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

impl Default for LLMServiceConfig {
    fn default() -> Self {
        Self {
            url: default_llm_url(),
            model: default_chat_model(),
            temperature: default_temperature(),
            embedding_url: None,
            embedding_model: default_embedding_model(),
            embedding_dimensions: None,
            api_key: None,
            embedding_api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_llm_url() -> String {
    "https://api.openai.com".to_string()
}

fn default_chat_model() -> String {
    "gpt-4o".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_embedding_model() -> String {
    "text-embedding-ada-002".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Which vector index implementation backs the pipelines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IndexBackend {
    /// Hosted Pinecone index
    #[default]
    Pinecone,
    /// Local SQLite file with brute-force cosine similarity
    Sqlite,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexConfig {
    /// Index name (required)
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub backend: IndexBackend,

    /// Pinecone data-plane host; resolved from the index name when absent
    #[serde(default)]
    pub host: Option<String>,

    /// Pinecone API key
    #[serde(default)]
    pub api_key: Option<String>,

    /// Pinecone namespace
    #[serde(default)]
    pub namespace: Option<String>,

    /// SQLite database file for the local backend
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl IndexConfig {
    /// SQLite file location (defaults to the user cache directory)
    pub fn sqlite_path(&self) -> PathBuf {
        self.db_path.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(crate::CACHE_DIR_NAME)
                .join("index.sqlite")
        })
    }
}

/// Chunking parameters, in characters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkingConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

fn default_chunk_size() -> usize {
    crate::index::CHUNK_SIZE_CHARS
}

fn default_chunk_overlap() -> usize {
    crate::index::CHUNK_OVERLAP_CHARS
}

/// Retrieval parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of context chunks fetched per query
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

fn default_top_k() -> usize {
    crate::rag::DEFAULT_TOP_K
}

impl Config {
    /// Load config from `path`, or from the default path when `None`.
    ///
    /// A missing file yields the defaults. Environment overrides are applied
    /// afterwards, after reading `.env` from the working directory.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_yaml::from_str(&content)?
        } else {
            Config::default()
        };

        dotenvy::dotenv().ok();
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Save config to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Override settings from environment-style key/value lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get("ROOT_DIRECTORY") {
            self.root_directory = Some(PathBuf::from(dir));
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.llm_service.api_key = Some(key);
        }
        if let Some(key) = get("SATPREP_EMBEDDING_API_KEY") {
            self.llm_service.embedding_api_key = Some(key);
        }
        if let Some(url) = get("SATPREP_LLM_URL") {
            self.llm_service.url = url;
        }
        if let Some(url) = get("SATPREP_EMBEDDING_URL") {
            self.llm_service.embedding_url = Some(url);
        }
        if let Some(model) = get("SATPREP_LLM_MODEL") {
            self.llm_service.model = model;
        }
        if let Some(model) = get("SATPREP_EMBEDDING_MODEL") {
            self.llm_service.embedding_model = model;
        }
        if let Some(dims) = get("SATPREP_EMBEDDING_DIMS").and_then(|s| s.parse().ok()) {
            self.llm_service.embedding_dimensions = Some(dims);
        }
        if let Some(name) = get("INDEX_NAME") {
            self.index.name = Some(name);
        }
        if let Some(key) = get("PINECONE_API_KEY") {
            self.index.api_key = Some(key);
        }
        if let Some(host) = get("PINECONE_HOST") {
            self.index.host = Some(host);
        }
        if let Some(path) = get("SATPREP_INDEX_DB") {
            self.index.backend = IndexBackend::Sqlite;
            self.index.db_path = Some(PathBuf::from(path));
        }
    }

    /// Check everything the ingestion pipeline needs and return the root directory
    pub fn validate_for_ingest(&self) -> Result<&Path> {
        let mut missing = self.missing_common();
        if self.root_directory.is_none() {
            missing.push("ROOT_DIRECTORY");
        }
        missing_to_error(missing)?;
        self.validate_chunking()?;
        self.root_directory.as_deref().ok_or_else(|| {
            SatPrepError::Config("missing required setting: ROOT_DIRECTORY".to_string())
        })
    }

    /// Check everything the retrieval-generation pipeline needs
    pub fn validate_for_generate(&self) -> Result<()> {
        let mut missing = self.missing_common();
        if self.llm_service.generation_credential().is_none() && !missing.contains(&"OPENAI_API_KEY")
        {
            missing.push("OPENAI_API_KEY");
        }
        missing_to_error(missing)?;
        if self.retrieval.top_k == 0 {
            return Err(SatPrepError::Config(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Index name, once validated
    pub fn index_name(&self) -> Result<&str> {
        self.index
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| SatPrepError::Config("missing required setting: INDEX_NAME".into()))
    }

    fn missing_common(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.llm_service.embedding_credential().is_none() {
            missing.push("OPENAI_API_KEY");
        }
        if self.index_name().is_err() {
            missing.push("INDEX_NAME");
        }
        if self.index.backend == IndexBackend::Pinecone && self.index.api_key.is_none() {
            missing.push("PINECONE_API_KEY");
        }
        missing
    }

    fn validate_chunking(&self) -> Result<()> {
        let c = self.chunking;
        if c.chunk_size == 0 || c.chunk_overlap >= c.chunk_size {
            return Err(SatPrepError::Config(format!(
                "chunk_overlap ({}) must be smaller than a non-zero chunk_size ({})",
                c.chunk_overlap, c.chunk_size
            )));
        }
        Ok(())
    }
}

fn missing_to_error(missing: Vec<&'static str>) -> Result<()> {
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SatPrepError::Config(format!(
            "missing required setting(s): {}",
            missing.join(", ")
        )))
    }
}
