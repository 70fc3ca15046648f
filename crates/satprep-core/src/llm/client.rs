//! HTTP client for OpenAI-compatible services (OpenAI, vLLM, etc.)

use super::GenerationOptions;
use crate::config::LLMServiceConfig;
use crate::error::{Result, SatPrepError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Dimensions of `text-embedding-ada-002`
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

/// Trait for LLM service clients
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate chat completion
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: &GenerationOptions,
    ) -> Result<String>;

    /// Generate embeddings for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimensions
    fn embedding_dimensions(&self) -> usize;

    /// Get embedding model name
    fn embedding_model(&self) -> &str;
}

/// Chat message for completion requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// API metrics for monitoring
#[derive(Debug, Default)]
pub struct APIMetrics {
    pub total_requests: AtomicU64,
    pub total_errors: AtomicU64,
    pub total_latency_ms: AtomicU64,
}

/// Snapshot of API metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub total_errors: u64,
    pub avg_latency_ms: f64,
}

/// OpenAI-compatible client
pub struct OpenAIClient {
    http_client: reqwest::Client,
    config: LLMServiceConfig,
    embedding_dimensions: usize,
    metrics: Arc<APIMetrics>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    #[serde(default)]
    index: Option<usize>,
    embedding: Vec<f32>,
}

impl OpenAIClient {
    /// Create new client from configuration
    pub fn new(config: LLMServiceConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let embedding_dimensions = config
            .embedding_dimensions
            .unwrap_or(DEFAULT_EMBEDDING_DIMENSIONS);

        Ok(Self {
            http_client,
            config,
            embedding_dimensions,
            metrics: Arc::new(APIMetrics::default()),
        })
    }

    /// Service configuration this client was built from
    pub fn config(&self) -> &LLMServiceConfig {
        &self.config
    }

    /// Get current API metrics
    pub fn metrics(&self) -> MetricsSnapshot {
        let total = self.metrics.total_requests.load(Ordering::Relaxed);
        MetricsSnapshot {
            total_requests: total,
            total_errors: self.metrics.total_errors.load(Ordering::Relaxed),
            avg_latency_ms: if total > 0 {
                self.metrics.total_latency_ms.load(Ordering::Relaxed) as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    fn record_error(&self) {
        self.metrics.total_errors.fetch_add(1, Ordering::Relaxed);
    }

    fn record_latency(&self, start: Instant) {
        let elapsed = start.elapsed().as_millis() as u64;
        self.metrics
            .total_latency_ms
            .fetch_add(elapsed, Ordering::Relaxed);
    }

    async fn post_json<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        api_key: Option<&str>,
        service: &str,
    ) -> Result<reqwest::Response> {
        self.metrics.total_requests.fetch_add(1, Ordering::Relaxed);

        let mut req = self.http_client.post(url).json(body);
        if let Some(api_key) = api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        let response = req.send().await.map_err(|e| {
            self.record_error();
            SatPrepError::Http(e)
        })?;

        if !response.status().is_success() {
            self.record_error();
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SatPrepError::Provider(format!(
                "{} service error (HTTP {}): {}",
                service, status, body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        options: &GenerationOptions,
    ) -> Result<String> {
        let start = Instant::now();

        let request = ChatRequest {
            model: &options.model,
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let url = format!("{}/v1/chat/completions", self.config.url.trim_end_matches('/'));
        let response = self
            .post_json(&url, &request, self.config.generation_credential(), "LLM")
            .await?;

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            self.record_error();
            SatPrepError::Http(e)
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                self.record_error();
                SatPrepError::Llm("No response from LLM".to_string())
            })?
            .message
            .content;

        self.record_latency(start);
        tracing::debug!(model = %options.model, chars = content.len(), "chat completion done");
        Ok(content)
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text.to_string()]).await?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| SatPrepError::Llm("No embedding returned".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let request = EmbedRequest {
            model: &self.config.embedding_model,
            input: texts,
        };

        let url = format!(
            "{}/v1/embeddings",
            self.config.embeddings_url().trim_end_matches('/')
        );
        let response = self
            .post_json(
                &url,
                &request,
                self.config.embedding_credential(),
                "Embedding",
            )
            .await?;

        let embed_response: EmbedResponse = response.json().await.map_err(|e| {
            self.record_error();
            SatPrepError::Http(e)
        })?;

        let embeddings = order_embeddings(embed_response.data, texts.len()).inspect_err(|_| {
            self.record_error();
        })?;

        self.record_latency(start);
        Ok(embeddings)
    }

    fn embedding_dimensions(&self) -> usize {
        self.embedding_dimensions
    }

    fn embedding_model(&self) -> &str {
        &self.config.embedding_model
    }
}

/// Put embeddings back in input order and check none are missing
fn order_embeddings(mut data: Vec<EmbedData>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if data.len() != expected {
        return Err(SatPrepError::Llm(format!(
            "Expected {} embeddings, got {}",
            expected,
            data.len()
        )));
    }
    if data.iter().all(|d| d.index.is_some()) {
        data.sort_by_key(|d| d.index);
    }
    Ok(data.into_iter().map(|d| d.embedding).collect())
}
