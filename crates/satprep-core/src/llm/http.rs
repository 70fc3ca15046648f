//! Capability adapters over an OpenAI-compatible [`LLMClient`]
//!
//! Ingestion only needs [`Embedder`]; question generation needs both
//! [`Embedder`] and [`Generator`]. One client can back both adapters so
//! they share a connection pool and request metrics.

use super::{ChatMessage, Embedder, GenerationOptions, Generator, LLMClient, OpenAIClient};
use crate::config::LLMServiceConfig;
use crate::error::{Result, SatPrepError};
use async_trait::async_trait;
use std::sync::Arc;

/// Embeds chunk and query text through the service's embeddings endpoint
pub struct HttpEmbedder {
    client: Arc<dyn LLMClient>,
}

impl HttpEmbedder {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }

    /// Build with a dedicated client
    pub fn from_config(config: LLMServiceConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(OpenAIClient::new(config)?)))
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self.client.embed(text).await?;
        if vector.is_empty() {
            return Err(SatPrepError::Llm(format!(
                "{} returned an empty embedding",
                self.client.embedding_model()
            )));
        }
        Ok(vector)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.client.embed_batch(texts).await
    }

    fn dimensions(&self) -> usize {
        self.client.embedding_dimensions()
    }

    fn model_name(&self) -> &str {
        self.client.embedding_model()
    }
}

/// Sends the whole prompt as one user turn and returns the reply text
pub struct HttpGenerator {
    client: Arc<dyn LLMClient>,
}

impl HttpGenerator {
    pub fn new(client: Arc<dyn LLMClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Generator for HttpGenerator {
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String> {
        self.client
            .chat_completion(vec![ChatMessage::user(prompt)], options)
            .await
    }
}
