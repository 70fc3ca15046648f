//! LLM trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Embedding generation trait
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for batch of texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Text generation trait
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete a single prompt
    async fn generate(&self, prompt: &str, options: &GenerationOptions) -> Result<String>;
}

/// Recognized generation options
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationOptions {
    pub model: String,
    pub temperature: f32,
    /// Upper bound on completion length; provider default when `None`
    pub max_tokens: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            temperature: 0.3,
            max_tokens: None,
        }
    }
}

impl GenerationOptions {
    pub fn new(model: impl Into<String>, temperature: f32) -> Self {
        Self {
            model: model.into(),
            temperature,
            max_tokens: None,
        }
    }
}
