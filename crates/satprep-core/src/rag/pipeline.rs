//! Online retrieval and generation

use super::extract::extract_answer_with_markers;
use super::prompt::build_prompt;
use super::query::QuestionRequest;
use crate::config::Config;
use crate::db::{ScoredEntry, VectorIndex};
use crate::error::{Result, SatPrepError};
use crate::llm::{Embedder, GenerationOptions, Generator};
use serde::Serialize;
use std::sync::Arc;

/// Default number of chunks retrieved per query
pub const DEFAULT_TOP_K: usize = 3;

/// Outcome of one generation request
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedAnswer {
    /// Unmodified model response
    pub raw: String,
    /// Extracted and fence-normalized payload
    pub answer: String,
    /// Retrieved chunks, most similar first
    pub context: Vec<ScoredEntry>,
    /// Whether `<Answer>` markers were present in `raw`
    pub markers_found: bool,
}

/// Retrieves reference chunks and asks the model for practice questions
pub struct QuestionGenerator {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    generator: Arc<dyn Generator>,
    options: GenerationOptions,
    top_k: usize,
}

impl QuestionGenerator {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn Generator>,
        options: GenerationOptions,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            index,
            generator,
            options,
            top_k,
        }
    }

    /// Wire a generator from configuration with the given collaborators
    pub fn from_config(
        config: &Config,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        generator: Arc<dyn Generator>,
    ) -> Self {
        let options = GenerationOptions::new(
            config.llm_service.model.clone(),
            config.llm_service.temperature,
        );
        Self::new(embedder, index, generator, options, config.retrieval.top_k)
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Up to `top_k` chunks most similar to `query`
    pub async fn retrieve(&self, query: &str) -> Result<Vec<ScoredEntry>> {
        if self.top_k == 0 {
            return Err(SatPrepError::InvalidInput(
                "retrieval top_k must be at least 1".to_string(),
            ));
        }

        let embedding = self.embedder.embed(query).await?;
        let mut results = self.index.query(&embedding, self.top_k).await?;
        results.truncate(self.top_k);

        tracing::debug!(
            index = self.index.name(),
            requested = self.top_k,
            returned = results.len(),
            "retrieved context"
        );
        Ok(results)
    }

    /// Retrieve, prompt and extract for an already composed query
    pub async fn answer(&self, query: &str) -> Result<GeneratedAnswer> {
        let context = self.retrieve(query).await?;
        if context.is_empty() {
            tracing::warn!(index = self.index.name(), "no reference material retrieved");
        }

        let prompt = build_prompt(&context, query);
        let raw = self.generator.generate(&prompt, &self.options).await?;
        let (answer, markers_found) = extract_answer_with_markers(&raw);

        tracing::info!(
            model = %self.options.model,
            context = context.len(),
            markers_found,
            "generated questions"
        );

        Ok(GeneratedAnswer {
            raw,
            answer,
            context,
            markers_found,
        })
    }

    /// Compose the request into a query and answer it
    pub async fn generate(&self, request: &QuestionRequest) -> Result<GeneratedAnswer> {
        self.answer(&request.compose()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::SqliteIndex;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct FixedEmbedder;

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, 0.0])
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        fn dimensions(&self) -> usize {
            2
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[derive(Default)]
    struct EchoGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Generator for EchoGenerator {
        async fn generate(&self, prompt: &str, _options: &GenerationOptions) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("<Answer>\n1. A\n2. B\n3. C\n</Answer>".to_string())
        }
    }

    #[tokio::test]
    async fn test_zero_top_k_rejected() {
        let index = Arc::new(SqliteIndex::open_in_memory("t").unwrap());
        let generator = QuestionGenerator::new(
            Arc::new(FixedEmbedder),
            index,
            Arc::new(EchoGenerator::default()),
            GenerationOptions::default(),
            0,
        );
        assert!(generator.retrieve("q").await.is_err());
    }

    #[tokio::test]
    async fn test_generate_passes_composed_query() {
        let index = Arc::new(SqliteIndex::open_in_memory("t").unwrap());
        let echo = Arc::new(EchoGenerator::default());
        let generator = QuestionGenerator::new(
            Arc::new(FixedEmbedder),
            index,
            echo.clone(),
            GenerationOptions::default(),
            DEFAULT_TOP_K,
        );

        let result = generator.generate(&QuestionRequest::default()).await.unwrap();
        assert!(result.markers_found);
        assert_eq!(result.answer, "1. A\n2. B\n3. C");
        assert!(result.context.is_empty());

        let prompts = echo.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Topic: algebraic inequalities"));
    }
}
