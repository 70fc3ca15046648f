//! Generate command

use crate::app::{GenerateArgs, OutputFormat};
use crate::output;
use anyhow::{Context, Result};
use satprep_core::render::{render, OutputFormat as FileFormat};
use satprep_core::{
    open_index, Config, GeneratedAnswer, HttpEmbedder, HttpGenerator, LLMClient, OpenAIClient,
    QuestionGenerator, QuestionRequest, SatPrepError,
};
use std::sync::Arc;

pub async fn run(args: GenerateArgs, config: Config, format: OutputFormat) -> Result<()> {
    let request = QuestionRequest {
        topic: args.topic,
        difficulty: args.difficulty.parse()?,
        language: args.language.parse()?,
        instructions: args.instructions,
    };
    config.validate_for_generate()?;

    let index = open_index(&config).await?;
    let client: Arc<dyn LLMClient> = Arc::new(OpenAIClient::new(config.llm_service.clone())?);
    let generator = QuestionGenerator::from_config(
        &config,
        Arc::new(HttpEmbedder::new(client.clone())),
        index,
        Arc::new(HttpGenerator::new(client)),
    );

    let answer = require_answer(generator.generate(&request).await)?;

    if let Some(path) = &args.output {
        let bytes = render(&answer.answer, FileFormat::from_path(path));
        std::fs::write(path, bytes)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "answer written");
    }

    print!(
        "{}",
        output::format_answer(&answer, format, args.show_context)
    );
    Ok(())
}

/// A failed or blank generation becomes one user-facing error; nothing
/// partial is returned
fn require_answer(result: satprep_core::Result<GeneratedAnswer>) -> Result<GeneratedAnswer> {
    match result {
        Ok(answer) if !answer.answer.trim().is_empty() => Ok(answer),
        Ok(_) => Err(SatPrepError::Llm(
            "No response was generated. Please try again.".to_string(),
        )
        .into()),
        Err(e) => Err(anyhow::Error::new(e).context("No response was generated")),
    }
}
