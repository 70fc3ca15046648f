//! Integration tests for retrieval and question generation

mod common;

use common::{keyword_vector, FailingEmbedder, KeywordEmbedder, ScriptedGenerator};
use satprep_core::rag::NO_CONTEXT_NOTICE;
use satprep_core::{
    Difficulty, EntryMetadata, GenerationOptions, IndexEntry, Language, QuestionGenerator,
    QuestionRequest, SqliteIndex, VectorIndex,
};
use std::sync::Arc;

const THREE_QUESTIONS: &str = "Here you go.\n<Answer>\n```markdown\n\
1. If $3x - 7 > 11$, what is the least integer value of $x$?\n\n\
2. A store sells pens for $2 each. Which inequality gives the number of pens $p$ bought with at most $15?\n\n\
3. For which values of $y$ is $|y - 4| \\le 6$?\n```\n</Answer>\nGood luck!";

async fn seeded_index(texts: &[&str]) -> Arc<SqliteIndex> {
    let index = Arc::new(SqliteIndex::open_in_memory("sat-math").unwrap());
    let entries: Vec<IndexEntry> = texts
        .iter()
        .map(|t| {
            IndexEntry::new(
                keyword_vector(t),
                t.to_string(),
                EntryMetadata {
                    source: "practice.pdf".into(),
                    ..Default::default()
                },
            )
        })
        .collect();
    index.upsert(&entries).await.unwrap();
    index
}

fn generator_with(
    index: Arc<SqliteIndex>,
    generator: Arc<ScriptedGenerator>,
) -> QuestionGenerator {
    QuestionGenerator::new(
        Arc::new(KeywordEmbedder::default()),
        index,
        generator,
        GenerationOptions::default(),
        3,
    )
}

#[tokio::test]
async fn test_three_questions_end_to_end() {
    let index = seeded_index(&[
        "Solve the inequality 2x + 5 < 13. Inequalities with one variable.",
        "The area of a circle with radius 4 is what?",
        "Which inequality represents the shaded region? inequality graph",
        "The ratio of boys to girls is 3:4.",
        "Compound inequalities: -2 < x + 1 <= 5",
    ])
    .await;
    let scripted = Arc::new(ScriptedGenerator::new(THREE_QUESTIONS));
    let generator = generator_with(index, scripted.clone());

    let result = generator.generate(&QuestionRequest::default()).await.unwrap();

    assert!(result.markers_found);
    assert_eq!(result.context.len(), 3);
    assert!(result.context.iter().all(|c| c.text.to_lowercase().contains("inequal")));
    assert!(result.answer.starts_with("```\n1. If $3x - 7 > 11$"));
    assert!(result.answer.ends_with("```"));
    assert!(!result.answer.contains("```markdown"));
    assert!(!result.answer.contains("Good luck"));
    for n in ["1. ", "2. ", "3. "] {
        assert!(result.answer.contains(n));
    }
    assert_eq!(result.raw, THREE_QUESTIONS);

    let options = scripted.options.lock().unwrap();
    assert_eq!(options[0].model, "gpt-4o");
    assert!((options[0].temperature - 0.3).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_prompt_contains_context_in_retrieval_order() {
    let index = seeded_index(&[
        "inequal circle THIRD",
        "circle only",
        "inequal FIRST",
        "inequal inequal inequal circle SECOND",
    ])
    .await;
    let scripted = Arc::new(ScriptedGenerator::new("<Answer>ok</Answer>"));
    let generator = generator_with(index, scripted.clone());

    let request = QuestionRequest {
        topic: "linear inequalities".into(),
        difficulty: Difficulty::Hard,
        language: Language::Spanish,
        instructions: "No calculators.".into(),
    };
    let result = generator.generate(&request).await.unwrap();

    let prompt = scripted.last_prompt();
    let first = prompt.find("FIRST").unwrap();
    let second = prompt.find("SECOND").unwrap();
    let third = prompt.find("THIRD").unwrap();
    assert!(first < second && second < third);
    assert!(!prompt.contains("circle only"));
    assert!(prompt.contains(&request.compose()));
    assert!(prompt.contains("Difficulty Level: Hard"));
    assert!(prompt.contains("Language: Spanish"));
    assert_eq!(result.answer, "ok");
}

#[tokio::test]
async fn test_empty_index_still_generates() {
    let index = Arc::new(SqliteIndex::open_in_memory("sat-math").unwrap());
    let scripted = Arc::new(ScriptedGenerator::new(
        "<Answer>\nNo reference material was available.\n\n1. Q\n2. Q\n3. Q\n</Answer>",
    ));
    let generator = generator_with(index, scripted.clone());

    let result = generator.generate(&QuestionRequest::default()).await.unwrap();

    assert!(result.context.is_empty());
    assert!(scripted.last_prompt().contains(NO_CONTEXT_NOTICE));
    assert!(result.answer.starts_with("No reference material"));
}

#[tokio::test]
async fn test_missing_markers_fall_back_to_raw() {
    let index = seeded_index(&["inequalities"]).await;
    let raw = "1. Solve x > 2\n2. Solve x < 3\n3. Solve x = 4";
    let generator = generator_with(index, Arc::new(ScriptedGenerator::new(raw)));

    let result = generator.generate(&QuestionRequest::default()).await.unwrap();

    assert!(!result.markers_found);
    assert_eq!(result.answer, raw);
    assert_eq!(result.context.len(), 1);
}

#[tokio::test]
async fn test_provider_failure_propagates() {
    let index = seeded_index(&["inequalities"]).await;
    let scripted = Arc::new(ScriptedGenerator::new("<Answer>x</Answer>"));
    let generator = QuestionGenerator::new(
        Arc::new(FailingEmbedder),
        index,
        scripted.clone(),
        GenerationOptions::default(),
        3,
    );

    let err = generator
        .generate(&QuestionRequest::default())
        .await
        .unwrap_err();

    assert!(err.is_provider_error());
    assert!(scripted.prompts.lock().unwrap().is_empty());
}
