//! Prompt assembly for question generation

use crate::db::ScoredEntry;

/// Number of questions the model is asked for
pub const QUESTION_COUNT: usize = 3;

const TUTOR_TEMPLATE: &str = "You are an expert SAT math tutor. You write practice questions from a \
student's request and a set of reference questions. The questions must be challenging, \
original and at SAT level, and they must stay on the requested topic.

Reference material, similar questions to guide you:

{context}

The student's request:

{input}

Follow these instructions:

1. Write {count} challenging SAT-level math questions on the topic in the request.
2. Every question must be original. Do not copy a question from the reference material.
3. Keep the questions relevant to the SAT math section and at SAT difficulty.
4. Format the whole response in Markdown, including mathematical notation and equations.
5. Add no commentary, explanations or unrelated text.
6. Give only the questions, without answers or solutions.

The response must contain exactly {count} questions, each in Markdown, numbered consecutively.

Put the questions inside answer tags like this:

<Answer>
answer
</Answer>
";

/// Replaces the reference block when retrieval returned nothing
pub const NO_CONTEXT_NOTICE: &str = "No reference material was found for this request. \
State inside the answer tags that no reference material was available before the questions.";

/// Join retrieved chunk texts in retrieval order
pub fn format_context(entries: &[ScoredEntry]) -> String {
    entries
        .iter()
        .map(|e| e.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the full prompt from retrieved context and the composed query
pub fn build_prompt(entries: &[ScoredEntry], query: &str) -> String {
    let context = format_context(entries);
    let context = if context.is_empty() {
        NO_CONTEXT_NOTICE.to_string()
    } else {
        context
    };

    // {input} last so user text containing "{context}" is left alone
    TUTOR_TEMPLATE
        .replace("{count}", &QUESTION_COUNT.to_string())
        .replace("{context}", &context)
        .replace("{input}", query)
}
