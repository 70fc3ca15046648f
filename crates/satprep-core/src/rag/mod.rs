//! Retrieval-augmented question generation
//!
//! A [`QuestionRequest`] is composed into one query string. The query is
//! embedded, the nearest chunks are fetched from the index, and the model is
//! prompted with both. The `<Answer>` payload is then pulled out of the
//! response.

mod extract;
mod pipeline;
mod prompt;
mod query;

pub use extract::{extract_answer, extract_answer_with_markers, normalize_code_fences};
pub use pipeline::{GeneratedAnswer, QuestionGenerator, DEFAULT_TOP_K};
pub use prompt::{build_prompt, format_context, NO_CONTEXT_NOTICE, QUESTION_COUNT};
pub use query::{Difficulty, Language, QuestionRequest};
