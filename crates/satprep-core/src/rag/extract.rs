//! Answer extraction from raw model output

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref ANSWER_RE: Regex = Regex::new(r"(?s)<Answer>\s*(.*?)\s*</Answer>").unwrap();
    static ref MARKDOWN_FENCE_RE: Regex =
        Regex::new(r"(?m)^([ \t]*)(`{3,}|~{3,})(?:[ \t]*markdown\b)+").unwrap();
}

/// Payload of the first `<Answer>` block, or the whole response when the
/// markers are missing. Fences are normalized either way.
pub fn extract_answer(raw: &str) -> String {
    extract_answer_with_markers(raw).0
}

/// Like [`extract_answer`], also reporting whether the markers were found
pub fn extract_answer_with_markers(raw: &str) -> (String, bool) {
    match ANSWER_RE.captures(raw).and_then(|c| c.get(1)) {
        Some(inner) => (normalize_code_fences(inner.as_str()), true),
        None => {
            tracing::debug!(chars = raw.len(), "no <Answer> markers, using raw response");
            (normalize_code_fences(raw), false)
        }
    }
}

/// Strip the `markdown` tag from fence openers. Any info string after the
/// tag and the line ending (`\n` or `\r\n`) are kept.
pub fn normalize_code_fences(text: &str) -> String {
    MARKDOWN_FENCE_RE.replace_all(text, "${1}${2}").into_owned()
}
