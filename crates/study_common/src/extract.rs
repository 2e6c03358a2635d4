//! Tolerant JSON extraction from model completions.
//!
//! Models are asked for pure JSON but routinely wrap it in code fences, open
//! with "Here is the JSON:" or close with commentary. Extraction strips the
//! fences, keeps the span from the first `{`/`[` to the last `}`/`]`, and
//! parses it. There is no grammar repair and no field scraping: the parse
//! succeeds fully or the completion is rejected.

use crate::error::StudyError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Maximum characters of offending text kept in a `MalformedResponse`
pub const EXCERPT_CHARS: usize = 200;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[A-Za-z0-9_+\-]*").expect("code fence pattern is valid"));

/// Remove fenced-with-language and bare code fence markers
pub fn strip_code_fences(text: &str) -> String {
    CODE_FENCE.replace_all(text, "").into_owned()
}

/// Locate the JSON payload span inside already de-fenced text
///
/// Returns the slice from the first `{` or `[` through the later of the last
/// `}` or `]`, or the trimmed text when no such span exists.
pub fn locate_payload(text: &str) -> &str {
    let trimmed = text.trim();

    let start = trimmed.find(['{', '[']);
    let end = match (trimmed.rfind('}'), trimmed.rfind(']')) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, b) => a.or(b),
    };

    match (start, end) {
        (Some(s), Some(e)) if e >= s => &trimmed[s..=e],
        _ => trimmed,
    }
}

/// Extract and parse the JSON value embedded in a model completion
pub fn extract_structured(text: &str) -> Result<Value, StudyError> {
    let cleaned = strip_code_fences(text);
    let payload = locate_payload(&cleaned);

    debug!(
        raw_len = text.len(),
        payload_len = payload.len(),
        "Extracting JSON payload from completion"
    );

    serde_json::from_str(payload).map_err(|e| {
        tracing::warn!("Failed to parse AI response: {}", excerpt(text));
        StudyError::MalformedResponse {
            reason: e.to_string(),
            excerpt: excerpt(text),
        }
    })
}

/// Extract the payload and deserialize it into a caller-defined shape
pub fn extract_as<T: DeserializeOwned>(text: &str) -> Result<T, StudyError> {
    let value = extract_structured(text)?;
    Ok(serde_json::from_value(value)?)
}

/// First `EXCERPT_CHARS` characters of the text, marked when cut
fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
