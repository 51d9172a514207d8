//! The fenced-JSON seam, in one place.
//!
//! Every model call in the pipeline gets its answer back as text that
//! usually wraps a JSON document in triple-backtick fences. Fence
//! stripping and parsing live here so the convention is not re-papered in
//! every step.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponseError {
    #[error("JSON parsing error: {0}")]
    Json(String),
}

/// Remove one leading ```` ```json ```` fence and one trailing ```` ``` ````
/// fence, if present. Idempotent on unfenced input.
pub fn strip_json_fences(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest.trim_start();
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }
    s
}

/// Remove a markdown code-fence wrapper some models put around a whole
/// markdown answer. Same one-pair semantics as [`strip_json_fences`].
pub fn strip_markdown_fences(text: &str) -> &str {
    let mut s = text.trim();
    for prefix in ["```markdown", "```md", "```"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.trim_start();
            break;
        }
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest.trim_end();
    }
    s
}

/// Fence-strip then parse. A decode failure is an explicit typed error;
/// the pipeline treats it as fatal everywhere except the Summarizer.
pub fn parse_fenced<T: DeserializeOwned>(raw: &str) -> Result<T, ResponseError> {
    serde_json::from_str(strip_json_fences(raw)).map_err(|e| ResponseError::Json(e.to_string()))
}

/// Fence-strip, parse a JSON array, then deserialize rows leniently:
/// a malformed row is skipped, a malformed document is an error.
/// Returns the rows plus how many were skipped.
pub fn parse_fenced_rows_lenient<T: DeserializeOwned>(
    raw: &str,
) -> Result<(Vec<T>, usize), ResponseError> {
    let values: Vec<serde_json::Value> = parse_fenced(raw)?;
    Ok(rows_lenient(values))
}

/// Deserialize each item, skipping the ones that fail.
pub fn rows_lenient<T: DeserializeOwned>(values: Vec<serde_json::Value>) -> (Vec<T>, usize) {
    let total = values.len();
    let rows: Vec<T> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    let skipped = total - rows.len();
    (rows, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_leading_and_trailing_fence_pair() {
        let fenced = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_json_fences(fenced), "{\"a\": 1}");
    }

    #[test]
    fn stripping_unfenced_input_is_identity() {
        let plain = "{\"a\": 1}";
        assert_eq!(strip_json_fences(plain), plain);
    }

    #[test]
    fn stripping_is_idempotent() {
        let fenced = "```json\n[1, 2]\n```";
        let once = strip_json_fences(fenced);
        let twice = strip_json_fences(once);
        assert_eq!(once, twice);
    }

    #[test]
    fn nested_fences_lose_exactly_one_pair() {
        let doubled = "```json\n```json\n{}\n```\n```";
        assert_eq!(strip_json_fences(doubled), "```json\n{}\n```");
    }

    #[test]
    fn markdown_fence_wrapper_is_removed() {
        let wrapped = "```markdown\n# Summary\ncontent\n```";
        assert_eq!(strip_markdown_fences(wrapped), "# Summary\ncontent");
        let plain = "# Summary\ncontent";
        assert_eq!(strip_markdown_fences(plain), plain);
    }

    #[test]
    fn parse_fenced_returns_typed_value() {
        #[derive(serde::Deserialize)]
        struct Payload {
            description: String,
        }
        let raw = "```json\n{\"description\": \"two services\"}\n```";
        let payload: Payload = parse_fenced(raw).unwrap();
        assert_eq!(payload.description, "two services");
    }

    #[test]
    fn parse_fenced_propagates_decode_failure() {
        let result: Result<serde_json::Value, _> = parse_fenced("```json\n{broken\n```");
        assert!(matches!(result, Err(ResponseError::Json(_))));
    }

    #[test]
    fn lenient_rows_skip_bad_items() {
        #[derive(serde::Deserialize)]
        struct Row {
            name: String,
        }
        let raw = r#"[{"name": "a"}, {"nope": true}, {"name": "b"}]"#;
        let (rows, skipped): (Vec<Row>, usize) = parse_fenced_rows_lenient(raw).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(skipped, 1);
        assert_eq!(rows[1].name, "b");
    }

    #[test]
    fn lenient_rows_error_when_document_is_not_an_array() {
        let result: Result<(Vec<serde_json::Value>, usize), _> =
            parse_fenced_rows_lenient("```json\n{\"not\": \"an array\"}\n```");
        assert!(matches!(result, Err(ResponseError::Json(_))));
    }
}
