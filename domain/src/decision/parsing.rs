//! Decision extraction from raw oracle output.
//!
//! The oracle returns free text. A decision is the first balanced JSON object
//! found in it after removing markdown code fences. Anything else (prose,
//! trailing commentary, a second object) is ignored.

use super::Decision;
use thiserror::Error;

/// Why raw oracle output could not be turned into a [`Decision`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecisionParseError {
    #[error("response is empty")]
    Empty,

    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("unbalanced braces: JSON object is never closed")]
    Unbalanced,

    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

/// Remove markdown fence lines (```` ``` ```` / ```` ```json ````), keeping their contents
pub fn strip_code_fences(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Return the first balanced `{...}` block, honouring string literals and escapes.
pub fn extract_json_object(text: &str) -> Result<&str, DecisionParseError> {
    let start = text.find('{').ok_or(DecisionParseError::NoJsonObject)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(&text[start..start + offset + c.len_utf8()]);
                }
            }
            _ => {}
        }
    }

    Err(DecisionParseError::Unbalanced)
}

/// Parse raw oracle output into a [`Decision`].
///
/// # Examples
///
/// ```
/// use deliberation_domain::decision::parse_decision;
///
/// let raw = "Sure!\n```json\n{\"action\": \"propose\", \"proposal\": \"Backend\"}\n```";
/// let decision = parse_decision(raw).unwrap();
/// assert_eq!(decision.action(), Some("propose".to_string()));
/// ```
pub fn parse_decision(raw: &str) -> Result<Decision, DecisionParseError> {
    if raw.trim().is_empty() {
        return Err(DecisionParseError::Empty);
    }

    let stripped = strip_code_fences(raw);
    let block = extract_json_object(&stripped)?;

    match serde_json::from_str::<serde_json::Value>(block) {
        Ok(serde_json::Value::Object(fields)) => Ok(Decision::new(fields)),
        // extract_json_object only ever returns `{...}`
        Ok(other) => Err(DecisionParseError::InvalidJson(format!(
            "expected an object, got {}",
            other
        ))),
        Err(e) => Err(DecisionParseError::InvalidJson(e.to_string())),
    }
}
