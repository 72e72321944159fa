//! JSON parsing helpers for AI backend responses
//!
//! Models often wrap the JSON payload in prose or code fences, so the
//! outermost `{...}` span is extracted before parsing.

use crate::error::{Error, Result};

use super::types::InsightsOutput;

/// Maximum raw response length echoed into error messages
const MAX_RAW_IN_ERROR: usize = 200;

/// Parse the insights object from a raw model response
///
/// - blank response: `Ok` with empty text (nothing usable came back)
/// - JSON object whose `field` is missing, null or blank: `Ok` with empty text
/// - no JSON object, invalid JSON, or a non-string field: `Err`
pub fn parse_insights(response: &str, field: &str) -> Result<InsightsOutput> {
    let response = response.trim();
    if response.is_empty() {
        return Ok(InsightsOutput::default());
    }

    let start = response.find('{');
    let end = response.rfind('}');

    let json_str = match (start, end) {
        (Some(s), Some(e)) if s < e => &response[s..=e],
        _ => {
            return Err(Error::InvalidData(format!(
                "No JSON found in AI response | Raw: {}",
                truncate(response)
            )))
        }
    };

    let value: serde_json::Value = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid JSON from AI: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;

    match value.get(field) {
        None | Some(serde_json::Value::Null) => Ok(InsightsOutput::default()),
        Some(serde_json::Value::String(text)) => Ok(InsightsOutput::new(text.as_str())),
        Some(other) => Err(Error::InvalidData(format!(
            "Field '{}' is not a string: {}",
            field,
            truncate(&other.to_string())
        ))),
    }
}

fn truncate(s: &str) -> String {
    if s.len() > MAX_RAW_IN_ERROR {
        let mut cut = MAX_RAW_IN_ERROR;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}...", &s[..cut])
    } else {
        s.to_string()
    }
}
