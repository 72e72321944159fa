//! AI backend response types
//!
//! These types are backend-agnostic and used across all AI implementations.

use serde::{Deserialize, Serialize};

/// Structured output returned by a backend
///
/// `insights` holds the model's text exactly as returned; it may be blank.
/// Deciding whether the text is usable belongs to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightsOutput {
    pub insights: String,
}

impl InsightsOutput {
    pub fn new(insights: impl Into<String>) -> Self {
        Self {
            insights: insights.into(),
        }
    }

    /// Trimmed text, or `None` when nothing usable came back
    pub fn usable_text(&self) -> Option<&str> {
        let text = self.insights.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// Backend description for status output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendInfo {
    /// Backend kind (ollama, openai_compatible, mock)
    pub kind: &'static str,
    pub host: String,
    pub model: String,
}

/// JSON Schema declaring the single string field the model must return
pub fn output_schema(field: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            field: {
                "type": "string",
                "description": "Personalized financial tips and insights related to the FD inputs, such as alternative FD schemes or tax implications."
            }
        },
        "required": [field]
    })
}
