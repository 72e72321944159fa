//! Insight request gateway
//!
//! Re-validates parameters, forwards them to the configured backend once, and
//! turns every outcome into either insight text or one of three user-facing
//! failures. Nothing escapes as an `Err` from the backend layer: transport,
//! parse and configuration faults are logged in full here and reported to
//! callers only as [`InsightFailure::Unexpected`].

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::ai::{AIClient, InsightBackend};
use crate::models::{ParameterInput, ValidParameters, ValidationErrors};

/// Generated insight text
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Non-blank text as returned by the model (trimmed)
    pub text: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

/// Why no insight text is available
///
/// `Display` yields the message shown to users.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightFailure {
    /// At least one parameter failed validation; the backend was not called
    #[error("Invalid input.")]
    InvalidInput(ValidationErrors),

    /// The backend answered but produced no usable text
    #[error("Failed to generate insights. The AI model may be temporarily unavailable. Please try again later.")]
    EmptyResponse,

    /// Any other fault (network, HTTP status, malformed output, no backend)
    #[error("An unexpected error occurred while generating insights. Please check your connection and try again.")]
    Unexpected,
}

impl InsightFailure {
    /// Message suitable for display to the user
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Field errors, when the failure is invalid input
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            InsightFailure::InvalidInput(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Outcome of one insight request
pub type InsightResult = std::result::Result<Insight, InsightFailure>;

/// Gateway between parameter input and a text-generation backend
#[derive(Clone)]
pub struct InsightGateway<B = AIClient> {
    backend: Option<B>,
}

impl<B: InsightBackend> InsightGateway<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Gateway with no backend; every valid request fails as unexpected
    pub fn unconfigured() -> Self {
        Self { backend: None }
    }

    pub fn with_backend(backend: Option<B>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> Option<&B> {
        self.backend.as_ref()
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    /// Validate `input` and request insights for it
    pub async fn generate(&self, input: &ParameterInput) -> InsightResult {
        let params = input.validate().map_err(|errors| {
            debug!(errors = %errors, "Rejected insight request");
            InsightFailure::InvalidInput(errors)
        })?;
        self.generate_valid(&params).await
    }

    /// Request insights for already-validated parameters
    pub async fn generate_valid(&self, params: &ValidParameters) -> InsightResult {
        let Some(backend) = self.backend.as_ref() else {
            error!("Insight generation failed: no AI backend configured (set OLLAMA_HOST or AI_BACKEND)");
            return Err(InsightFailure::Unexpected);
        };

        match backend.generate_insights(params).await {
            Ok(output) => match output.usable_text() {
                Some(text) => Ok(Insight {
                    text: text.to_string(),
                    model: backend.model().to_string(),
                    generated_at: Utc::now(),
                }),
                None => {
                    warn!(
                        host = %backend.host(),
                        model = %backend.model(),
                        "AI backend returned no insight text"
                    );
                    Err(InsightFailure::EmptyResponse)
                }
            },
            Err(e) => {
                error!(
                    host = %backend.host(),
                    model = %backend.model(),
                    error = %e,
                    "Insight generation failed"
                );
                Err(InsightFailure::Unexpected)
            }
        }
    }
}
