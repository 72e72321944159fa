//! Insight handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::AppState;
use fdinsights_core::{FieldError, Insight, InsightFailure, ParameterInput};

/// Insight response envelope
///
/// Exactly one of `data` and `error` is set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightsResponse {
    pub data: Option<String>,
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl From<Insight> for InsightsResponse {
    fn from(insight: Insight) -> Self {
        Self {
            data: Some(insight.text),
            error: None,
            model: Some(insight.model),
            generated_at: Some(insight.generated_at),
            fields: vec![],
        }
    }
}

impl From<&InsightFailure> for InsightsResponse {
    fn from(failure: &InsightFailure) -> Self {
        Self {
            data: None,
            error: Some(failure.user_message()),
            model: None,
            generated_at: None,
            fields: failure
                .validation_errors()
                .map(|e| e.fields().to_vec())
                .unwrap_or_default(),
        }
    }
}

fn failure_status(failure: &InsightFailure) -> StatusCode {
    match failure {
        InsightFailure::InvalidInput(_) => StatusCode::BAD_REQUEST,
        InsightFailure::EmptyResponse => StatusCode::SERVICE_UNAVAILABLE,
        InsightFailure::Unexpected => StatusCode::BAD_GATEWAY,
    }
}

/// POST /api/insights - Generate AI insights for FD parameters
///
/// Makes one call to the configured backend. Failures carry only the
/// user-facing message; details are in the server log.
pub async fn generate_insights(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ParameterInput>, JsonRejection>,
) -> Response {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Rejected insight request body");
            let body = InsightsResponse {
                data: None,
                error: Some("Invalid input.".to_string()),
                model: None,
                generated_at: None,
                fields: vec![],
            };
            return (StatusCode::BAD_REQUEST, Json(body)).into_response();
        }
    };

    match state.gateway.generate(&input).await {
        Ok(insight) => Json(InsightsResponse::from(insight)).into_response(),
        Err(failure) => (
            failure_status(&failure),
            Json(InsightsResponse::from(&failure)),
        )
            .into_response(),
    }
}
