//! Health handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use fdinsights_core::InsightBackend;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ai: AiStatus,
}

/// AI backend status
#[derive(Debug, Serialize)]
pub struct AiStatus {
    pub configured: bool,
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

/// GET /api/health - Server liveness plus AI backend reachability
///
/// Not behind authentication.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let ai = match state.ai() {
        Some(client) => AiStatus {
            configured: true,
            reachable: client.health_check().await,
            backend: Some(client.kind()),
            host: Some(client.host().to_string()),
            model: Some(client.model().to_string()),
        },
        None => AiStatus {
            configured: false,
            reachable: false,
            backend: None,
            host: None,
            model: None,
        },
    };

    Json(HealthResponse { status: "ok", ai })
}
