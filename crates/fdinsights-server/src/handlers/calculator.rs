//! Calculator handlers

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};
use fdinsights_core::{calculate_with_delay, CalculationResult, CompoundingFrequency, ParameterInput};

/// One selectable compounding option
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyOption {
    pub value: CompoundingFrequency,
    pub label: &'static str,
    pub periods_per_year: u32,
}

/// POST /api/calculate - Maturity amount and total interest
///
/// Waits for the configured cosmetic delay before answering. Every invalid
/// field is reported in `fields`.
pub async fn calculate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ParameterInput>, JsonRejection>,
) -> Result<Json<CalculationResult>, AppError> {
    let Json(input) = payload.map_err(|e| AppError::bad_request(&e.body_text()))?;
    let params = input.validate().map_err(|e| AppError::invalid_input(&e))?;

    let result = calculate_with_delay(&params, state.settings.calculation_delay).await;
    Ok(Json(result))
}

/// GET /api/frequencies - Compounding options for the form
pub async fn list_frequencies() -> Json<Vec<FrequencyOption>> {
    Json(
        CompoundingFrequency::all()
            .iter()
            .map(|f| FrequencyOption {
                value: *f,
                label: f.label(),
                periods_per_year: f.periods_per_year(),
            })
            .collect(),
    )
}
