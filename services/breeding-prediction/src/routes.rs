//! Request handlers for the breeding prediction service.
//!
//! This service's historical error shape is `{"error": "..."}`, so handlers
//! build responses through `json_error` instead of `ApiError`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use gaupal_core::http::{json_error, round2};
use gaupal_tabular::BreedingRecord;

use crate::state::SharedState;

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "status": "Breeding Prediction API is running" }))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let model_loaded = state.predictor.is_some();
    Json(HealthResponse {
        status: if model_loaded { "healthy" } else { "unhealthy" },
        model_loaded,
    })
}

pub async fn predict(
    State(state): State<SharedState>,
    Json(record): Json<BreedingRecord>,
) -> Response {
    let Some(predictor) = state.predictor.as_ref() else {
        return json_error(StatusCode::SERVICE_UNAVAILABLE, "error", "Model not loaded");
    };

    match predictor.predict(&record) {
        Ok(assessment) => Json(json!({
            "compatible": if assessment.compatible { "Yes" } else { "No" },
            "confidence_score": round2(assessment.confidence_pct),
            "raw_ccs_score": round2(assessment.raw_ccs),
        }))
        .into_response(),
        Err(e) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "error", &e.to_string()),
    }
}
