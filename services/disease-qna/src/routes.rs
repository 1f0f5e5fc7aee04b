//! Request handlers for the disease Q&A service.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;

use gaupal_core::http::ApiError;

use crate::state::SharedState;

pub async fn root() -> Json<serde_json::Value> {
    Json(json!({ "status": "Cattle Disease Prediction API is running" }))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub members: usize,
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: true,
        members: state.predictor.members(),
    })
}

#[derive(Deserialize)]
pub struct SymptomRequest {
    pub symptoms: Vec<String>,
}

#[derive(Serialize)]
pub struct PredictionResponse {
    pub prediction: usize,
}

/// Unknown symptom names are ignored by the vectorizer, so an empty or
/// all-unknown list still produces a prediction over the zero vector.
pub async fn predict(
    State(state): State<SharedState>,
    Json(request): Json<SymptomRequest>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let diagnosis = state.predictor.predict(&request.symptoms)?;
    Ok(Json(PredictionResponse {
        prediction: diagnosis.class_id,
    }))
}
