//! Request handlers for the disease detection service.

use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use gaupal_core::http::{allowed_image_extension, ApiError};
use gaupal_vision::ImagePredictor;

use crate::state::SharedState;
use crate::Backend;

pub async fn root(State(state): State<SharedState>) -> Json<serde_json::Value> {
    Json(json!({
        "message": "Cattle Disease Detection API",
        "model_loaded": state.predictor.is_some(),
    }))
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub degraded: bool,
}

pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let model_loaded = state.predictor.is_some();
    let degraded = state
        .predictor
        .as_ref()
        .map(ImagePredictor::degraded)
        .unwrap_or(false);

    Json(HealthResponse {
        status: if model_loaded { "healthy" } else { "unhealthy" },
        model_loaded,
        degraded,
    })
}

pub async fn predict(
    State(state): State<SharedState>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let predictor = loaded(&state)?;
    let bytes = extract_file(multipart).await?;
    let prediction = predictor.predict(&bytes)?;

    let body = if predictor.has_class_names() {
        json!({
            "category": prediction.label,
            "confidence": prediction.confidence,
        })
    } else {
        // Without a catalog the service reports raw class ids
        json!({
            "categories": prediction
                .top
                .iter()
                .map(|s| json!({ "class_id": s.class_id, "confidence": s.confidence }))
                .collect::<Vec<_>>(),
        })
    };

    Ok(Json(body).into_response())
}

fn loaded(state: &SharedState) -> Result<&ImagePredictor<Backend>, ApiError> {
    state
        .predictor
        .as_ref()
        .ok_or_else(|| ApiError::unavailable("Model not loaded"))
}

/// Pull the `file` field out of the multipart form and validate its name
async fn extract_file(mut multipart: Multipart) -> Result<Vec<u8>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(e.to_string()))?;
            upload = Some((filename, bytes.to_vec()));
            break;
        }
    }

    let (filename, bytes) = upload.ok_or_else(|| ApiError::bad_request("No file provided"))?;
    if !allowed_image_extension(&filename) {
        return Err(ApiError::bad_request(
            "File type not allowed. Please upload PNG, JPG, or JPEG images.",
        ));
    }
    Ok(bytes)
}
