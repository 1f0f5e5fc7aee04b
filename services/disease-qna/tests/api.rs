//! Integration tests driving the router directly.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

use disease_qna::state::AppState;
use disease_qna::{app, Backend};
use gaupal_core::catalog::{NUM_SYMPTOMS, NUM_SYMPTOM_DISEASES};
use gaupal_tabular::{SymptomPredictor, TabularEnsemble, TabularNetConfig};

fn test_app() -> Router {
    let temp = TempDir::new().unwrap();
    let device = Default::default();

    let config = TabularNetConfig::new(NUM_SYMPTOMS, NUM_SYMPTOM_DISEASES).with_hidden_size(8);
    let members = (0..3).map(|_| config.init::<Backend>(&device)).collect();
    TabularEnsemble::<Backend>::write_artifact(temp.path(), members, &config, None).unwrap();

    let predictor = SymptomPredictor::<Backend>::load(temp.path(), &device).unwrap();
    app(Arc::new(AppState::new(predictor)))
}

fn predict_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_root() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "Cattle Disease Prediction API is running");
}

#[tokio::test]
async fn test_health() {
    let response = test_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["members"], 3);
}

#[tokio::test]
async fn test_predict() {
    let response = test_app()
        .oneshot(predict_request(&json!({
            "symptoms": ["fever", "lameness", "loss_of_appetite"]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    let prediction = body["prediction"].as_u64().unwrap();
    assert!(prediction < NUM_SYMPTOM_DISEASES as u64);
}

#[tokio::test]
async fn test_predict_unknown_symptoms_ignored() {
    let response = test_app()
        .oneshot(predict_request(&json!({
            "symptoms": ["not_a_real_symptom", "also_fake"]
        })))
        .await
        .unwrap();

    // All-unknown still predicts over the zero vector.
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert!(body["prediction"].is_u64());
}

#[tokio::test]
async fn test_predict_empty_list() {
    let response = test_app()
        .oneshot(predict_request(&json!({ "symptoms": [] })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_predict_malformed_body() {
    let response = test_app()
        .oneshot(predict_request(&json!({ "symptom": "fever" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
