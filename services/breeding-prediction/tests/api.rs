//! Integration tests driving the router directly.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::json;
use tempfile::TempDir;
use tower::ServiceExt;

use breeding_prediction::state::AppState;
use breeding_prediction::{app, Backend};
use gaupal_tabular::breeding::{write_breeding_artifact, BreedingManifest};
use gaupal_tabular::{BreedingPredictor, Column, ColumnKind, FeatureSchema, TabularNetConfig};

fn test_manifest() -> BreedingManifest {
    BreedingManifest {
        schema: FeatureSchema {
            columns: vec![
                Column {
                    name: "Cow_Age".into(),
                    kind: ColumnKind::Numeric { mean: 5.0, std: 2.0 },
                },
                Column {
                    name: "Bull_Age".into(),
                    kind: ColumnKind::Numeric { mean: 5.0, std: 2.0 },
                },
                Column {
                    name: "FE_Age_Diff".into(),
                    kind: ColumnKind::Numeric { mean: 2.0, std: 1.0 },
                },
                Column {
                    name: "FE_Milk_Sum".into(),
                    kind: ColumnKind::Numeric { mean: 20.0, std: 5.0 },
                },
                Column {
                    name: "Cow_Temperament".into(),
                    kind: ColumnKind::Categorical {
                        values: vec!["Calm".into(), "Aggressive".into()],
                    },
                },
            ],
            selected_indices: None,
        },
        min_ccs: None,
        max_ccs: None,
    }
}

fn loaded_app() -> Router {
    let temp = TempDir::new().unwrap();
    let device = Default::default();

    let manifest = test_manifest();
    let features = manifest.schema.num_features();
    let classifier_config = TabularNetConfig::new(features, 2).with_hidden_size(8);
    let regressor_config = TabularNetConfig::new(features, 1).with_hidden_size(8);

    write_breeding_artifact(
        temp.path(),
        &manifest,
        classifier_config.init::<Backend>(&device),
        &classifier_config,
        regressor_config.init::<Backend>(&device),
        &regressor_config,
    )
    .unwrap();

    let predictor = BreedingPredictor::<Backend>::load(temp.path(), &device).unwrap();
    app(Arc::new(AppState::new(Some(predictor))))
}

fn unloaded_app() -> Router {
    app(Arc::new(AppState::new(None)))
}

fn record_json() -> serde_json::Value {
    json!({
        "Cow_Breed": "Gir",
        "Cow_Age": 4,
        "Cow_Weight": 400.0,
        "Cow_Height": 130.0,
        "Cow_Milk_Yield": 12.0,
        "Cow_Health_Status": 1,
        "Cow_Drought_Resistance": 7.0,
        "Cow_Temperament": "Calm",
        "Bull_Breed": "Sahiwal",
        "Bull_Age": 6,
        "Bull_Weight": 500.0,
        "Bull_Height": 140.0,
        "Bull_Health_Status": 1,
        "Bull_Mother_Milk_Yield": 14.0,
        "Bull_Drought_Resistance": 6.0,
        "Bull_Temperament": "Aggressive",
        "Same_Parents": 0,
        "Trait_Difference": 2.0,
        "Genetic_Diversity": 0.8,
        "Fertility_Rate": 0.9,
        "Breeding_Success_Rate": 0.7,
        "Disease_Resistance_Score": 6.5,
        "Market_Value": 1500.0,
        "Past_Breeding_Success": "Yes",
        "Bull_Fertility_Rate": 0.85,
        "Cow_Fertility_Rate": 0.9,
        "Bull_Breeding_Success_Rate": 0.75,
        "Cow_Breeding_Success_Rate": 0.7,
        "Bull_Past_Breeding_Success": "No",
        "Cow_Past_Breeding_Success": "No",
        "Bull_Market_Value": 2000.0,
        "Cow_Market_Value": 1500.0,
        "Cow_Mother_Milk_Yield": 11.0
    })
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
    let response = loaded_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "Breeding Prediction API is running");
}

#[tokio::test]
async fn test_health() {
    let response = loaded_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_loaded"], true);

    let response = unloaded_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let body = json_body(response).await;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["model_loaded"], false);
}

#[tokio::test]
async fn test_predict() {
    let response = loaded_app()
        .oneshot(predict_request(&record_json()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    let compatible = body["compatible"].as_str().unwrap();
    assert!(compatible == "Yes" || compatible == "No");

    let confidence = body["confidence_score"].as_f64().unwrap();
    assert!((0.0..=100.0).contains(&confidence));
    // Two decimal places on the wire
    assert_eq!((confidence * 100.0).round() / 100.0, confidence);
    assert!(body["raw_ccs_score"].is_number());
}

#[tokio::test]
async fn test_predict_model_unloaded() {
    let response = unloaded_app()
        .oneshot(predict_request(&record_json()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Model not loaded");
}

#[tokio::test]
async fn test_predict_missing_required_field() {
    let mut record = record_json();
    record.as_object_mut().unwrap().remove("Cow_Breed");

    let response = loaded_app()
        .oneshot(predict_request(&record))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
