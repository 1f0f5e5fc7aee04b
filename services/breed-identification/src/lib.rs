//! Cow Identification API
//!
//! HTTP service wrapping the breed classification model. Accepts multipart
//! image uploads and returns the ranked breed predictions.

pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

/// Inference backend; all services run CPU inference through ndarray
pub type Backend = burn::backend::NdArray<f32>;

pub const BACKEND_NAME: &str = "ndarray";

/// Upload size cap for the predict endpoints
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// How many ranked breeds the predict endpoint reports
pub const TOP_K: usize = 5;

/// Build the router; extracted from `main` so tests can drive it directly
pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/model-info", get(routes::model_info))
        // Deployed clients call both the bare and trailing-slash forms
        .route("/predict", post(routes::predict))
        .route("/predict/", post(routes::predict))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
