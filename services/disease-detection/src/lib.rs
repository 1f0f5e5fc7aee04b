//! Cattle Disease Detection API
//!
//! HTTP service wrapping the skin/health condition classifier. Accepts
//! multipart image uploads and returns the detected condition.

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

/// Upload size cap for the predict endpoints
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// How many ranked conditions the predict endpoint reports
pub const TOP_K: usize = 3;

/// Build the router; extracted from `main` so tests can drive it directly
pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
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
