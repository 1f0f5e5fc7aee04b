//! Breeding Prediction API
//!
//! HTTP service wrapping the breeding compatibility models. Accepts a JSON
//! record of cow/bull traits and returns the compatibility verdict with a
//! confidence percentage derived from the CCS regression.

pub mod routes;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

/// Inference backend; all services run CPU inference through ndarray
pub type Backend = burn::backend::NdArray<f32>;

/// Build the router; extracted from `main` so tests can drive it directly
pub fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/predict", post(routes::predict))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
