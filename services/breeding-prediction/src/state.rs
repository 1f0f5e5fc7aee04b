//! Shared application state.

use std::sync::Arc;

use gaupal_tabular::BreedingPredictor;

use crate::Backend;

/// Shared application state
pub struct AppState {
    /// The loaded predictor; `None` when the artifact was missing or corrupt
    /// at startup (the service still answers, with 503s on predict)
    pub predictor: Option<BreedingPredictor<Backend>>,
}

impl AppState {
    pub fn new(predictor: Option<BreedingPredictor<Backend>>) -> Self {
        Self { predictor }
    }
}

pub type SharedState = Arc<AppState>;
