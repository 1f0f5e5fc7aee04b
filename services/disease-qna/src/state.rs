//! Shared application state.

use std::sync::Arc;

use gaupal_tabular::SymptomPredictor;

use crate::Backend;

/// Shared application state. Unlike the other services this one has no
/// unloaded mode; startup fails without a usable ensemble.
pub struct AppState {
    pub predictor: SymptomPredictor<Backend>,
}

impl AppState {
    pub fn new(predictor: SymptomPredictor<Backend>) -> Self {
        Self { predictor }
    }
}

pub type SharedState = Arc<AppState>;
