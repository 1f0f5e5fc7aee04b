//! Shared application state.

use std::sync::Arc;

use gaupal_vision::ImagePredictor;

use crate::Backend;

/// Shared application state
pub struct AppState {
    /// The loaded predictor; `None` only when startup could not produce one
    pub predictor: Option<ImagePredictor<Backend>>,
}

impl AppState {
    pub fn new(predictor: Option<ImagePredictor<Backend>>) -> Self {
        Self { predictor }
    }
}

pub type SharedState = Arc<AppState>;
