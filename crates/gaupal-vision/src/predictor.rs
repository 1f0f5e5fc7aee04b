//! Single-image predictor wrapping a loaded classifier.

use std::time::Instant;

use burn::tensor::backend::Backend;
use serde::Serialize;

use gaupal_core::{Error, Result};

use crate::artifact::{LoadStrategy, LoadedClassifier};
use crate::preprocess::ImagePreprocessor;

/// One entry of the ranked class list
#[derive(Debug, Clone, Serialize)]
pub struct ClassScore {
    pub class_id: usize,
    pub label: Option<String>,
    pub confidence: f32,
}

/// Result of a single image prediction
#[derive(Debug, Clone, Serialize)]
pub struct ImagePrediction {
    pub class_id: usize,
    pub label: Option<String>,
    pub confidence: f32,
    /// The k best classes, best first
    pub top: Vec<ClassScore>,
    pub inference_ms: f64,
}

impl ImagePrediction {
    /// Rank a softmax vector on the host: argmax for the winner plus a
    /// partial sort for the top-k list.
    fn from_probabilities(
        probabilities: Vec<f32>,
        class_names: Option<&[String]>,
        top_k: usize,
        inference_ms: f64,
    ) -> Self {
        let label_of = |idx: usize| class_names.and_then(|n| n.get(idx).cloned());

        let mut indexed: Vec<(usize, f32)> = probabilities.into_iter().enumerate().collect();
        indexed.sort_by(|a, b| b.1.total_cmp(&a.1));

        let top: Vec<ClassScore> = indexed
            .iter()
            .take(top_k)
            .map(|&(class_id, confidence)| ClassScore {
                class_id,
                label: label_of(class_id),
                confidence,
            })
            .collect();

        let (class_id, confidence) = indexed.first().copied().unwrap_or((0, 0.0));

        Self {
            class_id,
            label: label_of(class_id),
            confidence,
            top,
            inference_ms,
        }
    }
}

/// Predictor owning the preprocessor and the loaded classifier
pub struct ImagePredictor<B: Backend> {
    preprocessor: ImagePreprocessor,
    classifier: LoadedClassifier<B>,
    device: B::Device,
    top_k: usize,
}

impl<B: Backend> ImagePredictor<B> {
    pub fn new(
        classifier: LoadedClassifier<B>,
        preprocessor: ImagePreprocessor,
        device: B::Device,
        top_k: usize,
    ) -> Self {
        Self {
            preprocessor,
            classifier,
            device,
            top_k,
        }
    }

    /// Run single-sample inference on uploaded image bytes
    pub fn predict(&self, bytes: &[u8]) -> Result<ImagePrediction> {
        let start = Instant::now();

        let input = self.preprocessor.tensor::<B>(bytes, &self.device)?;
        let output = self.classifier.model.forward_softmax(input);
        let probabilities: Vec<f32> = output
            .into_data()
            .to_vec()
            .map_err(|e| Error::Model(format!("failed to read probabilities: {e:?}")))?;

        Ok(ImagePrediction::from_probabilities(
            probabilities,
            self.classifier.class_names.as_deref(),
            self.top_k,
            start.elapsed().as_secs_f64() * 1000.0,
        ))
    }

    pub fn has_class_names(&self) -> bool {
        self.classifier.class_names.is_some()
    }

    pub fn num_classes(&self) -> usize {
        self.classifier.config.num_classes
    }

    pub fn num_params(&self) -> usize {
        use burn::module::Module;
        self.classifier.model.num_params()
    }

    pub fn architecture(&self) -> &'static str {
        self.classifier.config.architecture()
    }

    pub fn strategy(&self) -> LoadStrategy {
        self.classifier.strategy
    }

    pub fn degraded(&self) -> bool {
        self.classifier.degraded
    }

    pub fn input_shape(&self) -> [usize; 4] {
        self.preprocessor.input_shape()
    }
}
