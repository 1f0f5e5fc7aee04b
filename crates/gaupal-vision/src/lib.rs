//! Image model stack for the Gaupal services.
//!
//! This crate provides everything between an uploaded image and a JSON-ready
//! prediction: preprocessing into a CHW tensor, the CNN architecture, the
//! artifact format with its multi-strategy loading ladder, and the predictor.

pub mod artifact;
pub mod model;
pub mod predictor;
pub mod preprocess;

pub use artifact::{load_classifier, write_artifact, LoadStrategy, LoadedClassifier};
pub use model::{ArchPreset, CattleClassifier, CattleClassifierConfig};
pub use predictor::{ClassScore, ImagePrediction, ImagePredictor};
pub use preprocess::{ImagePreprocessor, PreprocessConfig, ScaleMode};
