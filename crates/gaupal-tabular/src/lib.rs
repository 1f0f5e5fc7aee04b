//! Tabular model stack for the Gaupal services.
//!
//! Provides the feature schema that replays training-time preprocessing, the
//! small MLP networks, the averaged-softmax ensemble, and the two tabular
//! predictors (breeding compatibility and symptom-based disease Q&A).

pub mod breeding;
pub mod ensemble;
pub mod mlp;
pub mod schema;
pub mod symptoms;

pub use breeding::{BreedingAssessment, BreedingPredictor, BreedingRecord};
pub use ensemble::TabularEnsemble;
pub use mlp::{TabularNet, TabularNetConfig};
pub use schema::{Column, ColumnKind, FeatureSchema, FeatureValue};
pub use symptoms::{SymptomDiagnosis, SymptomPredictor, SymptomVectorizer};
