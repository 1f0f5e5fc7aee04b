//! Symptom-based disease diagnosis.
//!
//! Requests carry a list of symptom names; the vectorizer one-hot encodes
//! them against the fixed training vocabulary and the ensemble votes on the
//! disease.

use std::path::Path;

use burn::tensor::backend::Backend;
use serde::Serialize;

use gaupal_core::catalog::{
    position_of, NUM_SYMPTOMS, SYMPTOM_DISEASE_NAMES, SYMPTOM_NAMES,
};
use gaupal_core::{Error, Result};

use crate::ensemble::TabularEnsemble;

/// One-hot encoder over the fixed symptom vocabulary.
///
/// Unknown symptom names are ignored rather than rejected, matching how the
/// deployed service treated free-text checkboxes it did not recognize.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymptomVectorizer;

impl SymptomVectorizer {
    pub fn encode(&self, symptoms: &[String]) -> Vec<f32> {
        let mut vector = vec![0.0f32; NUM_SYMPTOMS];
        for symptom in symptoms {
            if let Some(i) = position_of(&SYMPTOM_NAMES, symptom) {
                vector[i] = 1.0;
            }
        }
        vector
    }

    pub fn vocabulary(&self) -> &'static [&'static str] {
        &SYMPTOM_NAMES
    }
}

/// A diagnosed disease with the ensemble's averaged confidence
#[derive(Debug, Clone, Serialize)]
pub struct SymptomDiagnosis {
    pub class_id: usize,
    pub disease: String,
    pub confidence: f32,
}

/// Vectorizer plus disease ensemble behind one load/predict surface
#[derive(Debug)]
pub struct SymptomPredictor<B: Backend> {
    vectorizer: SymptomVectorizer,
    ensemble: TabularEnsemble<B>,
}

impl<B: Backend> SymptomPredictor<B> {
    /// Load the ensemble artifact and check it matches the vocabulary
    pub fn load(dir: &Path, device: &B::Device) -> Result<Self> {
        let ensemble = TabularEnsemble::load(dir, device)?;
        if ensemble.num_outputs() != SYMPTOM_DISEASE_NAMES.len() {
            return Err(Error::Artifact(format!(
                "ensemble predicts {} classes, catalog has {}",
                ensemble.num_outputs(),
                SYMPTOM_DISEASE_NAMES.len()
            )));
        }
        Ok(Self {
            vectorizer: SymptomVectorizer,
            ensemble,
        })
    }

    pub fn predict(&self, symptoms: &[String]) -> Result<SymptomDiagnosis> {
        let features = self.vectorizer.encode(symptoms);
        let (class_id, confidence) = self.ensemble.predict(&features)?;

        let disease = self
            .ensemble
            .class_names()
            .and_then(|names| names.get(class_id).cloned())
            .unwrap_or_else(|| SYMPTOM_DISEASE_NAMES[class_id].to_string());

        Ok(SymptomDiagnosis {
            class_id,
            disease,
            confidence,
        })
    }

    pub fn members(&self) -> usize {
        self.ensemble.num_members()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mlp::TabularNetConfig;
    use burn::backend::NdArray;
    use tempfile::TempDir;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_encode_known_symptoms() {
        let v = SymptomVectorizer;
        let out = v.encode(&["anorexia".into(), "weakness".into()]);
        assert_eq!(out.len(), NUM_SYMPTOMS);
        assert_eq!(out[0], 1.0);
        assert_eq!(out[91], 1.0);
        assert_eq!(out.iter().sum::<f32>(), 2.0);
    }

    #[test]
    fn test_encode_ignores_unknown_and_repeats() {
        let v = SymptomVectorizer;
        let out = v.encode(&[
            "fever".into(),
            "fever".into(),
            "not_a_symptom".into(),
            "Fever".into(),
        ]);
        assert_eq!(out.iter().sum::<f32>(), 1.0);
    }

    #[test]
    fn test_encode_empty() {
        let out = SymptomVectorizer.encode(&[]);
        assert!(out.iter().all(|&x| x == 0.0));
    }

    fn write_test_ensemble(dir: &std::path::Path, outputs: usize) {
        let device = Default::default();
        let config = TabularNetConfig::new(NUM_SYMPTOMS, outputs).with_hidden_size(8);
        let nets = (0..2)
            .map(|_| config.init::<TestBackend>(&device))
            .collect();
        TabularEnsemble::<TestBackend>::write_artifact(dir, nets, &config, None).unwrap();
    }

    #[test]
    fn test_load_and_predict() {
        let temp = TempDir::new().unwrap();
        let device = Default::default();
        write_test_ensemble(temp.path(), SYMPTOM_DISEASE_NAMES.len());

        let predictor = SymptomPredictor::<TestBackend>::load(temp.path(), &device).unwrap();
        assert_eq!(predictor.members(), 2);

        let diagnosis = predictor
            .predict(&["fever".into(), "lameness".into()])
            .unwrap();
        assert!(diagnosis.class_id < SYMPTOM_DISEASE_NAMES.len());
        assert_eq!(
            diagnosis.disease,
            SYMPTOM_DISEASE_NAMES[diagnosis.class_id]
        );
        assert!(diagnosis.confidence > 0.0 && diagnosis.confidence <= 1.0);
    }

    #[test]
    fn test_class_count_mismatch_rejected() {
        let temp = TempDir::new().unwrap();
        let device: burn::tensor::Device<TestBackend> = Default::default();
        write_test_ensemble(temp.path(), 7);

        let err = SymptomPredictor::<TestBackend>::load(temp.path(), &device).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
    }
}
