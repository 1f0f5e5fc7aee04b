//! Averaged-softmax ensemble of tabular nets.
//!
//! Artifact layout: `ensemble.json` (member count, net config, optional
//! class names) next to `member_0.mpk` .. `member_{N-1}.mpk`.

use std::fs;
use std::path::Path;

use burn::{
    module::Module,
    record::CompactRecorder,
    tensor::{backend::Backend, Tensor},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use gaupal_core::{Error, Result};

use crate::mlp::{TabularNet, TabularNetConfig};

/// Manifest stored as `ensemble.json`
#[derive(Debug, Serialize, Deserialize)]
pub struct EnsembleManifest {
    pub members: usize,
    pub net: TabularNetConfig,
    #[serde(default)]
    pub class_names: Option<Vec<String>>,
}

/// N-member ensemble; prediction averages the members' softmax distributions
#[derive(Debug)]
pub struct TabularEnsemble<B: Backend> {
    members: Vec<TabularNet<B>>,
    config: TabularNetConfig,
    class_names: Option<Vec<String>>,
    device: B::Device,
}

impl<B: Backend> TabularEnsemble<B> {
    /// Load an ensemble from its artifact directory
    pub fn load(dir: &Path, device: &B::Device) -> Result<Self> {
        let manifest_path = dir.join("ensemble.json");
        let raw = fs::read_to_string(&manifest_path).map_err(|e| {
            Error::Artifact(format!("cannot read {:?}: {}", manifest_path, e))
        })?;
        let manifest: EnsembleManifest = serde_json::from_str(&raw)
            .map_err(|e| Error::Artifact(format!("invalid manifest {:?}: {}", manifest_path, e)))?;

        if manifest.members == 0 {
            return Err(Error::Artifact(
                "ensemble manifest declares zero members".to_string(),
            ));
        }

        let recorder = CompactRecorder::new();
        let mut members = Vec::with_capacity(manifest.members);
        for i in 0..manifest.members {
            let path = dir.join(format!("member_{i}"));
            let member = manifest
                .net
                .init::<B>(device)
                .load_file(path.clone(), &recorder, device)
                .map_err(|e| Error::Artifact(format!("cannot load member {i}: {e}")))?;
            members.push(member);
        }

        info!("Loaded {} ensemble members from {:?}", members.len(), dir);

        Ok(Self {
            members,
            config: manifest.net,
            class_names: manifest.class_names,
            device: device.clone(),
        })
    }

    /// Save an ensemble artifact; used by tests and conversion tooling
    pub fn write_artifact(
        dir: &Path,
        members: Vec<TabularNet<B>>,
        config: &TabularNetConfig,
        class_names: Option<&[String]>,
    ) -> Result<()> {
        if members.is_empty() {
            return Err(Error::Artifact("refusing to write an empty ensemble".to_string()));
        }

        fs::create_dir_all(dir)?;
        let manifest = EnsembleManifest {
            members: members.len(),
            net: config.clone(),
            class_names: class_names.map(|n| n.to_vec()),
        };
        fs::write(
            dir.join("ensemble.json"),
            serde_json::to_string_pretty(&manifest)?,
        )?;

        let recorder = CompactRecorder::new();
        for (i, member) in members.into_iter().enumerate() {
            member
                .save_file(dir.join(format!("member_{i}")), &recorder)
                .map_err(|e| Error::Artifact(format!("cannot save member {i}: {e}")))?;
        }
        Ok(())
    }

    /// Softmax each member's logits, average the distributions and pick the
    /// argmax. Returns `(class_id, averaged probability)`.
    pub fn predict(&self, features: &[f32]) -> Result<(usize, f32)> {
        if features.len() != self.config.num_features {
            return Err(Error::Schema(format!(
                "expected {} features, got {}",
                self.config.num_features,
                features.len()
            )));
        }

        let input = Tensor::<B, 1>::from_floats(features, &self.device)
            .reshape([1, self.config.num_features]);

        let mut averaged = vec![0.0f32; self.config.num_outputs];
        for member in &self.members {
            let probs = burn::tensor::activation::softmax(member.forward(input.clone()), 1);
            let probs: Vec<f32> = probs
                .into_data()
                .to_vec()
                .map_err(|e| Error::Model(format!("failed to read probabilities: {e:?}")))?;
            for (acc, p) in averaged.iter_mut().zip(probs) {
                *acc += p;
            }
        }
        let n = self.members.len() as f32;
        for p in &mut averaged {
            *p /= n;
        }

        let (class_id, confidence) = averaged
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, &p)| (i, p))
            .ok_or_else(|| Error::Model("empty output distribution".to_string()))?;

        Ok((class_id, confidence))
    }

    pub fn num_members(&self) -> usize {
        self.members.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.config.num_outputs
    }

    pub fn class_names(&self) -> Option<&[String]> {
        self.class_names.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use tempfile::TempDir;

    type TestBackend = NdArray<f32>;

    fn write_test_ensemble(dir: &Path, members: usize) -> TabularNetConfig {
        let device = Default::default();
        let config = TabularNetConfig::new(5, 3).with_hidden_size(8);
        let nets = (0..members)
            .map(|_| config.init::<TestBackend>(&device))
            .collect();
        TabularEnsemble::<TestBackend>::write_artifact(dir, nets, &config, None).unwrap();
        config
    }

    #[test]
    fn test_roundtrip_and_predict() {
        let temp = TempDir::new().unwrap();
        let device = Default::default();
        write_test_ensemble(temp.path(), 3);

        let ensemble = TabularEnsemble::<TestBackend>::load(temp.path(), &device).unwrap();
        assert_eq!(ensemble.num_members(), 3);
        assert_eq!(ensemble.num_outputs(), 3);

        let (class_id, confidence) = ensemble.predict(&[0.5, -1.0, 0.0, 2.0, 1.0]).unwrap();
        assert!(class_id < 3);
        assert!(confidence > 0.0 && confidence <= 1.0);
    }

    #[test]
    fn test_zero_members_rejected() {
        let temp = TempDir::new().unwrap();
        let device: burn::tensor::Device<TestBackend> = Default::default();

        let manifest = EnsembleManifest {
            members: 0,
            net: TabularNetConfig::new(5, 3),
            class_names: None,
        };
        fs::write(
            temp.path().join("ensemble.json"),
            serde_json::to_string(&manifest).unwrap(),
        )
        .unwrap();

        let err = TabularEnsemble::<TestBackend>::load(temp.path(), &device).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
    }

    #[test]
    fn test_missing_member_record() {
        let temp = TempDir::new().unwrap();
        let device: burn::tensor::Device<TestBackend> = Default::default();
        write_test_ensemble(temp.path(), 2);
        fs::remove_file(temp.path().join("member_1.mpk")).unwrap();

        let err = TabularEnsemble::<TestBackend>::load(temp.path(), &device).unwrap_err();
        assert!(matches!(err, Error::Artifact(_)));
    }

    #[test]
    fn test_feature_width_checked() {
        let temp = TempDir::new().unwrap();
        let device = Default::default();
        write_test_ensemble(temp.path(), 1);

        let ensemble = TabularEnsemble::<TestBackend>::load(temp.path(), &device).unwrap();
        let err = ensemble.predict(&[1.0, 2.0]).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
    }
}
