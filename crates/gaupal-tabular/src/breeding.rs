//! Breeding compatibility predictor.
//!
//! A request carries the raw cow/bull traits; the engineered columns the
//! models were trained on (`FE_*` differences, sums and copy-downs) are
//! computed here at request time, then the schema replays the training-time
//! scaling, one-hot encoding and feature selection before the classifier and
//! regressor heads run.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use burn::{
    config::Config,
    module::Module,
    record::CompactRecorder,
    tensor::{backend::Backend, Tensor},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use gaupal_core::{Error, Result};

use crate::mlp::{TabularNet, TabularNetConfig};
use crate::schema::{FeatureSchema, FeatureValue};

/// Default CCS score bounds when the artifact omits them
pub const DEFAULT_MIN_CCS: f64 = -50.0;
pub const DEFAULT_MAX_CCS: f64 = 85.0;

/// A breeding request, field names as trained and served historically.
///
/// The defaulted fields were optional in the deployed contract; clients that
/// omit them get zeros, and the copy-down fields are overwritten from their
/// source columns regardless of what the client sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedingRecord {
    #[serde(rename = "Cow_Breed")]
    pub cow_breed: String,
    #[serde(rename = "Cow_Age")]
    pub cow_age: i64,
    #[serde(rename = "Cow_Weight")]
    pub cow_weight: f32,
    #[serde(rename = "Cow_Height")]
    pub cow_height: f32,
    #[serde(rename = "Cow_Milk_Yield")]
    pub cow_milk_yield: f32,
    #[serde(rename = "Cow_Health_Status")]
    pub cow_health_status: i64,
    #[serde(rename = "Cow_Drought_Resistance")]
    pub cow_drought_resistance: f32,
    #[serde(rename = "Cow_Temperament")]
    pub cow_temperament: String,
    #[serde(rename = "Bull_Breed")]
    pub bull_breed: String,
    #[serde(rename = "Bull_Age")]
    pub bull_age: i64,
    #[serde(rename = "Bull_Weight")]
    pub bull_weight: f32,
    #[serde(rename = "Bull_Height")]
    pub bull_height: f32,
    #[serde(rename = "Bull_Health_Status")]
    pub bull_health_status: i64,
    #[serde(rename = "Bull_Mother_Milk_Yield")]
    pub bull_mother_milk_yield: f32,
    #[serde(rename = "Bull_Drought_Resistance")]
    pub bull_drought_resistance: f32,
    #[serde(rename = "Bull_Temperament")]
    pub bull_temperament: String,
    #[serde(rename = "Same_Parents")]
    pub same_parents: i64,
    #[serde(rename = "Trait_Difference")]
    pub trait_difference: f32,
    #[serde(rename = "Genetic_Diversity")]
    pub genetic_diversity: f32,
    #[serde(rename = "Fertility_Rate")]
    pub fertility_rate: f32,
    #[serde(rename = "Breeding_Success_Rate")]
    pub breeding_success_rate: f32,
    #[serde(rename = "Disease_Resistance_Score")]
    pub disease_resistance_score: f32,
    #[serde(rename = "Market_Value")]
    pub market_value: f32,
    #[serde(rename = "Past_Breeding_Success")]
    pub past_breeding_success: String,
    #[serde(rename = "Bull_Disease_Resistance_Score", default)]
    pub bull_disease_resistance_score: f32,
    #[serde(rename = "Cow_Disease_Resistance_Score", default)]
    pub cow_disease_resistance_score: f32,
    #[serde(rename = "Bull_Genetic_Diversity_Score", default)]
    pub bull_genetic_diversity_score: f32,
    #[serde(rename = "Cow_Genetic_Diversity_Score", default)]
    pub cow_genetic_diversity_score: f32,
    #[serde(rename = "Bull_Disease", default)]
    pub bull_disease: i64,
    #[serde(rename = "Cow_Disease", default)]
    pub cow_disease: i64,
    #[serde(rename = "Bull_Same_Parents", default)]
    pub bull_same_parents: i64,
    #[serde(rename = "Cow_Same_Parents", default)]
    pub cow_same_parents: i64,
    #[serde(rename = "Bull_Fertility_Rate")]
    pub bull_fertility_rate: f32,
    #[serde(rename = "Cow_Fertility_Rate")]
    pub cow_fertility_rate: f32,
    #[serde(rename = "Bull_Breeding_Success_Rate")]
    pub bull_breeding_success_rate: f32,
    #[serde(rename = "Cow_Breeding_Success_Rate")]
    pub cow_breeding_success_rate: f32,
    #[serde(rename = "Bull_Past_Breeding_Success")]
    pub bull_past_breeding_success: String,
    #[serde(rename = "Cow_Past_Breeding_Success")]
    pub cow_past_breeding_success: String,
    #[serde(rename = "Bull_Market_Value")]
    pub bull_market_value: f32,
    #[serde(rename = "Cow_Market_Value")]
    pub cow_market_value: f32,
    #[serde(rename = "Bull_Milk_Yield", default)]
    pub bull_milk_yield: f32,
    #[serde(rename = "Cow_Mother_Milk_Yield")]
    pub cow_mother_milk_yield: f32,
}

impl BreedingRecord {
    /// Build the full feature map: raw fields plus the engineered columns.
    /// Copy-downs overwrite any client-supplied values.
    pub fn feature_map(&self) -> HashMap<String, FeatureValue> {
        let mut m: HashMap<String, FeatureValue> = HashMap::new();

        m.insert("Cow_Breed".into(), self.cow_breed.clone().into());
        m.insert("Cow_Age".into(), self.cow_age.into());
        m.insert("Cow_Weight".into(), self.cow_weight.into());
        m.insert("Cow_Height".into(), self.cow_height.into());
        m.insert("Cow_Milk_Yield".into(), self.cow_milk_yield.into());
        m.insert("Cow_Health_Status".into(), self.cow_health_status.into());
        m.insert("Cow_Drought_Resistance".into(), self.cow_drought_resistance.into());
        m.insert("Cow_Temperament".into(), self.cow_temperament.clone().into());
        m.insert("Bull_Breed".into(), self.bull_breed.clone().into());
        m.insert("Bull_Age".into(), self.bull_age.into());
        m.insert("Bull_Weight".into(), self.bull_weight.into());
        m.insert("Bull_Height".into(), self.bull_height.into());
        m.insert("Bull_Health_Status".into(), self.bull_health_status.into());
        m.insert("Bull_Mother_Milk_Yield".into(), self.bull_mother_milk_yield.into());
        m.insert("Bull_Drought_Resistance".into(), self.bull_drought_resistance.into());
        m.insert("Bull_Temperament".into(), self.bull_temperament.clone().into());
        m.insert("Same_Parents".into(), self.same_parents.into());
        m.insert("Trait_Difference".into(), self.trait_difference.into());
        m.insert("Genetic_Diversity".into(), self.genetic_diversity.into());
        m.insert("Fertility_Rate".into(), self.fertility_rate.into());
        m.insert("Breeding_Success_Rate".into(), self.breeding_success_rate.into());
        m.insert("Disease_Resistance_Score".into(), self.disease_resistance_score.into());
        m.insert("Market_Value".into(), self.market_value.into());
        m.insert("Past_Breeding_Success".into(), self.past_breeding_success.clone().into());
        m.insert("Bull_Genetic_Diversity_Score".into(), self.bull_genetic_diversity_score.into());
        m.insert("Cow_Genetic_Diversity_Score".into(), self.cow_genetic_diversity_score.into());
        m.insert("Bull_Same_Parents".into(), self.bull_same_parents.into());
        m.insert("Cow_Same_Parents".into(), self.cow_same_parents.into());
        m.insert("Bull_Fertility_Rate".into(), self.bull_fertility_rate.into());
        m.insert("Cow_Fertility_Rate".into(), self.cow_fertility_rate.into());
        m.insert("Bull_Breeding_Success_Rate".into(), self.bull_breeding_success_rate.into());
        m.insert("Cow_Breeding_Success_Rate".into(), self.cow_breeding_success_rate.into());
        m.insert("Bull_Market_Value".into(), self.bull_market_value.into());
        m.insert("Cow_Market_Value".into(), self.cow_market_value.into());
        m.insert("Bull_Milk_Yield".into(), self.bull_milk_yield.into());
        m.insert("Cow_Mother_Milk_Yield".into(), self.cow_mother_milk_yield.into());

        // Engineered differences and ratios, with guards for zero cow
        // measurements.
        m.insert(
            "FE_Age_Diff".into(),
            (((self.bull_age - self.cow_age).abs()) as f32).into(),
        );
        let weight_diff_pct = if self.cow_weight != 0.0 {
            (self.bull_weight - self.cow_weight).abs() / self.cow_weight * 100.0
        } else {
            0.0
        };
        m.insert("FE_Weight_Diff_Pct".into(), weight_diff_pct.into());
        let height_diff_pct = if self.cow_height != 0.0 {
            (self.bull_height - self.cow_height).abs() / self.cow_height * 100.0
        } else {
            0.0
        };
        m.insert("FE_Height_Diff_Pct".into(), height_diff_pct.into());
        m.insert(
            "FE_Drought_Diff".into(),
            (self.bull_drought_resistance - self.cow_drought_resistance)
                .abs()
                .into(),
        );
        m.insert(
            "FE_Milk_Sum".into(),
            (self.cow_milk_yield + self.bull_mother_milk_yield).into(),
        );
        m.insert(
            "FE_Combined_Health".into(),
            ((self.bull_health_status + self.cow_health_status) as f32).into(),
        );
        m.insert(
            "FE_Temperament_Combo".into(),
            (if self.bull_temperament == self.cow_temperament {
                1.0f32
            } else {
                0.0
            })
            .into(),
        );

        // Copy-downs from the shared columns.
        m.insert(
            "Bull_Disease_Resistance_Score".into(),
            self.disease_resistance_score.into(),
        );
        m.insert(
            "Cow_Disease_Resistance_Score".into(),
            self.disease_resistance_score.into(),
        );
        m.insert("Bull_Disease".into(), self.bull_health_status.into());
        m.insert("Cow_Disease".into(), self.cow_health_status.into());
        m.insert(
            "Bull_Past_Breeding_Success".into(),
            self.past_breeding_success.clone().into(),
        );
        m.insert(
            "Cow_Past_Breeding_Success".into(),
            self.past_breeding_success.clone().into(),
        );

        m
    }
}

/// Manifest stored as `schema.json` in the breeding artifact
#[derive(Debug, Serialize, Deserialize)]
pub struct BreedingManifest {
    #[serde(flatten)]
    pub schema: FeatureSchema,
    #[serde(default)]
    pub min_ccs: Option<f64>,
    #[serde(default)]
    pub max_ccs: Option<f64>,
}

/// Map a raw CCS regression score into a 0-100 compatibility percentage
pub fn ccs_to_percentage(ccs: f64, min_ccs: f64, max_ccs: f64) -> f64 {
    if max_ccs == min_ccs {
        return 50.0;
    }
    let clipped = ccs.clamp(min_ccs, max_ccs);
    (clipped - min_ccs) / (max_ccs - min_ccs) * 100.0
}

/// Result of a breeding compatibility assessment
#[derive(Debug, Clone, Serialize)]
pub struct BreedingAssessment {
    /// Classifier verdict: probability of class 1 at least 0.5
    pub compatible: bool,
    /// CCS regression mapped into a percentage
    pub confidence_pct: f64,
    /// Raw CCS regression output
    pub raw_ccs: f64,
}

/// Predictor pairing the classifier and regressor heads behind one schema
#[derive(Debug)]
pub struct BreedingPredictor<B: Backend> {
    schema: FeatureSchema,
    classifier: TabularNet<B>,
    regressor: TabularNet<B>,
    min_ccs: f64,
    max_ccs: f64,
    device: B::Device,
}

impl<B: Backend> BreedingPredictor<B> {
    /// Load the breeding artifact: `schema.json`, `classifier.mpk` +
    /// `classifier.config.json`, `regressor.mpk` + `regressor.config.json`.
    pub fn load(dir: &Path, device: &B::Device) -> Result<Self> {
        let manifest_path = dir.join("schema.json");
        let raw = fs::read_to_string(&manifest_path)
            .map_err(|e| Error::Artifact(format!("cannot read {:?}: {}", manifest_path, e)))?;
        let manifest: BreedingManifest = serde_json::from_str(&raw)
            .map_err(|e| Error::Artifact(format!("invalid manifest {:?}: {}", manifest_path, e)))?;

        let classifier = load_net::<B>(dir, "classifier", device)?;
        let regressor = load_net::<B>(dir, "regressor", device)?;

        info!(
            "Breeding artifact loaded from {:?} ({} features)",
            dir,
            manifest.schema.num_features()
        );

        Ok(Self {
            schema: manifest.schema,
            classifier,
            regressor,
            min_ccs: manifest.min_ccs.unwrap_or(DEFAULT_MIN_CCS),
            max_ccs: manifest.max_ccs.unwrap_or(DEFAULT_MAX_CCS),
            device: device.clone(),
        })
    }

    /// Assess one cow/bull pairing
    pub fn predict(&self, record: &BreedingRecord) -> Result<BreedingAssessment> {
        let features = self.schema.transform(&record.feature_map())?;
        let input = Tensor::<B, 1>::from_floats(features.as_slice(), &self.device)
            .reshape([1, features.len()]);

        let class_probs = burn::tensor::activation::softmax(
            self.classifier.forward(input.clone()),
            1,
        );
        let class_probs: Vec<f32> = class_probs
            .into_data()
            .to_vec()
            .map_err(|e| Error::Model(format!("failed to read classifier output: {e:?}")))?;
        let p_compatible = class_probs
            .get(1)
            .copied()
            .ok_or_else(|| Error::Model("classifier head has fewer than 2 outputs".to_string()))?;

        let ccs: Vec<f32> = self
            .regressor
            .forward(input)
            .into_data()
            .to_vec()
            .map_err(|e| Error::Model(format!("failed to read regressor output: {e:?}")))?;
        let raw_ccs = ccs
            .first()
            .copied()
            .ok_or_else(|| Error::Model("regressor produced no output".to_string()))?
            as f64;

        Ok(BreedingAssessment {
            compatible: p_compatible >= 0.5,
            confidence_pct: ccs_to_percentage(raw_ccs, self.min_ccs, self.max_ccs),
            raw_ccs,
        })
    }

    pub fn num_features(&self) -> usize {
        self.schema.num_features()
    }
}

fn load_net<B: Backend>(dir: &Path, name: &str, device: &B::Device) -> Result<TabularNet<B>> {
    let config_path = dir.join(format!("{name}.config.json"));
    let config = TabularNetConfig::load(&config_path)
        .map_err(|e| Error::Artifact(format!("cannot load {:?}: {}", config_path, e)))?;
    config
        .init::<B>(device)
        .load_file(dir.join(name), &CompactRecorder::new(), device)
        .map_err(|e| Error::Artifact(format!("cannot load {name} record: {e}")))
}

/// Save a breeding artifact; used by tests and conversion tooling
pub fn write_breeding_artifact<B: Backend>(
    dir: &Path,
    manifest: &BreedingManifest,
    classifier: TabularNet<B>,
    classifier_config: &TabularNetConfig,
    regressor: TabularNet<B>,
    regressor_config: &TabularNetConfig,
) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join("schema.json"), serde_json::to_string_pretty(manifest)?)?;

    classifier_config.save(dir.join("classifier.config.json"))?;
    regressor_config.save(dir.join("regressor.config.json"))?;

    let recorder = CompactRecorder::new();
    classifier
        .save_file(dir.join("classifier"), &recorder)
        .map_err(|e| Error::Artifact(format!("cannot save classifier record: {e}")))?;
    regressor
        .save_file(dir.join("regressor"), &recorder)
        .map_err(|e| Error::Artifact(format!("cannot save regressor record: {e}")))?;
    Ok(())
}
