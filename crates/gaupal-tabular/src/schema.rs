//! Feature schema replaying training-time preprocessing at inference.
//!
//! The tabular models were trained behind a preprocessing pipeline (scaling,
//! one-hot encoding, feature selection). The schema serializes that pipeline
//! so a request can be transformed into exactly the feature vector the nets
//! expect.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use gaupal_core::{Error, Result};

/// A raw feature value before transformation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Number(f32),
    Text(String),
}

impl From<f32> for FeatureValue {
    fn from(v: f32) -> Self {
        FeatureValue::Number(v)
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Number(v as f32)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}

/// How one input column is transformed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ColumnKind {
    /// Standard scaling: `(v - mean) / std`
    Numeric { mean: f32, std: f32 },
    /// One-hot over the known category values; unknown values encode to all
    /// zeros, matching the training-time "ignore unknown" behavior
    Categorical { values: Vec<String> },
}

/// One input column of the trained pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(flatten)]
    pub kind: ColumnKind,
}

/// The full trained preprocessing pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureSchema {
    pub columns: Vec<Column>,
    /// Feature selection applied during training, replayed at inference
    #[serde(default)]
    pub selected_indices: Option<Vec<usize>>,
}

impl FeatureSchema {
    /// Transform a feature map into the vector the nets expect
    pub fn transform(&self, features: &HashMap<String, FeatureValue>) -> Result<Vec<f32>> {
        let mut out = Vec::with_capacity(self.columns.len());

        for column in &self.columns {
            let value = features.get(&column.name).ok_or_else(|| {
                Error::Schema(format!("missing input column '{}'", column.name))
            })?;

            match &column.kind {
                ColumnKind::Numeric { mean, std } => {
                    let v = match value {
                        FeatureValue::Number(v) => *v,
                        FeatureValue::Text(t) => {
                            return Err(Error::Schema(format!(
                                "column '{}' expects a number, got '{}'",
                                column.name, t
                            )))
                        }
                    };
                    // A constant training column has std 0; it carries no
                    // signal and transforms to 0.
                    out.push(if *std == 0.0 { 0.0 } else { (v - mean) / std });
                }
                ColumnKind::Categorical { values } => {
                    let text = match value {
                        FeatureValue::Text(t) => t.as_str(),
                        FeatureValue::Number(_) => {
                            return Err(Error::Schema(format!(
                                "column '{}' expects a category, got a number",
                                column.name
                            )))
                        }
                    };
                    for known in values {
                        out.push(if known == text { 1.0 } else { 0.0 });
                    }
                }
            }
        }

        match &self.selected_indices {
            Some(indices) => indices
                .iter()
                .map(|&i| {
                    out.get(i).copied().ok_or_else(|| {
                        Error::Schema(format!(
                            "selected index {} out of range for {} features",
                            i,
                            out.len()
                        ))
                    })
                })
                .collect(),
            None => Ok(out),
        }
    }

    /// Post-selection feature width, the input size of the nets
    pub fn num_features(&self) -> usize {
        match &self.selected_indices {
            Some(indices) => indices.len(),
            None => self
                .columns
                .iter()
                .map(|c| match &c.kind {
                    ColumnKind::Numeric { .. } => 1,
                    ColumnKind::Categorical { values } => values.len(),
                })
                .sum(),
        }
    }
}
