use std::collections::HashMap;

use serde::Deserialize;

use super::{EncodedFeatures, ModelInferenceError};

/// Serialized classifier as stored in a model artifact.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierSpec {
    /// Sigmoid over a linear combination of the feature codes.
    Logistic {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    /// Explicit probability per feature-code tuple.
    Table {
        entries: Vec<TableEntry>,
        #[serde(default)]
        fallback: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableEntry {
    pub features: Vec<u32>,
    pub probability: f64,
}

/// Validated, read-only classifier ready for inference.
#[derive(Debug, Clone)]
pub struct Classifier {
    feature_count: usize,
    kind: ClassifierKind,
}

#[derive(Debug, Clone)]
enum ClassifierKind {
    Logistic {
        intercept: f64,
        coefficients: Vec<f64>,
    },
    Table {
        entries: HashMap<Vec<u32>, f64>,
        fallback: Option<f64>,
    },
}

impl Classifier {
    /// Check the serialized form against the number of features the owning
    /// model encodes.
    pub fn from_spec(spec: ClassifierSpec, feature_count: usize) -> Result<Self, String> {
        let kind = match spec {
            ClassifierSpec::Logistic {
                intercept,
                coefficients,
            } => {
                if coefficients.len() != feature_count {
                    return Err(format!(
                        "logistic classifier has {} coefficients, expected {}",
                        coefficients.len(),
                        feature_count
                    ));
                }
                if !intercept.is_finite() || coefficients.iter().any(|value| !value.is_finite()) {
                    return Err("logistic classifier has non-finite parameters".to_string());
                }
                ClassifierKind::Logistic {
                    intercept,
                    coefficients,
                }
            }
            ClassifierSpec::Table { entries, fallback } => {
                if let Some(value) = fallback {
                    if !is_probability(value) {
                        return Err(format!("table fallback {value} is not a probability"));
                    }
                }

                let mut table = HashMap::with_capacity(entries.len());
                for entry in entries {
                    if entry.features.len() != feature_count {
                        return Err(format!(
                            "table entry {:?} has {} features, expected {}",
                            entry.features,
                            entry.features.len(),
                            feature_count
                        ));
                    }
                    if !is_probability(entry.probability) {
                        return Err(format!(
                            "table entry {:?} has invalid probability {}",
                            entry.features, entry.probability
                        ));
                    }
                    table.insert(entry.features, entry.probability);
                }

                ClassifierKind::Table {
                    entries: table,
                    fallback,
                }
            }
        };

        Ok(Self {
            feature_count,
            kind,
        })
    }

    pub fn feature_count(&self) -> usize {
        self.feature_count
    }

    /// Probability of the positive (at-risk) class.
    pub fn predict_proba(&self, features: &EncodedFeatures) -> Result<f64, ModelInferenceError> {
        if features.len() != self.feature_count {
            return Err(ModelInferenceError::ShapeMismatch {
                expected: self.feature_count,
                actual: features.len(),
            });
        }

        let probability = match &self.kind {
            ClassifierKind::Logistic {
                intercept,
                coefficients,
            } => {
                let logit = features
                    .as_slice()
                    .iter()
                    .zip(coefficients)
                    .fold(*intercept, |acc, (code, weight)| acc + f64::from(*code) * weight);
                1.0 / (1.0 + (-logit).exp())
            }
            ClassifierKind::Table { entries, fallback } => entries
                .get(features.as_slice())
                .copied()
                .or(*fallback)
                .ok_or_else(|| ModelInferenceError::UnseenFeatures {
                    codes: features.as_slice().to_vec(),
                })?,
        };

        if is_probability(probability) {
            Ok(probability)
        } else {
            Err(ModelInferenceError::InvalidProbability(probability))
        }
    }
}

fn is_probability(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}
