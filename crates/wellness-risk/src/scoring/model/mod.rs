//! Trained classifiers wrapped with the encoders they were fitted against.

mod classifier;
mod variants;

pub use classifier::{Classifier, ClassifierSpec, TableEntry};
pub use variants::{
    EyeModel, PostureModel, ScreenTimeEyeModel, VitaminDModel, EYE_DIMENSION, MEASURE_TYPE,
    POSTURE_METRIC,
};

use std::fmt;

use super::domain::RiskDomain;
use super::encoder::{CategoryEncoder, UnknownCategoryError};

/// Ordered integer codes, one per categorical input a model requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EncodedFeatures(Vec<u32>);

impl EncodedFeatures {
    pub fn new(codes: Vec<u32>) -> Self {
        Self(codes)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Request attributes a model may encode. `age_group` fills the `value`
/// slot of the base models; the other fields feed the screen-time classifier.
#[derive(Debug, Clone, Copy)]
pub struct ModelInput<'a> {
    pub age_group: &'a str,
    pub sex: &'a str,
    pub screen_time_hours: f64,
}

/// Shared "predict a probability" capability of every trained model.
///
/// Implementations are immutable after loading so a single instance can serve
/// concurrent requests.
pub trait RiskModel: Send + Sync + fmt::Debug {
    fn domain(&self) -> RiskDomain;

    /// Names of the encoded inputs, in feature-vector order.
    fn feature_names(&self) -> &'static [&'static str];

    fn encode(&self, input: &ModelInput<'_>) -> Result<EncodedFeatures, UnknownCategoryError>;

    fn predict(&self, features: &EncodedFeatures) -> Result<f64, ModelInferenceError>;

    fn encoders(&self) -> Vec<&CategoryEncoder>;
}

/// The classifier call itself failed on a structurally valid request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelInferenceError {
    #[error("classifier expects {expected} features but received {actual}")]
    ShapeMismatch { expected: usize, actual: usize },
    #[error("classifier has no estimate for feature codes {codes:?}")]
    UnseenFeatures { codes: Vec<u32> },
    #[error("classifier produced an invalid probability ({0})")]
    InvalidProbability(f64),
}
