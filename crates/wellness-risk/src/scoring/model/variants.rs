use super::classifier::Classifier;
use super::{EncodedFeatures, ModelInferenceError, ModelInput, RiskModel};
use crate::scoring::domain::RiskDomain;
use crate::scoring::encoder::{CategoryEncoder, UnknownCategoryError};

/// Measurement breakdown every base model is queried with; the request's age
/// group is the matching `value`.
pub const MEASURE_TYPE: &str = "Age";
/// Survey column the eye model was trained on.
pub const EYE_DIMENSION: &str = "Unnamed: 2";
/// Survey column the posture model was trained on.
pub const POSTURE_METRIC: &str = "Unnamed: 1";

const MAX_SCREEN_TIME_BUCKET: f64 = 24.0;

#[derive(Debug, Clone)]
pub struct VitaminDModel {
    classifier: Classifier,
    type_encoder: CategoryEncoder,
    value_encoder: CategoryEncoder,
}

impl VitaminDModel {
    pub const FEATURES: &'static [&'static str] = &["type", "value"];

    pub fn new(
        classifier: Classifier,
        type_encoder: CategoryEncoder,
        value_encoder: CategoryEncoder,
    ) -> Self {
        Self {
            classifier,
            type_encoder,
            value_encoder,
        }
    }
}

impl RiskModel for VitaminDModel {
    fn domain(&self) -> RiskDomain {
        RiskDomain::VitaminD
    }

    fn feature_names(&self) -> &'static [&'static str] {
        Self::FEATURES
    }

    fn encode(&self, input: &ModelInput<'_>) -> Result<EncodedFeatures, UnknownCategoryError> {
        let domain = self.domain();
        Ok(EncodedFeatures::new(vec![
            self.type_encoder.encode(domain, MEASURE_TYPE)?,
            self.value_encoder.encode(domain, input.age_group)?,
        ]))
    }

    fn predict(&self, features: &EncodedFeatures) -> Result<f64, ModelInferenceError> {
        self.classifier.predict_proba(features)
    }

    fn encoders(&self) -> Vec<&CategoryEncoder> {
        vec![&self.type_encoder, &self.value_encoder]
    }
}

#[derive(Debug, Clone)]
pub struct EyeModel {
    classifier: Classifier,
    type_encoder: CategoryEncoder,
    value_encoder: CategoryEncoder,
    dimension_encoder: CategoryEncoder,
}

impl EyeModel {
    pub const FEATURES: &'static [&'static str] = &["type", "value", "dimension"];

    pub fn new(
        classifier: Classifier,
        type_encoder: CategoryEncoder,
        value_encoder: CategoryEncoder,
        dimension_encoder: CategoryEncoder,
    ) -> Self {
        Self {
            classifier,
            type_encoder,
            value_encoder,
            dimension_encoder,
        }
    }
}

impl RiskModel for EyeModel {
    fn domain(&self) -> RiskDomain {
        RiskDomain::Eye
    }

    fn feature_names(&self) -> &'static [&'static str] {
        Self::FEATURES
    }

    fn encode(&self, input: &ModelInput<'_>) -> Result<EncodedFeatures, UnknownCategoryError> {
        let domain = self.domain();
        Ok(EncodedFeatures::new(vec![
            self.type_encoder.encode(domain, MEASURE_TYPE)?,
            self.value_encoder.encode(domain, input.age_group)?,
            self.dimension_encoder.encode(domain, EYE_DIMENSION)?,
        ]))
    }

    fn predict(&self, features: &EncodedFeatures) -> Result<f64, ModelInferenceError> {
        self.classifier.predict_proba(features)
    }

    fn encoders(&self) -> Vec<&CategoryEncoder> {
        vec![
            &self.type_encoder,
            &self.value_encoder,
            &self.dimension_encoder,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct PostureModel {
    classifier: Classifier,
    type_encoder: CategoryEncoder,
    value_encoder: CategoryEncoder,
    metric_encoder: CategoryEncoder,
}

impl PostureModel {
    pub const FEATURES: &'static [&'static str] = &["type", "value", "metric"];

    pub fn new(
        classifier: Classifier,
        type_encoder: CategoryEncoder,
        value_encoder: CategoryEncoder,
        metric_encoder: CategoryEncoder,
    ) -> Self {
        Self {
            classifier,
            type_encoder,
            value_encoder,
            metric_encoder,
        }
    }
}

impl RiskModel for PostureModel {
    fn domain(&self) -> RiskDomain {
        RiskDomain::Posture
    }

    fn feature_names(&self) -> &'static [&'static str] {
        Self::FEATURES
    }

    fn encode(&self, input: &ModelInput<'_>) -> Result<EncodedFeatures, UnknownCategoryError> {
        let domain = self.domain();
        Ok(EncodedFeatures::new(vec![
            self.type_encoder.encode(domain, MEASURE_TYPE)?,
            self.value_encoder.encode(domain, input.age_group)?,
            self.metric_encoder.encode(domain, POSTURE_METRIC)?,
        ]))
    }

    fn predict(&self, features: &EncodedFeatures) -> Result<f64, ModelInferenceError> {
        self.classifier.predict_proba(features)
    }

    fn encoders(&self) -> Vec<&CategoryEncoder> {
        vec![&self.type_encoder, &self.value_encoder, &self.metric_encoder]
    }
}

/// Dedicated eye classifier trained with daily screen time as a feature.
///
/// Screen time enters the vector as its whole-hour bucket, capped at 24.
#[derive(Debug, Clone)]
pub struct ScreenTimeEyeModel {
    classifier: Classifier,
    age_encoder: CategoryEncoder,
    sex_encoder: CategoryEncoder,
}

impl ScreenTimeEyeModel {
    pub const FEATURES: &'static [&'static str] = &["screen_time", "age", "sex"];

    pub fn new(
        classifier: Classifier,
        age_encoder: CategoryEncoder,
        sex_encoder: CategoryEncoder,
    ) -> Self {
        Self {
            classifier,
            age_encoder,
            sex_encoder,
        }
    }
}

impl RiskModel for ScreenTimeEyeModel {
    fn domain(&self) -> RiskDomain {
        RiskDomain::Eye
    }

    fn feature_names(&self) -> &'static [&'static str] {
        Self::FEATURES
    }

    fn encode(&self, input: &ModelInput<'_>) -> Result<EncodedFeatures, UnknownCategoryError> {
        let domain = self.domain();
        let bucket = input
            .screen_time_hours
            .floor()
            .clamp(0.0, MAX_SCREEN_TIME_BUCKET) as u32;
        Ok(EncodedFeatures::new(vec![
            bucket,
            self.age_encoder.encode(domain, input.age_group)?,
            self.sex_encoder.encode(domain, input.sex)?,
        ]))
    }

    fn predict(&self, features: &EncodedFeatures) -> Result<f64, ModelInferenceError> {
        self.classifier.predict_proba(features)
    }

    fn encoders(&self) -> Vec<&CategoryEncoder> {
        vec![&self.age_encoder, &self.sex_encoder]
    }
}
