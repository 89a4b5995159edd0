use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::config::ScreenTimeModelMode;
use crate::scoring::domain::{RiskDomain, RiskRequest};
use crate::scoring::encoder::{CategoryEncoder, UnknownCategoryError};
use crate::scoring::model::{
    Classifier, ClassifierSpec, EncodedFeatures, EyeModel, ModelInferenceError, ModelInput,
    PostureModel, RiskModel, ScreenTimeEyeModel, VitaminDModel,
};
use crate::scoring::profile::{AGE_GROUPS, SEXES};
use crate::scoring::registry::ModelRegistry;
use crate::scoring::{risk_router, RiskEngine};

fn encoder(field: &'static str, classes: &[&str]) -> CategoryEncoder {
    CategoryEncoder::new(field, classes.iter().map(|class| class.to_string()).collect())
        .expect("valid vocabulary")
}

fn type_encoder() -> CategoryEncoder {
    encoder("type", &["Age", "Total persons 15 years and over"])
}

fn value_encoder() -> CategoryEncoder {
    encoder("value", &AGE_GROUPS)
}

/// Classifier answering `probability` for every in-vocabulary vector.
fn constant(feature_count: usize, probability: f64) -> Classifier {
    Classifier::from_spec(
        ClassifierSpec::Table {
            entries: Vec::new(),
            fallback: Some(probability),
        },
        feature_count,
    )
    .expect("valid table")
}

pub(super) fn vitamin_d_model(probability: f64) -> Arc<dyn RiskModel> {
    Arc::new(VitaminDModel::new(
        constant(2, probability),
        type_encoder(),
        value_encoder(),
    ))
}

pub(super) fn eye_model(probability: f64) -> Arc<dyn RiskModel> {
    Arc::new(EyeModel::new(
        constant(3, probability),
        type_encoder(),
        value_encoder(),
        encoder("dimension", &["Unnamed: 1", "Unnamed: 2", "Unnamed: 3"]),
    ))
}

pub(super) fn posture_model(probability: f64) -> Arc<dyn RiskModel> {
    Arc::new(PostureModel::new(
        constant(3, probability),
        type_encoder(),
        value_encoder(),
        encoder("metric", &["Unnamed: 1", "Unnamed: 2"]),
    ))
}

pub(super) fn screen_time_model(probability: f64) -> Arc<dyn RiskModel> {
    Arc::new(ScreenTimeEyeModel::new(
        constant(3, probability),
        encoder("age", &AGE_GROUPS),
        encoder("sex", &SEXES),
    ))
}

/// Model whose encode step always succeeds and whose predict step is scripted.
#[derive(Debug)]
pub(super) struct ScriptedModel {
    pub(super) domain: RiskDomain,
    pub(super) outcome: Result<f64, ModelInferenceError>,
}

impl RiskModel for ScriptedModel {
    fn domain(&self) -> RiskDomain {
        self.domain
    }

    fn feature_names(&self) -> &'static [&'static str] {
        &["type", "value"]
    }

    fn encode(&self, _input: &ModelInput<'_>) -> Result<EncodedFeatures, UnknownCategoryError> {
        Ok(EncodedFeatures::new(vec![0, 1]))
    }

    fn predict(&self, _features: &EncodedFeatures) -> Result<f64, ModelInferenceError> {
        self.outcome.clone()
    }

    fn encoders(&self) -> Vec<&CategoryEncoder> {
        Vec::new()
    }
}

pub(super) fn failing_model(domain: RiskDomain) -> Arc<dyn RiskModel> {
    Arc::new(ScriptedModel {
        domain,
        outcome: Err(ModelInferenceError::ShapeMismatch {
            expected: 3,
            actual: 2,
        }),
    })
}

pub(super) fn registry(vitamin_d: f64, eye: f64, posture: f64) -> ModelRegistry {
    ModelRegistry::builder()
        .with_model(vitamin_d_model(vitamin_d))
        .with_model(eye_model(eye))
        .with_model(posture_model(posture))
        .build()
}

pub(super) fn engine(vitamin_d: f64, eye: f64, posture: f64) -> RiskEngine {
    RiskEngine::new(
        Arc::new(registry(vitamin_d, eye, posture)),
        ScreenTimeModelMode::Disabled,
    )
}

pub(super) fn router_with(engine: RiskEngine) -> axum::Router {
    risk_router(Arc::new(engine))
}

pub(super) fn request(age_group: &str, sex: &str, state: &str, remoteness: &str) -> RiskRequest {
    RiskRequest {
        age_group: Some(age_group.to_string()),
        sex: Some(sex.to_string()),
        state: Some(state.to_string()),
        remoteness_area: Some(remoteness.to_string()),
        screen_time: None,
    }
}

pub(super) fn screen_time_request(hours: f64) -> RiskRequest {
    RiskRequest {
        age_group: Some("25–34".to_string()),
        sex: Some("Male".to_string()),
        screen_time: Some(hours),
        ..RiskRequest::default()
    }
}

pub(super) fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Fresh scratch directory under the system temp dir.
pub(super) fn scratch_dir(label: &str) -> PathBuf {
    static SEQUENCE: AtomicU64 = AtomicU64::new(0);
    let id = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!(
        "wellness-risk-{label}-{}-{id}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}
