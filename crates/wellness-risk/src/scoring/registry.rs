use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use super::domain::RiskDomain;
use super::encoder::CategoryEncoder;
use super::model::{
    Classifier, ClassifierSpec, EyeModel, PostureModel, RiskModel, ScreenTimeEyeModel,
    VitaminDModel,
};

/// File stem of the optional dedicated screen-time eye classifier.
pub const SCREEN_TIME_ARTIFACT: &str = "eye_screen_time";

/// A domain's artifacts could not be turned into a usable model. The domain
/// stays unavailable for the lifetime of the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{domain} model loading failed: {detail}")]
pub struct ModelLoadError {
    pub domain: RiskDomain,
    pub detail: String,
}

impl ModelLoadError {
    pub fn new(domain: RiskDomain, detail: impl Into<String>) -> Self {
        Self {
            domain,
            detail: detail.into(),
        }
    }
}

/// On-disk representation of one trained classifier and its vocabularies.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelArtifact {
    pub encoders: BTreeMap<String, Vec<String>>,
    pub classifier: ClassifierSpec,
}

impl ModelArtifact {
    fn take_encoder(&mut self, field: &'static str) -> Result<CategoryEncoder, String> {
        let classes = self
            .encoders
            .remove(field)
            .ok_or_else(|| format!("artifact has no '{field}' encoder"))?;
        CategoryEncoder::new(field, classes).map_err(|err| err.to_string())
    }

    fn classifier(&self, features: &[&str]) -> Result<Classifier, String> {
        Classifier::from_spec(self.classifier.clone(), features.len())
    }
}

type ModelSlot = Result<Arc<dyn RiskModel>, ModelLoadError>;

/// Immutable set of loaded models, built once at startup and shared by
/// reference across request handlers.
#[derive(Debug)]
pub struct ModelRegistry {
    vitamin_d: ModelSlot,
    eye: ModelSlot,
    posture: ModelSlot,
    screen_time: Option<ModelSlot>,
}

impl ModelRegistry {
    /// Load every artifact under `models_dir`.
    ///
    /// A missing or corrupt artifact marks only its own domain as failed. The
    /// screen-time artifact is optional; its absence is not an error.
    pub fn load(models_dir: &Path) -> Self {
        let vitamin_d = load_domain(models_dir, RiskDomain::VitaminD);
        let eye = load_domain(models_dir, RiskDomain::Eye);
        let posture = load_domain(models_dir, RiskDomain::Posture);

        let screen_time_path = artifact_path(models_dir, SCREEN_TIME_ARTIFACT);
        let screen_time = if screen_time_path.exists() {
            let slot = read_artifact(&screen_time_path)
                .and_then(build_screen_time)
                .map_err(|detail| ModelLoadError::new(RiskDomain::Eye, detail));
            if let Err(err) = &slot {
                warn!(error = %err, "dedicated screen-time model unavailable");
            }
            Some(slot)
        } else {
            None
        };

        Self {
            vitamin_d,
            eye,
            posture,
            screen_time,
        }
    }

    pub fn builder() -> ModelRegistryBuilder {
        ModelRegistryBuilder::default()
    }

    /// The base model for `domain`, or the error that kept it from loading.
    pub fn model(&self, domain: RiskDomain) -> Result<&Arc<dyn RiskModel>, ModelLoadError> {
        let slot = match domain {
            RiskDomain::VitaminD => &self.vitamin_d,
            RiskDomain::Eye => &self.eye,
            RiskDomain::Posture => &self.posture,
        };
        slot.as_ref().map_err(Clone::clone)
    }

    /// The dedicated screen-time classifier, only when it loaded cleanly.
    pub fn screen_time_model(&self) -> Option<&Arc<dyn RiskModel>> {
        match &self.screen_time {
            Some(Ok(model)) => Some(model),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        RiskDomain::ALL
            .iter()
            .all(|domain| self.model(*domain).is_ok())
    }

    pub fn status(&self) -> Vec<ModelStatus> {
        let mut statuses: Vec<ModelStatus> = RiskDomain::ALL
            .iter()
            .map(|domain| ModelStatus::from_slot(domain.slug(), self.model(*domain)))
            .collect();

        statuses.push(match &self.screen_time {
            Some(slot) => {
                ModelStatus::from_slot(SCREEN_TIME_ARTIFACT, slot.as_ref().map_err(Clone::clone))
            }
            None => ModelStatus {
                model: SCREEN_TIME_ARTIFACT,
                state: ModelState::Absent,
                features: Vec::new(),
                error: None,
            },
        });
        statuses
    }

    /// Every vocabulary of every loaded model, in feature order.
    pub fn encoder_inventory(&self) -> Vec<EncoderSummary> {
        let base = RiskDomain::ALL
            .iter()
            .filter_map(|domain| {
                self.model(*domain)
                    .ok()
                    .map(|model| (domain.slug(), model))
            });
        let dedicated = self
            .screen_time_model()
            .map(|model| (SCREEN_TIME_ARTIFACT, model));

        base.chain(dedicated)
            .flat_map(|(name, model)| {
                model.encoders().into_iter().map(move |encoder| EncoderSummary {
                    model: name,
                    field: encoder.field(),
                    classes: encoder.classes().to_vec(),
                })
            })
            .collect()
    }
}

/// Assembles a registry from already-built models.
#[derive(Debug, Default)]
pub struct ModelRegistryBuilder {
    models: BTreeMap<RiskDomain, ModelSlot>,
    screen_time: Option<ModelSlot>,
}

impl ModelRegistryBuilder {
    pub fn with_model(mut self, model: Arc<dyn RiskModel>) -> Self {
        self.models.insert(model.domain(), Ok(model));
        self
    }

    pub fn with_failure(mut self, domain: RiskDomain, detail: impl Into<String>) -> Self {
        self.models
            .insert(domain, Err(ModelLoadError::new(domain, detail)));
        self
    }

    pub fn with_screen_time_model(mut self, model: Arc<dyn RiskModel>) -> Self {
        self.screen_time = Some(Ok(model));
        self
    }

    /// Domains without a model are reported as failed.
    pub fn build(mut self) -> ModelRegistry {
        let mut take = |domain: RiskDomain| {
            self.models
                .remove(&domain)
                .unwrap_or_else(|| Err(ModelLoadError::new(domain, "no model registered")))
        };

        ModelRegistry {
            vitamin_d: take(RiskDomain::VitaminD),
            eye: take(RiskDomain::Eye),
            posture: take(RiskDomain::Posture),
            screen_time: self.screen_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    Loaded,
    Failed,
    Absent,
}

/// Load outcome for one model, as exposed on readiness probes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStatus {
    pub model: &'static str,
    pub state: ModelState,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ModelStatus {
    fn from_slot(
        model: &'static str,
        slot: Result<&Arc<dyn RiskModel>, ModelLoadError>,
    ) -> Self {
        match slot {
            Ok(loaded) => Self {
                model,
                state: ModelState::Loaded,
                features: loaded.feature_names().to_vec(),
                error: None,
            },
            Err(err) => Self {
                model,
                state: ModelState::Failed,
                features: Vec::new(),
                error: Some(err.to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncoderSummary {
    pub model: &'static str,
    pub field: &'static str,
    pub classes: Vec<String>,
}

pub fn artifact_path(models_dir: &Path, stem: &str) -> PathBuf {
    models_dir.join(format!("{stem}.json"))
}

fn load_domain(models_dir: &Path, domain: RiskDomain) -> ModelSlot {
    let path = artifact_path(models_dir, domain.slug());
    let built = read_artifact(&path).and_then(|artifact| match domain {
        RiskDomain::VitaminD => build_vitamin_d(artifact),
        RiskDomain::Eye => build_eye(artifact),
        RiskDomain::Posture => build_posture(artifact),
    });

    match built {
        Ok(model) => {
            info!(domain = domain.slug(), path = %path.display(), "model loaded");
            Ok(model)
        }
        Err(detail) => {
            let err = ModelLoadError::new(domain, detail);
            error!(domain = domain.slug(), error = %err, "model unavailable");
            Err(err)
        }
    }
}

fn read_artifact(path: &Path) -> Result<ModelArtifact, String> {
    let raw = fs::read_to_string(path)
        .map_err(|err| format!("cannot read {}: {err}", path.display()))?;
    serde_json::from_str(&raw).map_err(|err| format!("cannot parse {}: {err}", path.display()))
}

fn build_vitamin_d(mut artifact: ModelArtifact) -> Result<Arc<dyn RiskModel>, String> {
    let classifier = artifact.classifier(VitaminDModel::FEATURES)?;
    Ok(Arc::new(VitaminDModel::new(
        classifier,
        artifact.take_encoder("type")?,
        artifact.take_encoder("value")?,
    )))
}

fn build_eye(mut artifact: ModelArtifact) -> Result<Arc<dyn RiskModel>, String> {
    let classifier = artifact.classifier(EyeModel::FEATURES)?;
    Ok(Arc::new(EyeModel::new(
        classifier,
        artifact.take_encoder("type")?,
        artifact.take_encoder("value")?,
        artifact.take_encoder("dimension")?,
    )))
}

fn build_posture(mut artifact: ModelArtifact) -> Result<Arc<dyn RiskModel>, String> {
    let classifier = artifact.classifier(PostureModel::FEATURES)?;
    Ok(Arc::new(PostureModel::new(
        classifier,
        artifact.take_encoder("type")?,
        artifact.take_encoder("value")?,
        artifact.take_encoder("metric")?,
    )))
}

fn build_screen_time(mut artifact: ModelArtifact) -> Result<Arc<dyn RiskModel>, String> {
    let classifier = artifact.classifier(ScreenTimeEyeModel::FEATURES)?;
    Ok(Arc::new(ScreenTimeEyeModel::new(
        classifier,
        artifact.take_encoder("age")?,
        artifact.take_encoder("sex")?,
    )))
}
