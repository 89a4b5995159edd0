use std::sync::Arc;

use tracing::{debug, warn};

use super::adjustment::{adjust, AdjustmentSet};
use super::domain::{AssessmentOutcome, ModelTag, RiskAssessment, RiskDomain, RiskLevel, RiskRequest};
use super::model::{ModelInput, RiskModel};
use super::profile::{VariantProfile, DEFAULT_AGE_GROUP, DEFAULT_SCREEN_TIME_HOURS};
use super::registry::{ModelLoadError, ModelRegistry};
use crate::config::ScreenTimeModelMode;

/// Classifier path chosen for one assessment.
#[derive(Debug, Clone)]
pub struct Route {
    pub model: Arc<dyn RiskModel>,
    pub tag: ModelTag,
    pub adjustments: AdjustmentSet,
}

/// Supervises encode, predict, adjust and classify for a single domain.
///
/// Encoding and inference failures end in a degraded assessment. A domain
/// whose model never loaded is reported as [`ModelLoadError`] instead.
#[derive(Debug, Clone)]
pub struct FallbackController {
    registry: Arc<ModelRegistry>,
    screen_time_mode: ScreenTimeModelMode,
}

impl FallbackController {
    pub fn new(registry: Arc<ModelRegistry>, screen_time_mode: ScreenTimeModelMode) -> Self {
        Self {
            registry,
            screen_time_mode,
        }
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }

    /// Pick the classifier for `domain` under `profile`.
    ///
    /// The dedicated screen-time classifier only serves eye requests when the
    /// mode is enabled and the artifact loaded. Every other screen-time
    /// request runs the base model and the heuristic multiplier.
    pub fn route(
        &self,
        domain: RiskDomain,
        profile: &VariantProfile,
    ) -> Result<Route, ModelLoadError> {
        let base = Arc::clone(self.registry.model(domain)?);

        if !profile.adjustments.screen_time {
            return Ok(Route {
                model: base,
                tag: ModelTag::Base(domain),
                adjustments: profile.adjustments,
            });
        }

        let dedicated = match (domain, self.screen_time_mode) {
            (RiskDomain::Eye, ScreenTimeModelMode::Enabled) => {
                let model = self.registry.screen_time_model().cloned();
                if model.is_none() {
                    warn!("screen-time model enabled but not loaded, using heuristic adjustment");
                }
                model
            }
            _ => None,
        };

        Ok(match dedicated {
            Some(model) => Route {
                model,
                tag: ModelTag::DedicatedScreenTime,
                adjustments: profile.adjustments.without_screen_time(),
            },
            None => Route {
                model: base,
                tag: ModelTag::HeuristicScreenTime,
                adjustments: profile.adjustments,
            },
        })
    }

    /// Score one domain for an already-resolved request.
    pub fn assess(
        &self,
        domain: RiskDomain,
        profile: &VariantProfile,
        request: &RiskRequest,
    ) -> Result<RiskAssessment, ModelLoadError> {
        let route = self.route(domain, profile)?;

        let input = ModelInput {
            age_group: request.age_group.as_deref().unwrap_or(DEFAULT_AGE_GROUP),
            sex: request.sex.as_deref().unwrap_or(profile.defaults.sex),
            screen_time_hours: request.screen_time.unwrap_or(DEFAULT_SCREEN_TIME_HOURS),
        };

        let features = match route.model.encode(&input) {
            Ok(features) => features,
            Err(err) => {
                warn!(domain = domain.slug(), error = %err, "encoding failed, returning default assessment");
                return Ok(RiskAssessment::degraded(domain, err.to_string()));
            }
        };
        debug!(domain = domain.slug(), features = ?features.as_slice(), "features encoded");

        let probability = match route.model.predict(&features) {
            Ok(probability) => probability,
            Err(err) => {
                warn!(domain = domain.slug(), error = %err, "inference failed, returning default assessment");
                return Ok(RiskAssessment::degraded(domain, err.to_string()));
            }
        };
        debug!(domain = domain.slug(), probability, model = route.tag.as_str(), "base probability");

        let adjusted = adjust(probability * 100.0, request, route.adjustments, profile.bounds);
        if !adjusted.risk.is_finite() {
            warn!(domain = domain.slug(), risk = adjusted.risk, "adjusted risk is not finite");
            return Ok(RiskAssessment::degraded(
                domain,
                format!("adjusted {domain} risk is not a finite number"),
            ));
        }
        debug!(
            domain = domain.slug(),
            risk = adjusted.risk,
            applied = adjusted.adjustments.len(),
            "adjustments applied"
        );

        let final_probability = adjusted.risk / 100.0;
        Ok(RiskAssessment {
            domain,
            probability: final_probability,
            risk_level: RiskLevel::from_probability(final_probability),
            confidence: profile.confidence.classify(final_probability),
            adjustments: adjusted.adjustments,
            model_used: route.tag,
            base_probability: Some(probability),
            outcome: AssessmentOutcome::Completed,
            error: None,
        })
    }
}
