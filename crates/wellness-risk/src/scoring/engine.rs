use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use tracing::{debug, warn};

use super::adjustment::screen_time_impact;
use super::domain::{round2, Adjustment, RiskAssessment, RiskDomain, RiskRequest, WellnessScore};
use super::fallback::FallbackController;
use super::profile::ScoringVariant;
use super::recommendations::recommend;
use super::registry::{ModelLoadError, ModelRegistry};
use super::wellness::AggregationError;
use crate::config::{ScoringConfig, ScreenTimeModelMode};
use crate::telemetry;

/// Entry point for scoring requests. Cheap to clone; every clone shares the
/// same read-only registry.
#[derive(Debug, Clone)]
pub struct RiskEngine {
    controller: FallbackController,
}

impl RiskEngine {
    pub fn new(registry: Arc<ModelRegistry>, screen_time_mode: ScreenTimeModelMode) -> Self {
        Self {
            controller: FallbackController::new(registry, screen_time_mode),
        }
    }

    /// Load artifacts from the configured directory.
    pub fn from_config(config: &ScoringConfig) -> Self {
        let registry = ModelRegistry::load(&config.models_dir);
        Self::new(Arc::new(registry), config.screen_time_model)
    }

    pub fn registry(&self) -> &Arc<ModelRegistry> {
        self.controller.registry()
    }

    /// Score one domain under `variant`.
    pub fn assess(
        &self,
        domain: RiskDomain,
        variant: ScoringVariant,
        request: &RiskRequest,
    ) -> Result<DomainReport, ModelLoadError> {
        let _span = telemetry::scoring_span(domain, variant).entered();
        let profile = variant.profile();
        let input = profile.resolve(request);
        let assessment = self.controller.assess(domain, &profile, &input)?;
        let recommendations = recommend(&assessment, &input, variant);

        debug!(
            domain = domain.slug(),
            variant = variant.label(),
            risk_level = assessment.risk_level.label(),
            degraded = assessment.is_degraded(),
            "assessment complete"
        );

        Ok(DomainReport {
            variant,
            assessment,
            input,
            recommendations,
        })
    }

    /// Score all three domains and blend them into a wellness score.
    ///
    /// A domain that failed to load aborts the whole request; degraded
    /// domains still contribute their default risk.
    pub fn wellness(&self, request: &RiskRequest) -> Result<WellnessReport, ModelLoadError> {
        let profile = ScoringVariant::Aggregate.profile();
        let input = profile.resolve(request);

        let assess = |domain: RiskDomain| {
            let _span = telemetry::scoring_span(domain, profile.variant).entered();
            self.controller.assess(domain, &profile, &input)
        };
        let vitamin_d = assess(RiskDomain::VitaminD)?;
        let eye = assess(RiskDomain::Eye)?;
        let posture = assess(RiskDomain::Posture)?;

        let score = WellnessScore::from_assessments(&vitamin_d, &eye, &posture);
        if let Err(err) = &score {
            warn!(error = %err, "wellness aggregation failed");
        }

        Ok(WellnessReport {
            vitamin_d,
            eye,
            posture,
            input,
            score,
        })
    }
}

/// One domain's result plus the context callers display alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainReport {
    pub variant: ScoringVariant,
    pub assessment: RiskAssessment,
    /// The request after variant defaults were applied.
    pub input: RiskRequest,
    pub recommendations: Vec<String>,
}

impl DomainReport {
    pub fn risk_percent(&self) -> f64 {
        round2(self.assessment.risk_percent())
    }

    /// Classifier output before multipliers, reported for screen-time scoring.
    pub fn base_risk(&self) -> Option<f64> {
        if self.variant != ScoringVariant::ScreenTime {
            return None;
        }
        self.assessment
            .base_probability
            .map(|probability| round2(probability * 100.0))
    }

    pub fn screen_time_impact(&self) -> Option<&'static str> {
        if self.variant != ScoringVariant::ScreenTime {
            return None;
        }
        self.input.screen_time.map(screen_time_impact)
    }
}

impl Serialize for DomainReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let assessment = &self.assessment;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(assessment.domain.risk_key(), &self.risk_percent())?;
        map.serialize_entry("risk_level", assessment.risk_level.label())?;
        map.serialize_entry("confidence", assessment.confidence.label())?;
        map.serialize_entry("model_used", &assessment.model_used)?;
        map.serialize_entry("variant", self.variant.label())?;
        map.serialize_entry(
            "adjustments_applied",
            &AdjustmentsView(&assessment.adjustments),
        )?;
        if let Some(base_risk) = self.base_risk() {
            map.serialize_entry("base_risk", &base_risk)?;
        }
        if let Some(impact) = self.screen_time_impact() {
            map.serialize_entry("screen_time_impact", impact)?;
        }
        map.serialize_entry("recommendations", &self.recommendations)?;
        map.serialize_entry("input_data", &self.input)?;
        if let Some(error) = &assessment.error {
            map.serialize_entry("error", error)?;
        }
        map.end()
    }
}

/// Applied multipliers keyed by factor, in application order, each with the
/// raw request value that triggered it.
struct AdjustmentsView<'a>(&'a [Adjustment]);

#[derive(Serialize)]
struct AppliedAdjustment<'a> {
    value: &'a str,
    multiplier: f64,
}

impl Serialize for AdjustmentsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for adjustment in self.0 {
            map.serialize_entry(
                adjustment.factor.label(),
                &AppliedAdjustment {
                    value: &adjustment.value,
                    multiplier: adjustment.multiplier,
                },
            )?;
        }
        map.end()
    }
}

/// Per-domain aggregate scores and the blended wellness score.
#[derive(Debug, Clone, PartialEq)]
pub struct WellnessReport {
    pub vitamin_d: RiskAssessment,
    pub eye: RiskAssessment,
    pub posture: RiskAssessment,
    pub input: RiskRequest,
    pub score: Result<WellnessScore, AggregationError>,
}

impl WellnessReport {
    pub fn overall_score(&self) -> Option<f64> {
        self.score.as_ref().ok().map(|score| round2(score.overall_score))
    }

    pub fn assessments(&self) -> [&RiskAssessment; 3] {
        [&self.vitamin_d, &self.eye, &self.posture]
    }
}

impl Serialize for WellnessReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for assessment in self.assessments() {
            map.serialize_entry(
                assessment.domain.risk_key(),
                &round2(assessment.risk_percent()),
            )?;
        }
        map.serialize_entry("overall_wellness_score", &self.overall_score())?;
        if let Err(err) = &self.score {
            map.serialize_entry("error", &err.to_string())?;
        }

        let domain_errors: Vec<(&str, &str)> = self
            .assessments()
            .into_iter()
            .filter_map(|assessment| {
                assessment
                    .error
                    .as_deref()
                    .map(|error| (assessment.domain.slug(), error))
            })
            .collect();
        if !domain_errors.is_empty() {
            map.serialize_entry("domain_errors", &DomainErrors(&domain_errors))?;
        }

        map.serialize_entry("input_data", &self.input)?;
        map.end()
    }
}

struct DomainErrors<'a>(&'a [(&'a str, &'a str)]);

impl Serialize for DomainErrors<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (domain, error) in self.0 {
            map.serialize_entry(domain, error)?;
        }
        map.end()
    }
}
