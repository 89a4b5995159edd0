use super::domain::{RiskAssessment, RiskDomain, WellnessScore};

pub const EYE_WEIGHT: f64 = 0.4;
pub const POSTURE_WEIGHT: f64 = 0.3;
pub const VITAMIN_D_WEIGHT: f64 = 0.3;

/// A per-domain risk reaching the aggregator was NaN or infinite.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot aggregate non-finite {domain} risk ({value})")]
pub struct AggregationError {
    pub domain: RiskDomain,
    pub value: f64,
}

/// `0.4 * eye + 0.3 * posture + 0.3 * vitamin D`, all on the 0-100 scale.
pub fn aggregate(
    vitamin_d_risk: f64,
    eye_risk: f64,
    posture_risk: f64,
) -> Result<f64, AggregationError> {
    for (domain, value) in [
        (RiskDomain::VitaminD, vitamin_d_risk),
        (RiskDomain::Eye, eye_risk),
        (RiskDomain::Posture, posture_risk),
    ] {
        if !value.is_finite() {
            return Err(AggregationError { domain, value });
        }
    }

    Ok(EYE_WEIGHT * eye_risk + POSTURE_WEIGHT * posture_risk + VITAMIN_D_WEIGHT * vitamin_d_risk)
}

impl WellnessScore {
    pub fn from_assessments(
        vitamin_d: &RiskAssessment,
        eye: &RiskAssessment,
        posture: &RiskAssessment,
    ) -> Result<Self, AggregationError> {
        let vitamin_d_risk = vitamin_d.risk_percent();
        let eye_risk = eye.risk_percent();
        let posture_risk = posture.risk_percent();
        let overall_score = aggregate(vitamin_d_risk, eye_risk, posture_risk)?;

        Ok(Self {
            vitamin_d_risk,
            eye_risk,
            posture_risk,
            overall_score,
        })
    }
}
