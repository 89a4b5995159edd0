use serde::Serialize;

use super::domain::{Confidence, RiskLevel};

const LOW_RISK_CEILING: f64 = 0.3;
const HIGH_RISK_FLOOR: f64 = 0.7;

impl RiskLevel {
    /// `p < 0.3` is Low, `0.3 <= p < 0.7` Medium, anything above High.
    pub fn from_probability(probability: f64) -> Self {
        if probability < LOW_RISK_CEILING {
            Self::Low
        } else if probability < HIGH_RISK_FLOOR {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// The two confidence formulas in use. They disagree between 0.6 and 0.7
/// (and 0.8 to 0.9, mirrored below 0.5): `p = 0.62` is Low by distance but
/// Medium by boundary. Each variant states which one it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidencePolicy {
    /// High when `|p - 0.5| > 0.4`, Medium when `> 0.2`.
    DistanceFromCenter,
    /// High when `p < 0.2 || p > 0.8`, Medium when `p < 0.4 || p > 0.6`.
    Boundary,
}

impl ConfidencePolicy {
    pub fn classify(self, probability: f64) -> Confidence {
        match self {
            Self::DistanceFromCenter => {
                let distance = (probability - 0.5).abs();
                if distance > 0.4 {
                    Confidence::High
                } else if distance > 0.2 {
                    Confidence::Medium
                } else {
                    Confidence::Low
                }
            }
            Self::Boundary => {
                if !(0.2..=0.8).contains(&probability) {
                    Confidence::High
                } else if !(0.4..=0.6).contains(&probability) {
                    Confidence::Medium
                } else {
                    Confidence::Low
                }
            }
        }
    }
}
