//! Heuristic multipliers layered over a classifier's base risk.
//!
//! Multipliers are applied in a fixed order (sex, state, remoteness, screen
//! time) and the product is clamped once at the end.

use serde::Serialize;

use super::domain::{Adjustment, AdjustmentFactor, RiskRequest};

const SEX_MULTIPLIERS: &[(&str, f64)] = &[("Male", 1.05), ("Female", 0.98)];

const STATE_MULTIPLIERS: &[(&str, f64)] = &[
    ("NSW", 1.02),
    ("VIC", 1.00),
    ("QLD", 0.98),
    ("SA", 1.01),
    ("WA", 0.99),
    ("TAS", 1.03),
    ("NT", 1.05),
    ("ACT", 0.97),
];

const REMOTENESS_MULTIPLIERS: &[(&str, f64)] = &[
    ("Major Cities", 1.01),
    ("Inner Regional", 1.00),
    ("Outer Regional", 1.02),
    ("Remote", 1.05),
    ("Very Remote", 1.08),
];

/// Upper bound (inclusive) of each screen-time bucket in hours per day.
const SCREEN_TIME_BUCKETS: &[(f64, f64, &str)] = &[
    (2.0, 0.8, "Very Low - Minimal screen time exposure"),
    (4.0, 0.9, "Low - Limited screen time exposure"),
    (6.0, 1.0, "Moderate - Average screen time exposure"),
    (8.0, 1.1, "Elevated - Above average screen time exposure"),
    (10.0, 1.2, "High - Significant screen time exposure"),
    (12.0, 1.3, "Very High - Excessive screen time exposure"),
];

const EXCESSIVE_SCREEN_TIME: (f64, &str) = (1.5, "Critical - Extreme screen time exposure");

const NEUTRAL: f64 = 1.0;

/// Which request attributes may trigger a multiplier for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AdjustmentSet {
    pub sex: bool,
    pub state: bool,
    pub remoteness: bool,
    pub screen_time: bool,
}

impl AdjustmentSet {
    pub const NONE: Self = Self {
        sex: false,
        state: false,
        remoteness: false,
        screen_time: false,
    };

    pub const DEMOGRAPHIC: Self = Self {
        sex: true,
        state: true,
        remoteness: true,
        screen_time: false,
    };

    pub const SEX_ONLY: Self = Self {
        sex: true,
        ..Self::NONE
    };

    pub const SCREEN_TIME_ONLY: Self = Self {
        screen_time: true,
        ..Self::NONE
    };

    pub fn without_screen_time(self) -> Self {
        Self {
            screen_time: false,
            ..self
        }
    }
}

/// Closed interval a 0-100 risk is clamped into after adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskBounds {
    pub min: f64,
    pub max: f64,
}

impl RiskBounds {
    /// Bounds applied whenever heuristic multipliers are in play.
    pub const ADJUSTED: Self = Self {
        min: 10.0,
        max: 95.0,
    };

    pub const FULL: Self = Self {
        min: 0.0,
        max: 100.0,
    };

    pub fn clamp(self, risk: f64) -> f64 {
        risk.clamp(self.min, self.max)
    }
}

/// Risk after multipliers, with the audit trail of what was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjustedRisk {
    pub risk: f64,
    pub adjustments: Vec<Adjustment>,
}

pub fn sex_multiplier(sex: &str) -> f64 {
    lookup(SEX_MULTIPLIERS, sex.trim())
}

pub fn state_multiplier(state: &str) -> f64 {
    lookup(STATE_MULTIPLIERS, state.trim())
}

pub fn remoteness_multiplier(area: &str) -> f64 {
    lookup(REMOTENESS_MULTIPLIERS, area.trim())
}

pub fn screen_time_multiplier(hours: f64) -> f64 {
    SCREEN_TIME_BUCKETS
        .iter()
        .find(|(upper, _, _)| hours <= *upper)
        .map(|(_, multiplier, _)| *multiplier)
        .unwrap_or(EXCESSIVE_SCREEN_TIME.0)
}

/// Human-readable exposure label for a daily screen-time figure.
pub fn screen_time_impact(hours: f64) -> &'static str {
    SCREEN_TIME_BUCKETS
        .iter()
        .find(|(upper, _, _)| hours <= *upper)
        .map(|(_, _, label)| *label)
        .unwrap_or(EXCESSIVE_SCREEN_TIME.1)
}

/// Apply every enabled multiplier whose attribute is present, then clamp.
///
/// `base_risk` and the result are on the 0-100 scale.
pub fn adjust(
    base_risk: f64,
    request: &RiskRequest,
    enabled: AdjustmentSet,
    bounds: RiskBounds,
) -> AdjustedRisk {
    let mut adjustments = Vec::new();

    if enabled.sex {
        if let Some(sex) = request.sex.as_deref() {
            adjustments.push(Adjustment {
                factor: AdjustmentFactor::Sex,
                value: sex.to_string(),
                multiplier: sex_multiplier(sex),
            });
        }
    }

    if enabled.state {
        if let Some(state) = request.state.as_deref() {
            adjustments.push(Adjustment {
                factor: AdjustmentFactor::State,
                value: state.to_string(),
                multiplier: state_multiplier(state),
            });
        }
    }

    if enabled.remoteness {
        if let Some(area) = request.remoteness_area.as_deref() {
            adjustments.push(Adjustment {
                factor: AdjustmentFactor::Remoteness,
                value: area.to_string(),
                multiplier: remoteness_multiplier(area),
            });
        }
    }

    if enabled.screen_time {
        if let Some(hours) = request.screen_time {
            adjustments.push(Adjustment {
                factor: AdjustmentFactor::ScreenTime,
                value: hours.to_string(),
                multiplier: screen_time_multiplier(hours),
            });
        }
    }

    let risk = adjustments
        .iter()
        .fold(base_risk, |risk, adjustment| risk * adjustment.multiplier);

    AdjustedRisk {
        risk: bounds.clamp(risk),
        adjustments,
    }
}

/// State codes with a dedicated multiplier.
pub fn known_states() -> Vec<&'static str> {
    STATE_MULTIPLIERS.iter().map(|(state, _)| *state).collect()
}

pub fn known_remoteness_areas() -> Vec<&'static str> {
    REMOTENESS_MULTIPLIERS.iter().map(|(area, _)| *area).collect()
}

fn lookup(table: &[(&str, f64)], key: &str) -> f64 {
    table
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, multiplier)| *multiplier)
        .unwrap_or(NEUTRAL)
}
