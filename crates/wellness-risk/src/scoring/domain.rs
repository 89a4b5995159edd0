use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use tracing::warn;

/// The three health domains a trained classifier exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskDomain {
    VitaminD,
    Eye,
    Posture,
}

impl RiskDomain {
    pub const ALL: [RiskDomain; 3] = [RiskDomain::VitaminD, RiskDomain::Eye, RiskDomain::Posture];

    pub const fn label(self) -> &'static str {
        match self {
            Self::VitaminD => "Vitamin D",
            Self::Eye => "Eye",
            Self::Posture => "Posture",
        }
    }

    /// Stem used for artifact file names and log fields.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::VitaminD => "vitamin_d",
            Self::Eye => "eye",
            Self::Posture => "posture",
        }
    }

    /// Key carrying the 0-100 risk percentage in response payloads.
    pub const fn risk_key(self) -> &'static str {
        match self {
            Self::VitaminD => "vitamin_d_risk",
            Self::Eye => "eye_risk",
            Self::Posture => "posture_risk",
        }
    }

    pub fn from_slug(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "vitamin_d" | "vitamind" | "vitd" => Some(Self::VitaminD),
            "eye" | "eye_health" => Some(Self::Eye),
            "posture" => Some(Self::Posture),
            _ => None,
        }
    }
}

impl fmt::Display for RiskDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Demographic and behavioral attributes describing one person.
///
/// Every field is optional; variants decide which defaults apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remoteness_area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_time: Option<f64>,
}

impl RiskRequest {
    pub fn is_empty(&self) -> bool {
        self.age_group.is_none()
            && self.sex.is_none()
            && self.state.is_none()
            && self.remoteness_area.is_none()
            && self.screen_time.is_none()
    }

    /// Parse a request body, treating malformed input as an empty request.
    pub fn from_slice_lenient(bytes: &[u8]) -> Self {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }

        match serde_json::from_slice::<RiskRequest>(bytes) {
            Ok(request) => request.sanitized(),
            Err(err) => {
                warn!(error = %err, "malformed risk request, falling back to defaults");
                Self::default()
            }
        }
    }

    /// Drop blank strings and screen-time values outside the `>= 0` domain.
    pub fn sanitized(self) -> Self {
        fn non_blank(value: Option<String>) -> Option<String> {
            value
                .map(|raw| raw.trim().to_string())
                .filter(|raw| !raw.is_empty())
        }

        let screen_time = match self.screen_time {
            Some(hours) if hours.is_finite() && hours >= 0.0 => Some(hours),
            Some(hours) => {
                warn!(screen_time = hours, "ignoring out-of-range screen time");
                None
            }
            None => None,
        };

        Self {
            age_group: non_blank(self.age_group),
            sex: non_blank(self.sex),
            state: non_blank(self.state),
            remoteness_area: non_blank(self.remoteness_area),
            screen_time,
        }
    }
}

/// Discrete bucket derived from a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// How far a probability sits from the 0.5 decision boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// Attribute a heuristic multiplier was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentFactor {
    Sex,
    State,
    Remoteness,
    ScreenTime,
}

impl AdjustmentFactor {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sex => "sex",
            Self::State => "state",
            Self::Remoteness => "remoteness",
            Self::ScreenTime => "screen_time",
        }
    }
}

/// One applied multiplier, kept for auditability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Adjustment {
    pub factor: AdjustmentFactor,
    pub value: String,
    pub multiplier: f64,
}

/// Which classifier path produced an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTag {
    Base(RiskDomain),
    HeuristicScreenTime,
    DedicatedScreenTime,
    DefaultFallback,
}

impl ModelTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Base(RiskDomain::VitaminD) => "vitamin_d_model",
            Self::Base(RiskDomain::Eye) => "eye_model",
            Self::Base(RiskDomain::Posture) => "posture_model",
            Self::HeuristicScreenTime => "original_with_screentime_adjustment",
            Self::DedicatedScreenTime => "screen_time_model",
            Self::DefaultFallback => "default_fallback",
        }
    }
}

impl Serialize for ModelTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Terminal state reached by a single domain assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssessmentOutcome {
    Completed,
    Degraded,
}

/// Result of scoring one domain for one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub domain: RiskDomain,
    pub probability: f64,
    pub risk_level: RiskLevel,
    pub confidence: Confidence,
    pub adjustments: Vec<Adjustment>,
    pub model_used: ModelTag,
    /// Classifier probability before any multiplier was applied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_probability: Option<f64>,
    pub outcome: AssessmentOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RiskAssessment {
    pub const DEFAULT_PROBABILITY: f64 = 0.5;

    /// Safe medium-risk answer used when encoding or inference fails.
    pub fn degraded(domain: RiskDomain, error: impl Into<String>) -> Self {
        Self {
            domain,
            probability: Self::DEFAULT_PROBABILITY,
            risk_level: RiskLevel::Medium,
            confidence: Confidence::Low,
            adjustments: Vec::new(),
            model_used: ModelTag::DefaultFallback,
            base_probability: None,
            outcome: AssessmentOutcome::Degraded,
            error: Some(error.into()),
        }
    }

    pub fn risk_percent(&self) -> f64 {
        self.probability * 100.0
    }

    pub fn is_degraded(&self) -> bool {
        self.outcome == AssessmentOutcome::Degraded
    }
}

/// Weighted blend of the three domain risks, all on the 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WellnessScore {
    pub vitamin_d_risk: f64,
    pub eye_risk: f64,
    pub posture_risk: f64,
    pub overall_score: f64,
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
