use serde::{Deserialize, Serialize};

use super::adjustment::{AdjustmentSet, RiskBounds};
use super::classification::ConfidencePolicy;
use super::domain::RiskRequest;

pub const DEFAULT_AGE_GROUP: &str = "25–34";
pub const DEFAULT_STATE: &str = "VIC";
pub const DEFAULT_REMOTENESS: &str = "Major Cities";
pub const DEFAULT_SCREEN_TIME_HOURS: f64 = 8.0;

/// Age buckets present in every shipped model vocabulary.
pub const AGE_GROUPS: [&str; 7] = ["18–24", "25–34", "35–44", "45–54", "55–64", "65–74", "75+"];
pub const SEXES: [&str; 3] = ["Male", "Female", "Persons"];

/// Named scoring configuration. Each variant fixes the multiplier set, the
/// confidence formula, the defaults and the clamp bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringVariant {
    /// Demographic multipliers with distance-based confidence.
    Standard,
    /// Sex multiplier only, boundary-based confidence.
    #[default]
    Final,
    /// Screen-time multiplier, boundary-based confidence.
    ScreenTime,
    /// Raw classifier output feeding the wellness blend.
    Aggregate,
}

impl ScoringVariant {
    pub const ALL: [ScoringVariant; 4] = [
        ScoringVariant::Standard,
        ScoringVariant::Final,
        ScoringVariant::ScreenTime,
        ScoringVariant::Aggregate,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Final => "final",
            Self::ScreenTime => "screen_time",
            Self::Aggregate => "aggregate",
        }
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "standard" | "original" => Some(Self::Standard),
            "final" => Some(Self::Final),
            "screen_time" | "screentime" => Some(Self::ScreenTime),
            "aggregate" | "wellness" => Some(Self::Aggregate),
            _ => None,
        }
    }

    pub fn profile(self) -> VariantProfile {
        match self {
            Self::Standard => VariantProfile {
                variant: self,
                adjustments: AdjustmentSet::DEMOGRAPHIC,
                confidence: ConfidencePolicy::DistanceFromCenter,
                defaults: RequestDefaults {
                    sex: "Persons",
                    state: Some(DEFAULT_STATE),
                    remoteness_area: Some(DEFAULT_REMOTENESS),
                    screen_time: None,
                },
                bounds: RiskBounds::ADJUSTED,
            },
            Self::Final => VariantProfile {
                variant: self,
                adjustments: AdjustmentSet::SEX_ONLY,
                confidence: ConfidencePolicy::Boundary,
                defaults: RequestDefaults {
                    sex: "Male",
                    state: None,
                    remoteness_area: None,
                    screen_time: None,
                },
                bounds: RiskBounds::ADJUSTED,
            },
            Self::ScreenTime => VariantProfile {
                variant: self,
                adjustments: AdjustmentSet::SCREEN_TIME_ONLY,
                confidence: ConfidencePolicy::Boundary,
                defaults: RequestDefaults {
                    sex: "Male",
                    state: None,
                    remoteness_area: None,
                    screen_time: Some(DEFAULT_SCREEN_TIME_HOURS),
                },
                bounds: RiskBounds::ADJUSTED,
            },
            Self::Aggregate => VariantProfile {
                variant: self,
                adjustments: AdjustmentSet::NONE,
                confidence: ConfidencePolicy::DistanceFromCenter,
                defaults: RequestDefaults {
                    sex: "Persons",
                    state: None,
                    remoteness_area: None,
                    screen_time: None,
                },
                bounds: RiskBounds::FULL,
            },
        }
    }
}

/// Values substituted for absent request fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RequestDefaults {
    pub sex: &'static str,
    pub state: Option<&'static str>,
    pub remoteness_area: Option<&'static str>,
    pub screen_time: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VariantProfile {
    pub variant: ScoringVariant,
    pub adjustments: AdjustmentSet,
    pub confidence: ConfidencePolicy,
    pub defaults: RequestDefaults,
    pub bounds: RiskBounds,
}

impl VariantProfile {
    /// The complete request used when the caller sends nothing at all.
    pub fn default_request(&self) -> RiskRequest {
        RiskRequest {
            age_group: Some(DEFAULT_AGE_GROUP.to_string()),
            sex: Some(self.defaults.sex.to_string()),
            state: self.defaults.state.map(str::to_string),
            remoteness_area: self.defaults.remoteness_area.map(str::to_string),
            screen_time: self.defaults.screen_time,
        }
    }

    /// Fill in the inputs this variant always needs.
    ///
    /// An empty request becomes the full default request. Otherwise only the
    /// age group (and screen time, for screen-time variants) is defaulted;
    /// absent demographic modifiers stay absent so they trigger no multiplier.
    pub fn resolve(&self, request: &RiskRequest) -> RiskRequest {
        if request.is_empty() {
            return self.default_request();
        }

        let mut resolved = request.clone();
        if resolved.age_group.is_none() {
            resolved.age_group = Some(DEFAULT_AGE_GROUP.to_string());
        }
        if self.adjustments.screen_time && resolved.screen_time.is_none() {
            resolved.screen_time = self.defaults.screen_time;
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_policy_per_variant() {
        assert_eq!(
            ScoringVariant::Standard.profile().confidence,
            ConfidencePolicy::DistanceFromCenter
        );
        assert_eq!(
            ScoringVariant::Final.profile().confidence,
            ConfidencePolicy::Boundary
        );
        assert_eq!(
            ScoringVariant::ScreenTime.profile().confidence,
            ConfidencePolicy::Boundary
        );
    }

    #[test]
    fn empty_request_resolves_to_variant_defaults() {
        let resolved = ScoringVariant::Standard
            .profile()
            .resolve(&RiskRequest::default());
        assert_eq!(resolved.age_group.as_deref(), Some("25–34"));
        assert_eq!(resolved.sex.as_deref(), Some("Persons"));
        assert_eq!(resolved.state.as_deref(), Some("VIC"));
        assert_eq!(resolved.remoteness_area.as_deref(), Some("Major Cities"));
        assert_eq!(resolved.screen_time, None);

        let resolved = ScoringVariant::ScreenTime
            .profile()
            .resolve(&RiskRequest::default());
        assert_eq!(resolved.sex.as_deref(), Some("Male"));
        assert_eq!(resolved.screen_time, Some(8.0));
    }

    #[test]
    fn partial_request_keeps_modifiers_absent() {
        let request = RiskRequest {
            sex: Some("Female".to_string()),
            ..RiskRequest::default()
        };
        let resolved = ScoringVariant::Standard.profile().resolve(&request);
        assert_eq!(resolved.age_group.as_deref(), Some("25–34"));
        assert_eq!(resolved.state, None);
        assert_eq!(resolved.remoteness_area, None);
    }

    #[test]
    fn screen_time_variant_always_resolves_hours() {
        let request = RiskRequest {
            age_group: Some("45–54".to_string()),
            ..RiskRequest::default()
        };
        let resolved = ScoringVariant::ScreenTime.profile().resolve(&request);
        assert_eq!(resolved.screen_time, Some(8.0));
        assert_eq!(resolved.sex, None);
    }

    #[test]
    fn variant_labels_round_trip() {
        for variant in ScoringVariant::ALL {
            assert_eq!(ScoringVariant::from_label(variant.label()), Some(variant));
        }
        assert_eq!(
            ScoringVariant::from_label("screen-time"),
            Some(ScoringVariant::ScreenTime)
        );
    }
}
