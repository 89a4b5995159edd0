//! Advice text attached to per-domain results. Reads the finished assessment
//! and never feeds back into scoring.

use super::domain::{RiskAssessment, RiskDomain, RiskLevel, RiskRequest};
use super::profile::{ScoringVariant, DEFAULT_SCREEN_TIME_HOURS};

const EYE_NUTRITION: &str =
    "Maintain a balanced diet rich in eye-healthy nutrients (vitamins A, C, E, zinc, omega-3)";
const EYE_SUNGLASSES: &str = "Wear UV-protective sunglasses when outdoors";
const EYE_LIFESTYLE: &str = "Avoid smoking and limit alcohol consumption";
const EYE_CHRONIC: &str =
    "Manage chronic conditions like diabetes and hypertension that can affect eye health";
const TWENTY_RULE: &str =
    "Implement the 20-20-20 rule: every 20 minutes, look 20 feet away for 20 seconds";

pub fn recommend(
    assessment: &RiskAssessment,
    request: &RiskRequest,
    variant: ScoringVariant,
) -> Vec<String> {
    let advice = match assessment.domain {
        RiskDomain::Eye => eye(assessment.risk_level, request, variant),
        RiskDomain::VitaminD => vitamin_d(assessment.risk_level, request),
        RiskDomain::Posture => posture(assessment.risk_level, request),
    };
    advice.into_iter().map(str::to_string).collect()
}

fn age_band(request: &RiskRequest) -> AgeBand {
    let age = request.age_group.as_deref().unwrap_or_default();
    if age.starts_with("65") || age.starts_with("75") || age.starts_with("85") {
        AgeBand::Senior
    } else if age.starts_with("45") || age.starts_with("55") {
        AgeBand::Middle
    } else {
        AgeBand::Younger
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AgeBand {
    Younger,
    Middle,
    Senior,
}

fn is_remote(request: &RiskRequest) -> bool {
    request
        .remoteness_area
        .as_deref()
        .is_some_and(|area| area.contains("Remote"))
}

fn eye(level: RiskLevel, request: &RiskRequest, variant: ScoringVariant) -> Vec<&'static str> {
    let mut advice = Vec::new();

    if variant == ScoringVariant::ScreenTime {
        let hours = request.screen_time.unwrap_or(DEFAULT_SCREEN_TIME_HOURS);
        if hours > 10.0 {
            advice.extend([
                "CRITICAL: Reduce daily screen time to under 8 hours immediately",
                "Take a 15-minute break every hour of screen use",
                "Consider using blue light filtering glasses or screen filters",
            ]);
        } else if hours > 8.0 {
            advice.extend([
                "HIGH: Your screen time is above recommended levels",
                TWENTY_RULE,
                "Take regular breaks and blink frequently",
            ]);
        } else if hours > 6.0 {
            advice.extend([
                "MODERATE: Your screen time is within acceptable range",
                "Continue practicing good eye habits",
            ]);
        } else {
            advice.extend([
                "EXCELLENT: Your screen time is well within healthy limits",
                "Maintain your current healthy screen habits",
            ]);
        }
    }

    match (variant, age_band(request)) {
        (ScoringVariant::Standard, AgeBand::Senior) => advice.extend([
            "Schedule annual comprehensive eye exams due to age-related risk factors",
            "Consider age-related macular degeneration screening",
        ]),
        (ScoringVariant::Standard, AgeBand::Middle) => advice.extend([
            "Schedule bi-annual eye exams for early detection of age-related conditions",
            "Monitor for presbyopia and other age-related vision changes",
        ]),
        (ScoringVariant::Standard, AgeBand::Younger) => {
            advice.push("Schedule annual eye exams for preventive care")
        }
        (ScoringVariant::Final, AgeBand::Senior) => advice.extend([
            "Schedule annual comprehensive eye exams due to age-related risk factors",
            "Monitor for age-related macular degeneration and cataracts",
        ]),
        (_, AgeBand::Senior) => {
            advice.push("Schedule annual comprehensive eye exams due to age-related risk factors")
        }
        (_, AgeBand::Middle) => {
            advice.push("Schedule biennial eye exams to monitor for presbyopia and early eye diseases")
        }
        (_, AgeBand::Younger) => {
            advice.push("Maintain regular eye check-ups every 2-3 years for preventive care")
        }
    }

    match (variant, level) {
        (ScoringVariant::Standard, RiskLevel::High) => advice.extend([
            "Consult with an ophthalmologist for comprehensive evaluation",
            "Implement strict 20-20-20 rule: every 20 minutes, look 20 feet away for 20 seconds",
            "Consider blue light filtering glasses for screen use",
            "Monitor for symptoms of digital eye strain",
        ]),
        (ScoringVariant::Standard, RiskLevel::Medium) => advice.extend([
            "Follow the 20-20-20 rule during screen work",
            "Ensure proper lighting in your workspace",
            "Take regular breaks from screen activities",
        ]),
        (ScoringVariant::Standard, RiskLevel::Low) => advice.extend([
            "Maintain current eye health practices",
            "Continue regular eye exams as recommended",
        ]),
        (_, RiskLevel::High) => advice.extend([
            "Consult with an ophthalmologist for comprehensive evaluation",
            "Implement strict eye protection measures in all environments",
        ]),
        (ScoringVariant::ScreenTime, RiskLevel::Medium) => advice.extend([
            "Consider blue light filtering glasses for extended screen use",
            "Ensure adequate natural lighting in your workspace",
        ]),
        (_, RiskLevel::Medium) => advice.extend([
            TWENTY_RULE,
            "Consider blue light filtering glasses for extended screen use",
        ]),
        (_, RiskLevel::Low) => {
            advice.push("Maintain current healthy eye habits and continue preventive measures")
        }
    }

    if variant == ScoringVariant::Standard && is_remote(request) {
        advice.extend([
            "Consider telemedicine options for eye health consultations",
            "Plan regular visits to urban areas for comprehensive eye exams",
        ]);
    }

    advice.extend([EYE_NUTRITION, EYE_SUNGLASSES, EYE_LIFESTYLE]);
    if variant != ScoringVariant::ScreenTime {
        advice.push(EYE_CHRONIC);
    }
    advice
}

fn vitamin_d(level: RiskLevel, request: &RiskRequest) -> Vec<&'static str> {
    let mut advice = match level {
        RiskLevel::High => vec![
            "Ask your GP about a vitamin D blood test",
            "Discuss vitamin D supplementation with a health professional",
            "Spend a few minutes outdoors in the middle of the day on most days",
        ],
        RiskLevel::Medium => vec![
            "Aim for short periods of sun exposure on most days, following UV guidance",
            "Include vitamin D sources such as oily fish and eggs in your diet",
        ],
        RiskLevel::Low => vec!["Keep up your current outdoor activity and diet"],
    };

    if age_band(request) == AgeBand::Senior {
        advice.push("Older adults absorb less vitamin D from sunlight; consider regular checks");
    }
    advice.push("Check the daily UV index before extended time outdoors");
    advice
}

fn posture(level: RiskLevel, request: &RiskRequest) -> Vec<&'static str> {
    let mut advice = match level {
        RiskLevel::High => vec![
            "Consult a physiotherapist about back and neck discomfort",
            "Set up your desk so the top of the screen is at eye level",
            "Stand up and move for a few minutes every 30 minutes",
        ],
        RiskLevel::Medium => vec![
            "Take a short movement break every hour",
            "Keep feet flat on the floor with knees level with your hips",
        ],
        RiskLevel::Low => vec!["Maintain your current activity and workstation habits"],
    };

    if age_band(request) == AgeBand::Senior {
        advice.push("Include balance and strength exercises in your weekly routine");
    }
    advice.push("Aim for at least 150 minutes of moderate activity each week");
    advice
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(age_group: &str) -> RiskRequest {
        RiskRequest {
            age_group: Some(age_group.to_string()),
            remoteness_area: Some("Very Remote".to_string()),
            screen_time: Some(11.0),
            ..RiskRequest::default()
        }
    }

    fn assessment(domain: RiskDomain, level: RiskLevel) -> RiskAssessment {
        let mut assessment = RiskAssessment::degraded(domain, "fixture");
        assessment.risk_level = level;
        assessment
    }

    #[test]
    fn screen_time_advice_leads_the_screen_time_variant() {
        let advice = recommend(
            &assessment(RiskDomain::Eye, RiskLevel::Medium),
            &request("25–34"),
            ScoringVariant::ScreenTime,
        );
        assert!(advice[0].starts_with("CRITICAL"));
        assert!(!advice.iter().any(|line| line == EYE_CHRONIC));
    }

    #[test]
    fn location_advice_only_in_standard_variant() {
        let standard = recommend(
            &assessment(RiskDomain::Eye, RiskLevel::Low),
            &request("75+"),
            ScoringVariant::Standard,
        );
        assert!(standard.iter().any(|line| line.contains("telemedicine")));

        let final_variant = recommend(
            &assessment(RiskDomain::Eye, RiskLevel::Low),
            &request("75+"),
            ScoringVariant::Final,
        );
        assert!(!final_variant.iter().any(|line| line.contains("telemedicine")));
        assert!(final_variant[0].contains("age-related risk factors"));
    }

    #[test]
    fn other_domains_key_off_risk_level() {
        let high = recommend(
            &assessment(RiskDomain::VitaminD, RiskLevel::High),
            &request("25–34"),
            ScoringVariant::Final,
        );
        assert!(high[0].contains("blood test"));

        let low = recommend(
            &assessment(RiskDomain::Posture, RiskLevel::Low),
            &request("25–34"),
            ScoringVariant::Final,
        );
        assert_eq!(low.len(), 2);
    }
}
