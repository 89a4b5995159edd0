//! Risk scoring engine: encode a request, run the domain classifier, apply
//! heuristic multipliers, then label and blend the results.

pub mod adjustment;
pub mod classification;
pub mod domain;
pub mod encoder;
pub mod engine;
pub mod fallback;
pub mod model;
pub mod profile;
pub mod recommendations;
pub mod registry;
pub mod router;
pub mod wellness;

#[cfg(test)]
mod tests;

pub use adjustment::{adjust, AdjustedRisk, AdjustmentSet, RiskBounds};
pub use classification::ConfidencePolicy;
pub use domain::{
    Adjustment, AdjustmentFactor, AssessmentOutcome, Confidence, ModelTag, RiskAssessment,
    RiskDomain, RiskLevel, RiskRequest, WellnessScore,
};
pub use encoder::{CategoryEncoder, UnknownCategoryError};
pub use engine::{DomainReport, RiskEngine, WellnessReport};
pub use fallback::FallbackController;
pub use model::{ModelInferenceError, RiskModel};
pub use profile::{ScoringVariant, VariantProfile};
pub use registry::{ModelLoadError, ModelRegistry, ModelState, ModelStatus};
pub use router::risk_router;
pub use wellness::{aggregate, AggregationError};
