//! End-to-end scenarios against the model artifacts shipped in `models/`.
//!
//! Everything goes through the public engine and router so the checked-in
//! vocabularies and classifiers are validated the same way the service loads them.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use wellness_risk::config::ScreenTimeModelMode;
use wellness_risk::scoring::{
    risk_router, ModelRegistry, ModelState, ModelTag, RiskDomain, RiskEngine, RiskRequest,
    ScoringVariant,
};

const MODELS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../models");

fn registry() -> Arc<ModelRegistry> {
    Arc::new(ModelRegistry::load(Path::new(MODELS_DIR)))
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.01,
        "expected {expected}, got {actual}"
    );
}

fn request(json: &str) -> RiskRequest {
    RiskRequest::from_slice_lenient(json.as_bytes())
}

#[test]
fn shipped_artifacts_load_cleanly() {
    let registry = registry();
    assert!(registry.is_ready());

    let status = registry.status();
    assert_eq!(status.len(), 4);
    assert!(status.iter().all(|entry| entry.state == ModelState::Loaded));
    assert!(registry.screen_time_model().is_some());

    let inventory = registry.encoder_inventory();
    assert!(inventory
        .iter()
        .any(|summary| summary.model == "eye" && summary.field == "dimension"));
}

#[test]
fn wellness_blend_uses_raw_classifier_output() {
    let engine = RiskEngine::new(registry(), ScreenTimeModelMode::Disabled);
    let report = engine.wellness(&RiskRequest::default()).expect("models loaded");

    assert_close(report.vitamin_d.risk_percent(), 38.94);
    assert_close(report.eye.risk_percent(), 30.15);
    assert_close(report.posture.risk_percent(), 42.80);
    assert_close(report.overall_score().expect("finite score"), 36.58);
    assert!(report.assessments().iter().all(|a| a.adjustments.is_empty()));
}

#[test]
fn every_variant_stays_within_its_bounds() {
    let engine = RiskEngine::new(registry(), ScreenTimeModelMode::Disabled);
    let body = request(
        r#"{"ageGroup":"65–74","sex":"Female","state":"NT","remotenessArea":"Very Remote","screenTime":14}"#,
    );

    for domain in RiskDomain::ALL {
        for variant in [
            ScoringVariant::Standard,
            ScoringVariant::Final,
            ScoringVariant::ScreenTime,
        ] {
            let report = engine.assess(domain, variant, &body).expect("models loaded");
            let risk = report.risk_percent();
            assert!(
                (10.0..=95.0).contains(&risk),
                "{domain} {variant:?} produced {risk}"
            );
            assert!(!report.assessment.is_degraded());
        }
    }
}

#[test]
fn dedicated_screen_time_model_scores_eye_when_enabled() {
    let engine = RiskEngine::new(registry(), ScreenTimeModelMode::Enabled);
    let body = request(r#"{"ageGroup":"25–34","screenTime":8}"#);

    let eye = engine
        .assess(RiskDomain::Eye, ScoringVariant::ScreenTime, &body)
        .expect("eye model loaded");
    assert_eq!(eye.assessment.model_used, ModelTag::DedicatedScreenTime);

    let posture = engine
        .assess(RiskDomain::Posture, ScoringVariant::ScreenTime, &body)
        .expect("posture model loaded");
    assert_eq!(posture.assessment.model_used, ModelTag::HeuristicScreenTime);
}

#[test]
fn out_of_vocabulary_age_group_degrades_instead_of_failing() {
    let engine = RiskEngine::new(registry(), ScreenTimeModelMode::Disabled);
    let report = engine
        .assess(
            RiskDomain::VitaminD,
            ScoringVariant::Final,
            &request(r#"{"ageGroup":"65+"}"#),
        )
        .expect("model loaded");

    assert!(report.assessment.is_degraded());
    assert_close(report.risk_percent(), 50.0);
    assert_eq!(report.assessment.model_used, ModelTag::DefaultFallback);
}

#[tokio::test]
async fn http_flow_scores_eye_health_with_shipped_models() {
    let engine = Arc::new(RiskEngine::new(registry(), ScreenTimeModelMode::Disabled));
    let response = risk_router(engine)
        .oneshot(
            Request::post("/api/v1/eye-health/analyze?variant=standard")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"ageGroup":"45–54","sex":"Male","state":"QLD","remotenessArea":"Inner Regional"}"#,
                ))
                .expect("request"),
        )
        .await
        .expect("route response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    let payload: Value = serde_json::from_slice(&body).expect("json payload");
    assert_eq!(payload["success"], true);
    assert_eq!(payload["data"]["variant"], "standard");
    assert_eq!(payload["data"]["model_used"], "eye_model");
    let applied = &payload["data"]["adjustments_applied"];
    assert_eq!(applied["remoteness"]["value"], "Inner Regional");
    assert_eq!(applied["remoteness"]["multiplier"], 1.0);
    assert_eq!(applied["state"]["value"], "QLD");
    assert_eq!(applied["state"]["multiplier"], 0.98);
    assert!(payload["data"]["recommendations"]
        .as_array()
        .is_some_and(|items| !items.is_empty()));
}
