use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use super::common::*;
use crate::config::ScreenTimeModelMode;
use crate::scoring::domain::RiskDomain;
use crate::scoring::registry::ModelRegistry;
use crate::scoring::RiskEngine;

fn post(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request")
}

#[tokio::test]
async fn eye_route_wraps_report_in_success_envelope() {
    let router = router_with(engine(0.5, 0.4, 0.5));
    let payload = json!({
        "ageGroup": "25–34",
        "sex": "Male",
        "state": "VIC",
        "remotenessArea": "Major Cities"
    });

    let response = router
        .oneshot(post(
            "/api/v1/eye-health/analyze?variant=standard",
            serde_json::to_vec(&payload).expect("json"),
        ))
        .await
        .expect("route response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["success"], true);
    assert!(body["timestamp"].is_string());
    assert_eq!(body["data"]["eye_risk"], 42.42);
    assert_eq!(body["data"]["variant"], "standard");
}

#[tokio::test]
async fn adjustments_echo_the_raw_value_behind_each_multiplier() {
    let router = router_with(engine(0.5, 0.4, 0.5));
    let payload = json!({
        "ageGroup": "25–34",
        "sex": "male",
        "state": "nsw",
        "remotenessArea": "very remote"
    });

    let response = router
        .oneshot(post(
            "/api/v1/eye-health/analyze?variant=standard",
            serde_json::to_vec(&payload).expect("json"),
        ))
        .await
        .expect("route response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    let applied = &body["data"]["adjustments_applied"];
    assert_eq!(applied["sex"], json!({ "value": "male", "multiplier": 1.0 }));
    assert_eq!(applied["state"], json!({ "value": "nsw", "multiplier": 1.0 }));
    assert_eq!(
        applied["remoteness"],
        json!({ "value": "very remote", "multiplier": 1.0 })
    );
    assert_eq!(body["data"]["eye_risk"], 40.0);
}

#[tokio::test]
async fn eye_route_defaults_to_final_variant() {
    let router = router_with(engine(0.5, 0.5, 0.5));
    let response = router
        .oneshot(post("/api/v1/eye-health/analyze", "{}"))
        .await
        .expect("route response");

    let body = read_json_body(response).await;
    assert_eq!(body["data"]["variant"], "final");
    assert_eq!(body["data"]["input_data"]["sex"], "Male");
    assert_eq!(body["data"]["eye_risk"], 52.5);
}

#[tokio::test]
async fn malformed_body_is_scored_with_defaults() {
    let router = router_with(engine(0.5, 0.5, 0.5));
    let response = router
        .oneshot(post(
            "/api/v1/eye-health/analyze?variant=screen_time",
            "{\"ageGroup\": ",
        ))
        .await
        .expect("route response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["data"]["input_data"]["screenTime"], 8.0);
    assert_eq!(body["data"]["base_risk"], 50.0);
    assert!(body["data"].get("error").is_none());
}

#[tokio::test]
async fn unknown_variant_is_rejected() {
    let router = router_with(engine(0.5, 0.5, 0.5));
    let response = router
        .oneshot(post("/api/v1/posture/analyze?variant=experimental", "{}"))
        .await
        .expect("route response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error")
        .contains("experimental"));
}

#[tokio::test]
async fn unloaded_model_returns_service_unavailable() {
    let registry = ModelRegistry::builder()
        .with_model(vitamin_d_model(0.5))
        .with_model(eye_model(0.5))
        .with_failure(RiskDomain::Posture, "posture.json not found")
        .build();
    let engine = RiskEngine::new(Arc::new(registry), ScreenTimeModelMode::Disabled);
    let router = router_with(engine);

    let response = router
        .clone()
        .oneshot(post("/api/v1/posture/analyze", "{}"))
        .await
        .expect("route response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "Posture model loading failed: posture.json not found"
    );
    assert!(body.get("data").is_none());

    let response = router
        .oneshot(post("/api/v1/wellness/predict", "{}"))
        .await
        .expect("route response");
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = read_json_body(response).await;
    assert_eq!(
        body["error"],
        "Posture model loading failed: posture.json not found"
    );
}

#[tokio::test]
async fn wellness_route_returns_overall_score() {
    let router = router_with(engine(0.6, 0.8, 0.4));
    let response = router
        .oneshot(post("/api/v1/wellness/predict", ""))
        .await
        .expect("route response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["data"]["overall_wellness_score"], 62.0);
    assert_eq!(body["data"]["vitamin_d_risk"], 60.0);
}

#[tokio::test]
async fn vitamin_d_route_reports_its_own_risk_key() {
    let router = router_with(engine(0.75, 0.5, 0.5));
    let response = router
        .oneshot(post(
            "/api/v1/vitamin-d/analyze",
            "{\"ageGroup\":\"75+\",\"sex\":\"Female\"}",
        ))
        .await
        .expect("route response");

    let body = read_json_body(response).await;
    assert_eq!(body["data"]["vitamin_d_risk"], 73.5);
    assert_eq!(body["data"]["risk_level"], "High");
    assert_eq!(body["data"]["model_used"], "vitamin_d_model");
}

#[tokio::test]
async fn options_route_lists_selectable_inputs() {
    let router = router_with(engine(0.5, 0.5, 0.5));
    let response = router
        .oneshot(
            Request::get("/api/v1/wellness/options")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("route response");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["states"].as_array().expect("states").len(), 8);
    assert_eq!(body["genders"][2], "Persons");
    assert!(body["age_groups"]
        .as_array()
        .expect("age groups")
        .iter()
        .any(|age| age == "25–34"));
}
