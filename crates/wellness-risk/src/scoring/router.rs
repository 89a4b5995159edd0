use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::adjustment::{known_remoteness_areas, known_states};
use crate::error::AppError;
use super::domain::{RiskDomain, RiskRequest};
use super::engine::RiskEngine;
use super::profile::{ScoringVariant, AGE_GROUPS, SEXES};
use super::registry::ModelLoadError;

/// Router builder exposing the scoring endpoints.
pub fn risk_router(engine: Arc<RiskEngine>) -> Router {
    Router::new()
        .route("/api/v1/eye-health/analyze", post(eye_handler))
        .route("/api/v1/vitamin-d/analyze", post(vitamin_d_handler))
        .route("/api/v1/posture/analyze", post(posture_handler))
        .route("/api/v1/wellness/predict", post(wellness_handler))
        .route("/api/v1/wellness/options", get(options_handler))
        .with_state(engine)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct VariantQuery {
    variant: Option<String>,
}

/// Success body shared by every scoring endpoint.
#[derive(Debug, Serialize)]
struct Envelope<T> {
    success: bool,
    data: T,
    timestamp: DateTime<Utc>,
}

fn success<T: Serialize>(data: T) -> Response {
    let body = Envelope {
        success: true,
        data,
        timestamp: Utc::now(),
    };
    (StatusCode::OK, axum::Json(body)).into_response()
}

fn load_failure(err: ModelLoadError) -> Response {
    AppError::from(err).into_response()
}

fn analyze(engine: &RiskEngine, domain: RiskDomain, query: VariantQuery, body: &[u8]) -> Response {
    let variant = match query.variant.as_deref() {
        None => ScoringVariant::Final,
        Some(raw) => match ScoringVariant::from_label(raw) {
            Some(variant) => variant,
            None => {
                let payload = json!({
                    "error": format!("unknown scoring variant '{raw}'"),
                });
                return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
            }
        },
    };

    let request = RiskRequest::from_slice_lenient(body);
    match engine.assess(domain, variant, &request) {
        Ok(report) => success(report),
        Err(err) => load_failure(err),
    }
}

pub(crate) async fn eye_handler(
    State(engine): State<Arc<RiskEngine>>,
    Query(query): Query<VariantQuery>,
    body: Bytes,
) -> Response {
    analyze(&engine, RiskDomain::Eye, query, &body)
}

pub(crate) async fn vitamin_d_handler(
    State(engine): State<Arc<RiskEngine>>,
    Query(query): Query<VariantQuery>,
    body: Bytes,
) -> Response {
    analyze(&engine, RiskDomain::VitaminD, query, &body)
}

pub(crate) async fn posture_handler(
    State(engine): State<Arc<RiskEngine>>,
    Query(query): Query<VariantQuery>,
    body: Bytes,
) -> Response {
    analyze(&engine, RiskDomain::Posture, query, &body)
}

pub(crate) async fn wellness_handler(
    State(engine): State<Arc<RiskEngine>>,
    body: Bytes,
) -> Response {
    let request = RiskRequest::from_slice_lenient(&body);
    match engine.wellness(&request) {
        Ok(report) => success(report),
        Err(err) => load_failure(err),
    }
}

pub(crate) async fn options_handler() -> Response {
    let payload = json!({
        "age_groups": AGE_GROUPS,
        "genders": SEXES,
        "states": known_states(),
        "remoteness_areas": known_remoteness_areas(),
        "variants": ScoringVariant::ALL.map(ScoringVariant::label),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}
