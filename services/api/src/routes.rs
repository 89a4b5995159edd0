use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;
use wellness_risk::datasets::{dataset_router, TableStore};
use wellness_risk::scoring::{risk_router, RiskEngine};

pub(crate) fn with_service_routes<S>(engine: Arc<RiskEngine>, store: Arc<S>) -> axum::Router
where
    S: TableStore + 'static,
{
    risk_router(engine)
        .merge(dataset_router(store))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Ready once the listener is bound and every domain model loaded.
pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let started = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let models = state.models.status();

    let (status, label) = if !started {
        (StatusCode::SERVICE_UNAVAILABLE, "initializing")
    } else if state.models.is_ready() {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (status, Json(json!({ "status": label, "models": models })))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
