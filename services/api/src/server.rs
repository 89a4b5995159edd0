use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};
use wellness_risk::config::AppConfig;
use wellness_risk::datasets::CsvTableStore;
use wellness_risk::error::AppError;
use wellness_risk::scoring::RiskEngine;
use wellness_risk::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let engine = Arc::new(RiskEngine::from_config(&config.scoring));
    if !engine.registry().is_ready() {
        warn!(
            models_dir = %config.scoring.models_dir.display(),
            "some risk models failed to load; their endpoints will return 503"
        );
    }
    let store = Arc::new(CsvTableStore::new(config.datasets.data_dir.clone()));

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        models: Arc::clone(engine.registry()),
    };

    let app = with_service_routes(engine, store)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, screen_time_model = ?config.scoring.screen_time_model, "wellness risk service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
