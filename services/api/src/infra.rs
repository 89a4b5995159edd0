use metrics_exporter_prometheus::PrometheusHandle;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, warn};
use wellness_risk::scoring::{ModelRegistry, RiskDomain, RiskRequest, ScoringVariant};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) models: Arc<ModelRegistry>,
}

/// Resolve a CLI input argument into a request.
///
/// An existing path is read as a JSON file, anything else is parsed as inline
/// JSON. Unreadable or malformed input yields an empty request so the variant
/// defaults apply.
pub(crate) fn read_input_source(raw: Option<&str>) -> RiskRequest {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        debug!("no input supplied, using defaults");
        return RiskRequest::default();
    };

    let path = Path::new(raw);
    if path.is_file() {
        match fs::read(path) {
            Ok(bytes) => RiskRequest::from_slice_lenient(&bytes),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "cannot read input file, using defaults");
                RiskRequest::default()
            }
        }
    } else {
        RiskRequest::from_slice_lenient(raw.as_bytes())
    }
}

pub(crate) fn parse_domain(raw: &str) -> Result<RiskDomain, String> {
    RiskDomain::from_slug(raw)
        .ok_or_else(|| format!("unknown domain '{raw}' (expected eye, vitamin-d or posture)"))
}

pub(crate) fn parse_variant(raw: &str) -> Result<ScoringVariant, String> {
    ScoringVariant::from_label(raw).ok_or_else(|| {
        format!("unknown variant '{raw}' (expected standard, final, screen_time or aggregate)")
    })
}
