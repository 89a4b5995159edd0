use crate::config::TelemetryConfig;
use crate::scoring::{RiskDomain, ScoringVariant};
use std::fmt;
use tracing::{info_span, Span};
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Name attached to every scoring span.
pub const SERVICE_NAME: &str = "wellness-risk";

/// Directives appended to the configured level so HTTP plumbing stays quiet
/// while scoring stages keep the requested verbosity.
const QUIET_DEPENDENCIES: &[&str] = &["hyper=warn", "axum::rejection=warn"];

/// Install the global subscriber. Logs go to stderr so CLI commands can keep
/// stdout reserved for JSON results.
pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => filter_for_level(&config.log_level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

/// Filter used when `RUST_LOG` is unset.
pub fn filter_for_level(level: &str) -> Result<EnvFilter, TelemetryError> {
    let directives = std::iter::once(level.trim())
        .chain(QUIET_DEPENDENCIES.iter().copied())
        .collect::<Vec<_>>()
        .join(",");
    EnvFilter::try_new(&directives).map_err(|source| TelemetryError::EnvFilter {
        value: level.to_string(),
        source,
    })
}

/// Span wrapping one domain assessment, so stage logs carry the domain and
/// variant they belong to.
pub fn scoring_span(domain: RiskDomain, variant: ScoringVariant) -> Span {
    info_span!(
        "score",
        service = SERVICE_NAME,
        domain = domain.slug(),
        variant = variant.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_keeps_dependencies_quiet() {
        let filter = filter_for_level(" debug ").expect("valid level");
        let rendered = filter.to_string();
        assert!(rendered.contains("debug"));
        assert!(rendered.contains("hyper=warn"));
    }

    #[test]
    fn invalid_level_reports_the_raw_value() {
        let err = filter_for_level("wellness_risk=loud").expect_err("invalid filter");
        assert!(err.to_string().contains("'wellness_risk=loud'"));
    }
}
