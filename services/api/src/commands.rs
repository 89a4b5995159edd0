use crate::infra::{parse_domain, parse_variant, read_input_source};
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;
use serde_json::json;
use std::io::Write;
use wellness_risk::config::AppConfig;
use wellness_risk::error::AppError;
use wellness_risk::scoring::registry::EncoderSummary;
use wellness_risk::scoring::{ModelStatus, RiskDomain, RiskEngine, ScoringVariant};
use wellness_risk::telemetry;

#[derive(Args, Debug)]
pub(crate) struct AssessArgs {
    /// Domain to score: eye, vitamin-d or posture
    #[arg(value_parser = parse_domain)]
    pub(crate) domain: RiskDomain,
    /// Path to a JSON request file, or the request as inline JSON
    pub(crate) input: Option<String>,
    /// Scoring variant: standard, final or screen_time (defaults to final)
    #[arg(long, value_parser = parse_variant)]
    pub(crate) variant: Option<ScoringVariant>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct WellnessArgs {
    /// Path to a JSON request file, or the request as inline JSON
    pub(crate) input: Option<String>,
}

fn engine() -> Result<RiskEngine, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(RiskEngine::from_config(&config.scoring))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

pub(crate) fn run_assess(args: AssessArgs) -> Result<(), AppError> {
    let engine = engine()?;
    let request = read_input_source(args.input.as_deref());
    let variant = args.variant.unwrap_or_default();

    match engine.assess(args.domain, variant, &request) {
        Ok(report) => print_json(&report),
        Err(err) => print_json(&json!({ "error": err.to_string() })),
    }
}

pub(crate) fn run_wellness(args: WellnessArgs) -> Result<(), AppError> {
    let engine = engine()?;
    let request = read_input_source(args.input.as_deref());

    match engine.wellness(&request) {
        Ok(report) => print_json(&report),
        Err(err) => print_json(&json!({ "error": err.to_string() })),
    }
}

#[derive(Debug, Serialize)]
struct EncoderReport {
    generated_at: DateTime<Utc>,
    models: Vec<ModelStatus>,
    encoders: Vec<EncoderSummary>,
}

/// Print every model's load state and category vocabularies.
pub(crate) fn run_encoders() -> Result<(), AppError> {
    let engine = engine()?;
    let registry = engine.registry();
    print_json(&EncoderReport {
        generated_at: Utc::now(),
        models: registry.status(),
        encoders: registry.encoder_inventory(),
    })
}
