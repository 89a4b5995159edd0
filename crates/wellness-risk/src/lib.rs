pub mod config;
pub mod datasets;
pub mod error;
pub mod scoring;
pub mod telemetry;
