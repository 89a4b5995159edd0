use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub datasets: DatasetConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let models_dir = env::var("APP_MODELS_DIR").unwrap_or_else(|_| "models".to_string());
        let screen_time_model = ScreenTimeModelMode::from_str(
            &env::var("APP_SCREEN_TIME_MODEL").unwrap_or_else(|_| "disabled".to_string()),
        )?;

        let data_dir = env::var("APP_DATA_DIR").unwrap_or_else(|_| "data".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringConfig {
                models_dir: PathBuf::from(models_dir),
                screen_time_model,
            },
            datasets: DatasetConfig {
                data_dir: PathBuf::from(data_dir),
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where model artifacts live and how the screen-time route is chosen.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub models_dir: PathBuf,
    pub screen_time_model: ScreenTimeModelMode,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            screen_time_model: ScreenTimeModelMode::Disabled,
        }
    }
}

/// Whether the dedicated screen-time classifier may serve requests.
///
/// The heuristic multiplier over the base eye model is used unless this is
/// explicitly `Enabled` and the dedicated artifact loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScreenTimeModelMode {
    #[default]
    Disabled,
    Enabled,
}

impl ScreenTimeModelMode {
    fn from_str(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "disabled" | "off" | "false" => Ok(Self::Disabled),
            "enabled" | "on" | "true" => Ok(Self::Enabled),
            other => Err(ConfigError::InvalidScreenTimeMode(other.to_string())),
        }
    }
}

/// Location of the CSV tables exposed by the tabular data endpoints.
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub data_dir: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidScreenTimeMode(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidScreenTimeMode(value) => write!(
                f,
                "APP_SCREEN_TIME_MODEL must be 'enabled' or 'disabled' (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidScreenTimeMode(_) => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
