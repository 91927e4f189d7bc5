//! Tracing Subscriber Initialization
//!
//! Installs the process-wide subscriber: an `EnvFilter` plus either JSON
//! lines (production) or human-readable output (local development).

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::error::{ApiError, ApiResult};

const DEFAULT_FILTER: &str = "waakye_api=debug,tower_http=debug,info";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// Telemetry configuration from environment variables.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Environment (production, staging, development)
    pub environment: String,
    /// Log line format
    pub log_format: LogFormat,
}

impl TelemetryConfig {
    /// Load from `WAAKYE_ENVIRONMENT` and `WAAKYE_LOG_FORMAT`.
    ///
    /// Without an explicit format, development gets pretty output and every
    /// other environment gets JSON.
    pub fn from_env() -> Self {
        let environment =
            std::env::var("WAAKYE_ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let log_format = match std::env::var("WAAKYE_LOG_FORMAT").ok().as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            _ if environment == "development" => LogFormat::Pretty,
            _ => LogFormat::Json,
        };
        Self {
            service_name: "waakye-api".to_string(),
            environment,
            log_format,
        }
    }
}

/// Install the global tracing subscriber. Call once at startup.
pub fn init_tracing(config: &TelemetryConfig) -> ApiResult<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
    };

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(env_filter)
        .try_init()
        .map_err(|e| ApiError::internal_error(format!("Failed to init subscriber: {}", e)))?;

    tracing::info!(
        service_name = config.service_name,
        environment = config.environment,
        log_format = ?config.log_format,
        "Telemetry initialized"
    );

    Ok(())
}
