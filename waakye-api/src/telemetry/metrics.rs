//! Prometheus Metrics Definitions
//!
//! Defines the directory's metrics with their labels and exposes a
//! /metrics endpoint for Prometheus scraping.

use axum::{http::StatusCode, response::IntoResponse};
use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

use crate::error::{ApiError, ApiResult};

/// HTTP request latency buckets (seconds)
/// Covers: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 2.5s, 5s, 10s
const HTTP_LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0, 10.0,
];

/// Database operation latency buckets (seconds)
const DB_LATENCY_BUCKETS: &[f64] =
    &[0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5, 5.0];

/// Global metrics instance - initialized once at startup
pub static METRICS: Lazy<ApiResult<WaakyeMetrics>> = Lazy::new(WaakyeMetrics::new);

fn register_failed(name: &str, e: prometheus::Error) -> ApiError {
    ApiError::internal_error(format!("Failed to register {}: {}", name, e))
}

/// Container for all directory metrics.
#[derive(Clone)]
pub struct WaakyeMetrics {
    /// HTTP request counter - labels: method, path, status
    pub http_requests_total: CounterVec,

    /// HTTP request duration histogram - labels: method, path
    pub http_request_duration_seconds: HistogramVec,

    /// Database operation counter - labels: operation, entity, status
    pub db_operations_total: CounterVec,

    /// Database operation duration histogram - labels: operation, entity
    pub db_operation_duration_seconds: HistogramVec,

    /// Vendor cache lookups - labels: backend, outcome (hit/miss/error)
    pub cache_lookups_total: CounterVec,

    /// Accepted ratings - labels: status
    pub ratings_submitted_total: CounterVec,
}

impl WaakyeMetrics {
    /// Create and register all metrics with Prometheus.
    pub fn new() -> ApiResult<Self> {
        Ok(Self {
            http_requests_total: register_counter_vec!(
                "waakye_http_requests_total",
                "Total number of HTTP requests",
                &["method", "path", "status"]
            )
            .map_err(|e| register_failed("http_requests_total", e))?,

            http_request_duration_seconds: register_histogram_vec!(
                "waakye_http_request_duration_seconds",
                "HTTP request duration in seconds",
                &["method", "path"],
                HTTP_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| register_failed("http_request_duration_seconds", e))?,

            db_operations_total: register_counter_vec!(
                "waakye_db_operations_total",
                "Total number of database operations",
                &["operation", "entity", "status"]
            )
            .map_err(|e| register_failed("db_operations_total", e))?,

            db_operation_duration_seconds: register_histogram_vec!(
                "waakye_db_operation_duration_seconds",
                "Database operation duration in seconds",
                &["operation", "entity"],
                DB_LATENCY_BUCKETS.to_vec()
            )
            .map_err(|e| register_failed("db_operation_duration_seconds", e))?,

            cache_lookups_total: register_counter_vec!(
                "waakye_cache_lookups_total",
                "Vendor cache lookups by outcome",
                &["backend", "outcome"]
            )
            .map_err(|e| register_failed("cache_lookups_total", e))?,

            ratings_submitted_total: register_counter_vec!(
                "waakye_ratings_submitted_total",
                "Total rating submissions",
                &["status"]
            )
            .map_err(|e| register_failed("ratings_submitted_total", e))?,
        })
    }

    /// Record an HTTP request.
    pub fn record_http_request(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        let status_str = status.to_string();
        self.http_requests_total
            .with_label_values(&[method, path, &status_str])
            .inc();
        self.http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(duration_secs);
    }

    /// Record a database operation.
    pub fn record_db_operation(
        &self,
        operation: &str,
        entity: &str,
        success: bool,
        duration_secs: f64,
    ) {
        let status = if success { "success" } else { "error" };
        self.db_operations_total
            .with_label_values(&[operation, entity, status])
            .inc();
        self.db_operation_duration_seconds
            .with_label_values(&[operation, entity])
            .observe(duration_secs);
    }

    /// Record a vendor cache lookup.
    pub fn record_cache_lookup(&self, backend: &str, outcome: CacheOutcome) {
        self.cache_lookups_total
            .with_label_values(&[backend, outcome.as_str()])
            .inc();
    }

    /// Record a rating submission.
    pub fn record_rating(&self, success: bool) {
        let status = if success { "success" } else { "error" };
        self.ratings_submitted_total
            .with_label_values(&[status])
            .inc();
    }
}

/// Outcome label for cache lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
    Error,
}

impl CacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Error => "error",
        }
    }
}

/// Handler for GET /metrics endpoint.
///
/// Returns Prometheus text format metrics.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Observability",
    responses(
        (status = 200, description = "Prometheus metrics in text format", content_type = "text/plain"),
        (status = 500, description = "Failed to encode metrics"),
    ),
)]
pub async fn metrics_handler() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    match encoder.encode(&metric_families, &mut buffer) {
        Ok(_) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {}", e).into_bytes(),
            )
        }
    }
}
