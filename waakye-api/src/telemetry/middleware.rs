//! Axum Middleware for HTTP Request Tracing and Metrics
//!
//! Wraps every request in an `http_request` span and records the
//! Prometheus request counter and latency histogram.

use axum::{extract::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Instant;
use tracing::{info_span, Instrument};

use super::metrics::METRICS;

static UUID_PATTERN: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
});

static NUMERIC_ID_PATTERN: Lazy<Result<Regex, regex::Error>> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)"));

/// Fixed segments directly under `/vendors/`.
const VENDOR_ROUTES: &[&str] = &["nearby", "verified", "top_rated"];

/// Segments allowed after a vendor id.
const VENDOR_ACTIONS: &[&str] = &["rate", "ratings"];

/// Bound everything under `/vendors/` to the routed shapes. `None` when the
/// path has no vendor segment.
fn collapse_vendor_segments(path: &str) -> Option<String> {
    let (prefix, rest) = path.split_once("/vendors/")?;
    let mut segments = rest.split('/');
    let head = segments.next().unwrap_or_default();
    let named = head.is_empty() || VENDOR_ROUTES.contains(&head);

    let mut normalized = format!("{}/vendors/{}", prefix, if named { head } else { "{id}" });
    match (segments.next(), segments.next()) {
        (None, _) => {}
        (Some(action), None) if !named && VENDOR_ACTIONS.contains(&action) => {
            normalized.push('/');
            normalized.push_str(action);
        }
        _ => normalized.push_str("/{rest}"),
    }
    Some(normalized)
}

/// Normalize path for metrics/spans (replace UUIDs and IDs with placeholders).
///
/// This prevents high-cardinality label explosion in Prometheus.
pub fn normalize_path(path: &str) -> String {
    let mut result = collapse_vendor_segments(path).unwrap_or_else(|| path.to_string());
    if let Ok(uuid) = UUID_PATTERN.as_ref() {
        result = uuid.replace_all(&result, "{id}").into_owned();
    }
    if let Ok(numeric) = NUMERIC_ID_PATTERN.as_ref() {
        result = numeric.replace_all(&result, "/{id}$1").into_owned();
    }
    result
}

/// Observability middleware for Axum.
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let normalized_path = normalize_path(&path);

    let span = info_span!(
        "http_request",
        http.method = %method,
        http.target = %path,
        http.route = %normalized_path,
    );

    let response = next.run(request).instrument(span).await;

    let duration = start.elapsed();
    let status = response.status();

    if let Ok(metrics) = METRICS.as_ref() {
        metrics.record_http_request(
            method.as_str(),
            &normalized_path,
            status.as_u16(),
            duration.as_secs_f64(),
        );
    }

    tracing::info!(
        method = %method,
        path = %path,
        status = status.as_u16(),
        duration_ms = duration.as_millis(),
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_uuid() {
        let path = "/api/v1/vendors/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(normalize_path(path), "/api/v1/vendors/{id}");
    }

    #[test]
    fn test_normalize_path_rate() {
        let path = "/api/v1/vendors/550e8400-e29b-41d4-a716-446655440000/rate";
        assert_eq!(normalize_path(path), "/api/v1/vendors/{id}/rate");
    }

    #[test]
    fn test_normalize_path_numeric_id() {
        assert_eq!(normalize_path("/api/v1/vendors/12345"), "/api/v1/vendors/{id}");
    }

    #[test]
    fn test_normalize_path_named_routes_untouched() {
        assert_eq!(normalize_path("/api/v1/vendors/top_rated"), "/api/v1/vendors/top_rated");
        assert_eq!(normalize_path("/api/v1/vendors/nearby"), "/api/v1/vendors/nearby");
        assert_eq!(normalize_path("/api/v1/vendors"), "/api/v1/vendors");
        assert_eq!(normalize_path("/api/v1/vendors/"), "/api/v1/vendors/");
        assert_eq!(normalize_path("/health/ready"), "/health/ready");
    }

    #[test]
    fn test_normalize_path_malformed_vendor_ids_collapse() {
        assert_eq!(normalize_path("/api/v1/vendors/not-a-uuid"), "/api/v1/vendors/{id}");
        assert_eq!(
            normalize_path("/api/v1/vendors/zzz%20123/ratings"),
            "/api/v1/vendors/{id}/ratings"
        );
        assert_eq!(
            normalize_path("/api/v1/vendors/abc/anything/else"),
            "/api/v1/vendors/{id}/{rest}"
        );
        assert_eq!(
            normalize_path("/api/v1/vendors/verified/extra"),
            "/api/v1/vendors/verified/{rest}"
        );
    }
}
