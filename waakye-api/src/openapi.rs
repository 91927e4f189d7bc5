//! OpenAPI Specification for the Waakye API
//!
//! Generated by utoipa from the route annotations and schema derives.

use utoipa::OpenApi;

use crate::error::{ApiError, ErrorCode};
use crate::routes::health::{ComponentHealth, HealthDetails, HealthResponse, HealthStatus};
use crate::routes::{health, vendor};
use crate::telemetry::metrics;
use crate::types::{CreateVendorRequest, LocationRequest, RateVendorRequest};

use waakye_core::{
    Location, Rating, RatingAggregate, RatingComment, RatingScores, Vendor, VendorRatings,
};

/// OpenAPI document for the Waakye API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Waakye Directory API",
        version = "0.1.0",
        description = "Find, rate and review waakye vendors",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local Development")
    ),
    tags(
        (name = "Vendors", description = "Vendor registration, listing and search"),
        (name = "Ratings", description = "Rating submission and aggregates"),
        (name = "Health", description = "Liveness and readiness checks"),
        (name = "Observability", description = "Prometheus metrics")
    ),
    paths(
        // === Vendor Routes ===
        vendor::create_vendor,
        vendor::list_vendors,
        vendor::get_vendor,
        vendor::nearby_vendors,
        vendor::verified_vendors,
        vendor::top_rated_vendors,

        // === Rating Routes ===
        vendor::rate_vendor,
        vendor::vendor_ratings,

        // === Health Routes ===
        health::ping,
        health::liveness,
        health::readiness,

        // === Metrics ===
        metrics::metrics_handler,
    ),
    components(
        schemas(
            // === Error Types ===
            ApiError, ErrorCode,

            // === Request Types ===
            CreateVendorRequest, LocationRequest, RateVendorRequest,

            // === Domain Types ===
            Vendor, Location, Rating, RatingScores, RatingAggregate,
            RatingComment, VendorRatings,

            // === Health Types ===
            HealthResponse, HealthStatus, HealthDetails, ComponentHealth,
        )
    )
)]
pub struct ApiDoc;
