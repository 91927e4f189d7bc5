//! Vendor REST API Routes
//!
//! Thin handlers: decode the request, validate it into core types, call
//! the directory and wrap the result in the response envelope.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use waakye_core::{Rating, Vendor, VendorId, VendorRatings};

use crate::{
    error::{ApiError, ApiResult},
    extractors::PathId,
    services::VendorDirectory,
    state::AppState,
    types::{
        CreateVendorRequest, DataResponse, NearbyQuery, PaginatedResponse, PaginationQuery,
        RateVendorRequest,
    },
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /api/v1/vendors - Register a vendor
#[utoipa::path(
    post,
    path = "/api/v1/vendors",
    tag = "Vendors",
    request_body = CreateVendorRequest,
    responses(
        (status = 201, description = "Vendor created successfully", body = DataResponse<Vendor>),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 500, description = "Storage failure", body = ApiError),
    ),
)]
pub async fn create_vendor(
    State(directory): State<Arc<VendorDirectory>>,
    payload: Result<Json<CreateVendorRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let vendor = directory.create_vendor(req.into_new_vendor()?).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(vendor, "Vendor created successfully")),
    ))
}

/// GET /api/v1/vendors - List vendors, newest first
#[utoipa::path(
    get,
    path = "/api/v1/vendors",
    tag = "Vendors",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Vendors retrieved successfully", body = PaginatedResponse<Vendor>),
        (status = 400, description = "Invalid pagination", body = ApiError),
    ),
)]
pub async fn list_vendors(
    State(directory): State<Arc<VendorDirectory>>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = query?;
    let page = directory.list_vendors(params.to_page_request()?).await?;

    Ok(Json(PaginatedResponse::from_page(
        page,
        "Vendors retrieved successfully",
    )))
}

/// GET /api/v1/vendors/{id} - Vendor with rating summary and history
#[utoipa::path(
    get,
    path = "/api/v1/vendors/{id}",
    tag = "Vendors",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    responses(
        (status = 200, description = "Vendor retrieved successfully", body = DataResponse<Vendor>),
        (status = 400, description = "Malformed vendor ID", body = ApiError),
        (status = 404, description = "Vendor not found", body = ApiError),
    ),
)]
pub async fn get_vendor(
    State(directory): State<Arc<VendorDirectory>>,
    PathId(id): PathId<VendorId>,
) -> ApiResult<impl IntoResponse> {
    let read = directory.get_vendor(id).await?;
    let message = if read.from_cache {
        "Vendor retrieved successfully from cache"
    } else {
        "Vendor retrieved successfully"
    };

    Ok(Json(DataResponse::new(read.vendor, message)))
}

/// GET /api/v1/vendors/nearby - Vendors within a radius, nearest first
#[utoipa::path(
    get,
    path = "/api/v1/vendors/nearby",
    tag = "Vendors",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Nearby vendors retrieved successfully", body = DataResponse<Vec<Vendor>>),
        (status = 400, description = "Missing or invalid coordinates", body = ApiError),
    ),
)]
pub async fn nearby_vendors(
    State(directory): State<Arc<VendorDirectory>>,
    query: Result<Query<NearbyQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = query?;
    let (center, radius) = params.to_search()?;
    let vendors = directory.nearby_vendors(center, radius).await?;

    Ok(Json(DataResponse::new(
        vendors,
        "Nearby vendors retrieved successfully",
    )))
}

/// GET /api/v1/vendors/verified - Verified vendors, newest first
#[utoipa::path(
    get,
    path = "/api/v1/vendors/verified",
    tag = "Vendors",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Verified vendors retrieved successfully", body = PaginatedResponse<Vendor>),
        (status = 400, description = "Invalid pagination", body = ApiError),
    ),
)]
pub async fn verified_vendors(
    State(directory): State<Arc<VendorDirectory>>,
    query: Result<Query<PaginationQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = query?;
    let page = directory
        .list_verified_vendors(params.to_page_request()?)
        .await?;

    Ok(Json(PaginatedResponse::from_page(
        page,
        "Verified vendors retrieved successfully",
    )))
}

/// GET /api/v1/vendors/top_rated - Best overall rating first
#[utoipa::path(
    get,
    path = "/api/v1/vendors/top_rated",
    tag = "Vendors",
    responses(
        (status = 200, description = "Top rated vendors retrieved successfully", body = DataResponse<Vec<Vendor>>),
    ),
)]
pub async fn top_rated_vendors(
    State(directory): State<Arc<VendorDirectory>>,
) -> ApiResult<impl IntoResponse> {
    let vendors = directory.top_rated_vendors().await?;

    Ok(Json(DataResponse::new(
        vendors,
        "Top rated vendors retrieved successfully",
    )))
}

/// POST /api/v1/vendors/{id}/rate - Submit a rating
#[utoipa::path(
    post,
    path = "/api/v1/vendors/{id}/rate",
    tag = "Ratings",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    request_body = RateVendorRequest,
    responses(
        (status = 201, description = "Vendor rated successfully", body = DataResponse<Rating>),
        (status = 400, description = "Score out of range", body = ApiError),
        (status = 404, description = "Vendor not found", body = ApiError),
    ),
)]
pub async fn rate_vendor(
    State(directory): State<Arc<VendorDirectory>>,
    PathId(id): PathId<VendorId>,
    payload: Result<Json<RateVendorRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(req) = payload?;
    let (scores, comment) = req.into_parts()?;
    let rating = directory.rate_vendor(id, scores, comment).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(rating, "Vendor rated successfully")),
    ))
}

/// GET /api/v1/vendors/{id}/ratings - Rating summary and comments
#[utoipa::path(
    get,
    path = "/api/v1/vendors/{id}/ratings",
    tag = "Ratings",
    params(
        ("id" = Uuid, Path, description = "Vendor ID")
    ),
    responses(
        (status = 200, description = "Vendor ratings retrieved successfully", body = DataResponse<VendorRatings>),
        (status = 400, description = "Malformed vendor ID", body = ApiError),
    ),
)]
pub async fn vendor_ratings(
    State(directory): State<Arc<VendorDirectory>>,
    PathId(id): PathId<VendorId>,
) -> ApiResult<impl IntoResponse> {
    let ratings = directory.vendor_ratings(id).await?;

    Ok(Json(DataResponse::new(
        ratings,
        "Vendor ratings retrieved successfully",
    )))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create the vendor routes router.
pub fn create_router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", axum::routing::post(create_vendor))
        .route("/", axum::routing::get(list_vendors))
        .route("/nearby", axum::routing::get(nearby_vendors))
        .route("/verified", axum::routing::get(verified_vendors))
        .route("/top_rated", axum::routing::get(top_rated_vendors))
        .route("/:id", axum::routing::get(get_vendor))
        .route("/:id/rate", axum::routing::post(rate_vendor))
        .route("/:id/ratings", axum::routing::get(vendor_ratings))
}
