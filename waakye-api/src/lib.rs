//! Waakye API - REST Layer for the Vendor Directory
//!
//! Axum handlers, the Postgres store, the query orchestrator and the
//! ambient service stack (configuration, telemetry, OpenAPI).

pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod macros;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod types;
pub mod validation;

#[cfg(test)]
mod test_env;

// Re-export commonly used types
pub use config::{ApiConfig, CacheBackendKind, CacheSettings, StorageKind};
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::{VendorDirectory, VendorRead, TOP_RATED_LIMIT};
pub use state::AppState;
pub use types::*;
