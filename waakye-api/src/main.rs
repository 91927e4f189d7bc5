//! Waakye API Server Entry Point
//!
//! Bootstraps configuration, opens the store and the vendor cache, and
//! starts the Axum HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tracing::info_span;
use waakye_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AppState, CacheSettings, DbClient,
    DbConfig, StorageKind, VendorDirectory,
};
use waakye_storage::{InMemoryStore, RatingStore, VendorStore};

use waakye_api::telemetry::{init_tracing, TelemetryConfig};

type Stores = (Arc<dyn VendorStore>, Arc<dyn RatingStore>);

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::from_env();
    init_tracing(&telemetry_config)?;

    let api_config = ApiConfig::from_env();
    let (vendors, ratings) = open_stores(api_config.storage).await?;

    let cache = CacheSettings::from_env()
        .build(info_span!("vendor_cache"))
        .await?;

    let directory = VendorDirectory::new(vendors, ratings, cache, info_span!("directory"));
    let app: Router = create_api_router(AppState::new(directory), &api_config);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, storage = ?api_config.storage, "Starting Waakye API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    let server = axum::serve(listener, app);
    tokio::select! {
        result = server => {
            result.map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}

async fn open_stores(kind: StorageKind) -> ApiResult<Stores> {
    match kind {
        StorageKind::Postgres => {
            let db_config = DbConfig::from_env();
            let db = Arc::new(DbClient::from_config(&db_config, info_span!("db"))?);
            if db_config.migrate {
                db.ensure_schema().await?;
            }
            let vendors: Arc<dyn VendorStore> = db.clone();
            let ratings: Arc<dyn RatingStore> = db;
            Ok((vendors, ratings))
        }
        StorageKind::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            let store = Arc::new(InMemoryStore::new(info_span!("memory_store")));
            let vendors: Arc<dyn VendorStore> = store.clone();
            let ratings: Arc<dyn RatingStore> = store;
            Ok((vendors, ratings))
        }
    }
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("WAAKYE_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("WAAKYE_API_PORT").ok())
        .unwrap_or_else(|| "3000".to_string());
    let port = port_str.parse::<u16>().map_err(|_| {
        ApiError::invalid_input(format!("Invalid port value: {}", port_str))
    })?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>().map_err(|e| {
        ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e))
    })
}
