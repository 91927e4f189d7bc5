//! API Configuration Module
//!
//! CORS, request timeout, storage selection and vendor cache settings.
//! Configuration is loaded from environment variables with defaults
//! suited to local development.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::Span;
use waakye_storage::{
    CacheBackend, CacheConfig, CacheError, LmdbCacheBackend, MemoryCacheBackend,
    RedisCacheBackend, VendorCache, DEFAULT_VENDOR_TTL,
};

use crate::error::{ApiError, ApiResult};

fn env_flag(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_lowercase().as_str(), "true" | "1"))
        .unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// Which store backs the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Postgres,
    /// Process-local store. Data is lost on restart.
    Memory,
}

/// API configuration for CORS, timeouts and storage selection.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Whether to allow credentials in CORS requests.
    pub cors_allow_credentials: bool,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Upper bound on handling time for a single request.
    pub request_timeout: Duration,

    pub storage: StorageKind,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(), // Empty = allow all
            cors_allow_credentials: false,
            cors_max_age_secs: 86400, // 24 hours
            request_timeout: Duration::from_secs(30),
            storage: StorageKind::Postgres,
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `WAAKYE_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `WAAKYE_CORS_ALLOW_CREDENTIALS`: "true" or "false" (default: false)
    /// - `WAAKYE_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `WAAKYE_REQUEST_TIMEOUT_SECS`: Per-request timeout (default: 30)
    /// - `WAAKYE_STORAGE`: "postgres" or "memory" (default: postgres)
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("WAAKYE_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let storage = match std::env::var("WAAKYE_STORAGE")
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Ok("memory") => StorageKind::Memory,
            _ => StorageKind::Postgres,
        };

        Self {
            cors_origins,
            cors_allow_credentials: env_flag("WAAKYE_CORS_ALLOW_CREDENTIALS", false),
            cors_max_age_secs: env_parse("WAAKYE_CORS_MAX_AGE_SECS", 86400),
            request_timeout: Duration::from_secs(env_parse("WAAKYE_REQUEST_TIMEOUT_SECS", 30)),
            storage,
        }
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }
}

// ============================================================================
// CACHE CONFIGURATION
// ============================================================================

/// Which backend serves the vendor cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackendKind {
    /// Caching disabled; every read goes to the store.
    None,
    Memory,
    Lmdb,
    Redis,
}

/// Vendor cache settings.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub backend: CacheBackendKind,
    pub ttl: Duration,
    pub lmdb_path: PathBuf,
    pub lmdb_size_mb: usize,
    pub redis_url: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            ttl: DEFAULT_VENDOR_TTL,
            lmdb_path: PathBuf::from("./data/vendor-cache"),
            lmdb_size_mb: 64,
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
        }
    }
}

impl CacheSettings {
    /// Load from `WAAKYE_CACHE_*` and `WAAKYE_REDIS_URL`.
    ///
    /// An unrecognised backend name falls back to the in-memory cache.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let backend = match std::env::var("WAAKYE_CACHE_BACKEND")
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Ok("none") | Ok("off") => CacheBackendKind::None,
            Ok("lmdb") => CacheBackendKind::Lmdb,
            Ok("redis") => CacheBackendKind::Redis,
            _ => CacheBackendKind::Memory,
        };

        Self {
            backend,
            ttl: Duration::from_secs(env_parse(
                "WAAKYE_CACHE_TTL_SECS",
                defaults.ttl.as_secs(),
            )),
            lmdb_path: std::env::var("WAAKYE_CACHE_LMDB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.lmdb_path),
            lmdb_size_mb: env_parse("WAAKYE_CACHE_LMDB_SIZE_MB", defaults.lmdb_size_mb),
            redis_url: std::env::var("WAAKYE_REDIS_URL").unwrap_or(defaults.redis_url),
        }
    }

    /// Open the configured backend. `None` when caching is disabled.
    pub async fn build(&self, span: Span) -> ApiResult<Option<VendorCache>> {
        let backend: Arc<dyn CacheBackend> = match self.backend {
            CacheBackendKind::None => return Ok(None),
            CacheBackendKind::Memory => Arc::new(MemoryCacheBackend::new()),
            CacheBackendKind::Lmdb => Arc::new(
                LmdbCacheBackend::new(&self.lmdb_path, self.lmdb_size_mb).map_err(cache_unavailable)?,
            ),
            CacheBackendKind::Redis => Arc::new(
                RedisCacheBackend::connect(&self.redis_url)
                    .await
                    .map_err(cache_unavailable)?,
            ),
        };

        tracing::info!(
            parent: &span,
            backend = backend.name(),
            ttl_secs = self.ttl.as_secs(),
            "vendor cache ready"
        );
        let config = CacheConfig::new().with_ttl(self.ttl);
        Ok(Some(VendorCache::new(backend, config, span)))
    }
}

fn cache_unavailable(err: CacheError) -> ApiError {
    tracing::error!(error = %err, "failed to open vendor cache");
    ApiError::service_unavailable(format!("Vendor cache unavailable: {}", err))
}
