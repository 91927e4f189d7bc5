//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres, and the Postgres
//! implementation of the vendor and rating stores.
//!
//! Rating aggregates are never stored: every vendor read joins a lateral
//! `AVG`/`COUNT` over `vendor_ratings`, so the figures are always live.

use std::future::Future;
use std::time::{Duration, Instant};

use ::async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolConfig, RecyclingMethod, Runtime};
use tokio_postgres::types::FromSql;
use tokio_postgres::{NoTls, Row};
use tracing::Span;
use uuid::Uuid;
use waakye_core::{
    Coordinates, EntityIdType, EntityType, Location, LocationId, NewRating, NewVendor,
    PageRequest, Rating, RatingAggregate, RatingComment, RatingId, RatingScores, SearchRadius,
    StorageError, Timestamp, Vendor, VendorId, VendorRatings, WaakyeError, WaakyeResult,
    EARTH_RADIUS_KM,
};
use waakye_storage::{RatingHistory, RatingStore, VendorStore};

use crate::error::{ApiError, ApiResult};
use crate::telemetry::METRICS;

const SCHEMA_SQL: &str = include_str!("../migrations/0001_init.sql");

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// How long a caller waits for a pooled connection
    pub timeout: Duration,
    /// Apply the bundled schema at startup
    pub migrate: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "waakye".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
            migrate: false,
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("WAAKYE_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("WAAKYE_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("WAAKYE_DB_NAME").unwrap_or_else(|_| "waakye".to_string()),
            user: std::env::var("WAAKYE_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("WAAKYE_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("WAAKYE_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("WAAKYE_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            migrate: std::env::var("WAAKYE_DB_MIGRATE")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(false),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> ApiResult<Pool> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_cfg = PoolConfig::new(self.max_size);
        pool_cfg.timeouts.wait = Some(self.timeout);
        cfg.pool = Some(pool_cfg);

        let pool = cfg
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ApiError::database_error(format!("Failed to create pool: {}", e)))?;

        Ok(pool)
    }
}

// ============================================================================
// SQL
// ============================================================================

macro_rules! vendor_columns {
    () => {
        "v.id, v.name, v.description, v.operating_hours, v.image_url, v.phone_number, \
         v.is_verified, v.created_at, v.updated_at, \
         l.id AS location_id, l.street_address, l.city, l.region, l.landmark, \
         l.latitude, l.longitude, l.created_at AS location_created_at, \
         r.hygiene_avg, r.value_avg, r.taste_avg, r.service_avg, r.total_ratings"
    };
}

macro_rules! vendor_from {
    () => {
        " FROM waakye_vendors v \
         JOIN locations l ON l.id = v.location_id \
         LEFT JOIN LATERAL ( \
             SELECT COALESCE(AVG(vr.hygiene_rating), 0)::float8 AS hygiene_avg, \
                    COALESCE(AVG(vr.value_rating), 0)::float8 AS value_avg, \
                    COALESCE(AVG(vr.taste_rating), 0)::float8 AS taste_avg, \
                    COALESCE(AVG(vr.service_rating), 0)::float8 AS service_avg, \
                    COUNT(*) AS total_ratings \
             FROM vendor_ratings vr WHERE vr.vendor_id = v.id \
         ) r ON TRUE"
    };
}

macro_rules! vendor_select {
    () => {
        concat!("SELECT ", vendor_columns!(), vendor_from!())
    };
}

/// Haversine in SQL. `$1` latitude, `$2` longitude, `$3` Earth radius.
macro_rules! distance_expr {
    () => {
        "$3::float8 * 2 * ASIN(LEAST(1.0, SQRT( \
             POWER(SIN(RADIANS(l.latitude - $1::float8) / 2), 2) \
             + COS(RADIANS($1::float8)) * COS(RADIANS(l.latitude)) \
               * POWER(SIN(RADIANS(l.longitude - $2::float8) / 2), 2) \
         ))) AS distance_km"
    };
}

const GET_VENDOR_SQL: &str = concat!(vendor_select!(), " WHERE v.id = $1");

const LIST_VENDORS_SQL: &str = concat!(
    vendor_select!(),
    " ORDER BY v.created_at DESC, v.id DESC LIMIT $1 OFFSET $2"
);

const LIST_VERIFIED_SQL: &str = concat!(
    vendor_select!(),
    " WHERE v.is_verified ORDER BY v.created_at DESC, v.id DESC LIMIT $1 OFFSET $2"
);

const NEARBY_SQL: &str = concat!(
    "SELECT * FROM (SELECT ",
    vendor_columns!(),
    ", ",
    distance_expr!(),
    vendor_from!(),
    ") nearby WHERE nearby.distance_km <= $4 ORDER BY nearby.distance_km ASC, nearby.id ASC"
);

const TOP_RATED_SQL: &str = concat!(
    vendor_select!(),
    " WHERE r.total_ratings > 0 \
     ORDER BY (r.hygiene_avg + r.value_avg + r.taste_avg + r.service_avg) / 4 DESC, v.id ASC \
     LIMIT $1"
);

const RATING_HISTORY_SQL: &str = "SELECT id, vendor_id, hygiene_rating, value_rating, \
     taste_rating, service_rating, comment, created_at \
     FROM vendor_ratings WHERE vendor_id = $1 ORDER BY created_at DESC, id DESC";

const RATING_AGGREGATE_SQL: &str = "SELECT \
     COALESCE(AVG(hygiene_rating), 0)::float8 AS hygiene_avg, \
     COALESCE(AVG(value_rating), 0)::float8 AS value_avg, \
     COALESCE(AVG(taste_rating), 0)::float8 AS taste_avg, \
     COALESCE(AVG(service_rating), 0)::float8 AS service_avg, \
     COUNT(*) AS total_ratings \
     FROM vendor_ratings WHERE vendor_id = $1";

const RATING_COMMENTS_SQL: &str = "SELECT comment, created_at FROM vendor_ratings \
     WHERE vendor_id = $1 AND comment IS NOT NULL AND btrim(comment) <> '' \
     ORDER BY created_at DESC, id DESC";

// ============================================================================
// ROW MAPPING
// ============================================================================

fn column<'a, T: FromSql<'a>>(row: &'a Row, entity: EntityType, name: &str) -> WaakyeResult<T> {
    row.try_get(name).map_err(|e| {
        StorageError::CorruptRow {
            entity_type: entity,
            reason: format!("column {}: {}", name, e),
        }
        .into()
    })
}

fn count_from(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn aggregate_from_row(row: &Row, entity: EntityType) -> WaakyeResult<RatingAggregate> {
    Ok(RatingAggregate::from_averages(
        column(row, entity, "hygiene_avg")?,
        column(row, entity, "value_avg")?,
        column(row, entity, "taste_avg")?,
        column(row, entity, "service_avg")?,
        count_from(column(row, entity, "total_ratings")?),
    ))
}

fn vendor_from_row(row: &Row) -> WaakyeResult<Vendor> {
    let e = EntityType::Vendor;
    let id: Uuid = column(row, e, "id")?;
    let location_id: Uuid = column(row, e, "location_id")?;

    Ok(Vendor {
        id: VendorId::new(id),
        name: column(row, e, "name")?,
        description: column(row, e, "description")?,
        operating_hours: column(row, e, "operating_hours")?,
        image_url: column(row, e, "image_url")?,
        phone_number: column(row, e, "phone_number")?,
        is_verified: column(row, e, "is_verified")?,
        location: Location {
            id: LocationId::new(location_id),
            street_address: column(row, e, "street_address")?,
            city: column(row, e, "city")?,
            region: column(row, e, "region")?,
            landmark: column(row, e, "landmark")?,
            latitude: column(row, e, "latitude")?,
            longitude: column(row, e, "longitude")?,
            created_at: column(row, e, "location_created_at")?,
        },
        created_at: column(row, e, "created_at")?,
        updated_at: column(row, e, "updated_at")?,
        rating_summary: aggregate_from_row(row, e)?,
        distance_km: None,
        ratings: None,
    })
}

fn score_column(row: &Row, name: &str) -> WaakyeResult<i64> {
    column::<i16>(row, EntityType::Rating, name).map(i64::from)
}

fn rating_from_row(row: &Row) -> WaakyeResult<Rating> {
    let e = EntityType::Rating;
    let scores = RatingScores::new(
        score_column(row, "hygiene_rating")?,
        score_column(row, "value_rating")?,
        score_column(row, "taste_rating")?,
        score_column(row, "service_rating")?,
    )
    .map_err(|err| StorageError::CorruptRow {
        entity_type: e,
        reason: err.to_string(),
    })?;
    let id: Uuid = column(row, e, "id")?;
    let vendor_id: Uuid = column(row, e, "vendor_id")?;

    Ok(Rating {
        id: RatingId::new(id),
        vendor_id: VendorId::new(vendor_id),
        scores,
        comment: column(row, e, "comment")?,
        created_at: column(row, e, "created_at")?,
    })
}

fn query_failed(operation: &str, err: tokio_postgres::Error) -> WaakyeError {
    StorageError::QueryFailed {
        operation: operation.to_string(),
        reason: err.to_string(),
    }
    .into()
}

fn insert_failed(entity_type: EntityType, err: tokio_postgres::Error) -> WaakyeError {
    StorageError::InsertFailed {
        entity_type,
        reason: err.to_string(),
    }
    .into()
}

fn transaction_failed(err: tokio_postgres::Error) -> WaakyeError {
    StorageError::TransactionFailed {
        reason: err.to_string(),
    }
    .into()
}

fn sql_window(page: PageRequest) -> (i64, i64) {
    let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

// ============================================================================
// DATABASE CLIENT WRAPPER
// ============================================================================

/// Database client that wraps a connection pool and implements the
/// directory's store traits.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
    span: Span,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool, span: Span) -> Self {
        Self { pool, span }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig, span: Span) -> ApiResult<Self> {
        let pool = config.create_pool()?;
        Ok(Self::new(pool, span))
    }

    /// Get a connection from the pool.
    async fn get_conn(&self) -> WaakyeResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| {
            StorageError::ConnectionFailed {
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// Apply the bundled schema. Every statement is `IF NOT EXISTS`.
    pub async fn ensure_schema(&self) -> ApiResult<()> {
        let conn = self.pool.get().await?;
        conn.batch_execute(SCHEMA_SQL).await?;
        tracing::info!(parent: &self.span, "database schema ensured");
        Ok(())
    }

    /// Run one store operation, recording its latency and outcome.
    async fn timed<T, F>(&self, operation: &'static str, entity: EntityType, fut: F) -> WaakyeResult<T>
    where
        F: Future<Output = WaakyeResult<T>>,
    {
        let start = Instant::now();
        let result = fut.await;
        let elapsed = start.elapsed().as_secs_f64();

        if let Ok(metrics) = METRICS.as_ref() {
            metrics.record_db_operation(operation, entity.as_str(), result.is_ok(), elapsed);
        }
        if let Err(e) = &result {
            tracing::error!(parent: &self.span, operation, error = %e, "database operation failed");
        }
        result
    }

    async fn count(&self, operation: &'static str, sql: &str) -> WaakyeResult<u64> {
        self.timed(operation, EntityType::Vendor, async {
            let conn = self.get_conn().await?;
            let row = conn
                .query_one(sql, &[])
                .await
                .map_err(|e| query_failed(operation, e))?;
            let total: i64 = column(&row, EntityType::Vendor, "total")?;
            Ok(count_from(total))
        })
        .await
    }

    async fn page_of(
        &self,
        operation: &'static str,
        sql: &str,
        page: PageRequest,
    ) -> WaakyeResult<Vec<Vendor>> {
        self.timed(operation, EntityType::Vendor, async {
            let conn = self.get_conn().await?;
            let (limit, offset) = sql_window(page);
            let rows = conn
                .query(sql, &[&limit, &offset])
                .await
                .map_err(|e| query_failed(operation, e))?;
            rows.iter().map(vendor_from_row).collect()
        })
        .await
    }

    async fn rating_history(
        &self,
        conn: &deadpool_postgres::Object,
        id: VendorId,
    ) -> WaakyeResult<Vec<Rating>> {
        let rows = conn
            .query(RATING_HISTORY_SQL, &[&id.as_uuid()])
            .await
            .map_err(|e| query_failed("rating_history", e))?;
        rows.iter().map(rating_from_row).collect()
    }
}

#[async_trait]
impl VendorStore for DbClient {
    async fn create_vendor(&self, vendor: &NewVendor) -> WaakyeResult<Vendor> {
        self.timed("create", EntityType::Vendor, async {
            let mut conn = self.get_conn().await?;
            let tx = conn.transaction().await.map_err(transaction_failed)?;

            let loc = &vendor.location;
            let location_row = tx
                .query_one(
                    "INSERT INTO locations \
                     (street_address, city, region, landmark, latitude, longitude) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, created_at",
                    &[
                        &loc.street_address,
                        &loc.city,
                        &loc.region,
                        &loc.landmark,
                        &loc.coordinates.latitude(),
                        &loc.coordinates.longitude(),
                    ],
                )
                .await
                .map_err(|e| insert_failed(EntityType::Location, e))?;
            let location_id: Uuid = column(&location_row, EntityType::Location, "id")?;
            let location_created_at: Timestamp =
                column(&location_row, EntityType::Location, "created_at")?;

            let vendor_row = tx
                .query_one(
                    "INSERT INTO waakye_vendors \
                     (name, description, operating_hours, image_url, phone_number, location_id) \
                     VALUES ($1, $2, $3, $4, $5, $6) \
                     RETURNING id, is_verified, created_at, updated_at",
                    &[
                        &vendor.name,
                        &vendor.description,
                        &vendor.operating_hours,
                        &vendor.image_url,
                        &vendor.phone_number,
                        &location_id,
                    ],
                )
                .await
                .map_err(|e| insert_failed(EntityType::Vendor, e))?;

            tx.commit().await.map_err(transaction_failed)?;

            let e = EntityType::Vendor;
            let id: Uuid = column(&vendor_row, e, "id")?;
            let created = Vendor {
                id: VendorId::new(id),
                name: vendor.name.clone(),
                description: vendor.description.clone(),
                operating_hours: vendor.operating_hours.clone(),
                image_url: vendor.image_url.clone(),
                phone_number: vendor.phone_number.clone(),
                is_verified: column(&vendor_row, e, "is_verified")?,
                location: Location {
                    id: LocationId::new(location_id),
                    street_address: loc.street_address.clone(),
                    city: loc.city.clone(),
                    region: loc.region.clone(),
                    landmark: loc.landmark.clone(),
                    latitude: loc.coordinates.latitude(),
                    longitude: loc.coordinates.longitude(),
                    created_at: location_created_at,
                },
                created_at: column(&vendor_row, e, "created_at")?,
                updated_at: column(&vendor_row, e, "updated_at")?,
                rating_summary: RatingAggregate::empty(),
                distance_km: None,
                ratings: None,
            };
            tracing::debug!(parent: &self.span, vendor_id = %created.id, "vendor stored");
            Ok(created)
        })
        .await
    }

    async fn get_vendor(
        &self,
        id: VendorId,
        history: RatingHistory,
    ) -> WaakyeResult<Option<Vendor>> {
        self.timed("get", EntityType::Vendor, async {
            let conn = self.get_conn().await?;
            let row = conn
                .query_opt(GET_VENDOR_SQL, &[&id.as_uuid()])
                .await
                .map_err(|e| query_failed("get_vendor", e))?;

            let Some(row) = row else {
                return Ok(None);
            };
            let mut vendor = vendor_from_row(&row)?;
            if history == RatingHistory::Include {
                vendor.ratings = Some(self.rating_history(&conn, id).await?);
            }
            Ok(Some(vendor))
        })
        .await
    }

    async fn list_vendors(&self, page: PageRequest) -> WaakyeResult<Vec<Vendor>> {
        self.page_of("list_vendors", LIST_VENDORS_SQL, page).await
    }

    async fn count_vendors(&self) -> WaakyeResult<u64> {
        self.count("count_vendors", "SELECT COUNT(*) AS total FROM waakye_vendors")
            .await
    }

    async fn list_verified_vendors(&self, page: PageRequest) -> WaakyeResult<Vec<Vendor>> {
        self.page_of("list_verified_vendors", LIST_VERIFIED_SQL, page)
            .await
    }

    async fn count_verified_vendors(&self) -> WaakyeResult<u64> {
        self.count(
            "count_verified_vendors",
            "SELECT COUNT(*) AS total FROM waakye_vendors WHERE is_verified",
        )
        .await
    }

    async fn find_nearby(
        &self,
        center: Coordinates,
        radius: SearchRadius,
    ) -> WaakyeResult<Vec<Vendor>> {
        self.timed("find_nearby", EntityType::Vendor, async {
            let conn = self.get_conn().await?;
            let rows = conn
                .query(
                    NEARBY_SQL,
                    &[
                        &center.latitude(),
                        &center.longitude(),
                        &EARTH_RADIUS_KM,
                        &radius.km(),
                    ],
                )
                .await
                .map_err(|e| query_failed("find_nearby", e))?;

            rows.iter()
                .map(|row| {
                    let mut vendor = vendor_from_row(row)?;
                    vendor.distance_km = Some(column(row, EntityType::Vendor, "distance_km")?);
                    Ok(vendor)
                })
                .collect()
        })
        .await
    }

    async fn top_rated(&self, limit: usize) -> WaakyeResult<Vec<Vendor>> {
        self.timed("top_rated", EntityType::Vendor, async {
            let conn = self.get_conn().await?;
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            let rows = conn
                .query(TOP_RATED_SQL, &[&limit])
                .await
                .map_err(|e| query_failed("top_rated", e))?;
            rows.iter().map(vendor_from_row).collect()
        })
        .await
    }

    async fn health_check(&self) -> WaakyeResult<()> {
        let conn = self.get_conn().await?;

        // Simple query to verify connectivity
        conn.query_one("SELECT 1", &[])
            .await
            .map_err(|e| query_failed("health_check", e))?;

        Ok(())
    }
}

#[async_trait]
impl RatingStore for DbClient {
    async fn submit_rating(&self, vendor_id: VendorId, rating: &NewRating) -> WaakyeResult<Rating> {
        self.timed("create", EntityType::Rating, async {
            let conn = self.get_conn().await?;
            let s = &rating.scores;
            let row = conn
                .query_one(
                    "INSERT INTO vendor_ratings \
                     (vendor_id, hygiene_rating, value_rating, taste_rating, service_rating, comment) \
                     VALUES ($1, $2, $3, $4, $5, $6) RETURNING id, created_at",
                    &[
                        &vendor_id.as_uuid(),
                        &i16::from(s.hygiene_rating.value()),
                        &i16::from(s.value_rating.value()),
                        &i16::from(s.taste_rating.value()),
                        &i16::from(s.service_rating.value()),
                        &rating.comment,
                    ],
                )
                .await
                .map_err(|e| insert_failed(EntityType::Rating, e))?;

            let id: Uuid = column(&row, EntityType::Rating, "id")?;
            let stored = Rating {
                id: RatingId::new(id),
                vendor_id,
                scores: *s,
                comment: rating.comment.clone(),
                created_at: column(&row, EntityType::Rating, "created_at")?,
            };
            tracing::debug!(parent: &self.span, %vendor_id, rating_id = %stored.id, "rating stored");
            Ok(stored)
        })
        .await
    }

    async fn rating_summary(&self, vendor_id: VendorId) -> WaakyeResult<VendorRatings> {
        self.timed("summary", EntityType::Rating, async {
            let conn = self.get_conn().await?;
            let aggregate_row = conn
                .query_one(RATING_AGGREGATE_SQL, &[&vendor_id.as_uuid()])
                .await
                .map_err(|e| query_failed("rating_summary", e))?;
            let summary = aggregate_from_row(&aggregate_row, EntityType::Rating)?;

            let comment_rows = conn
                .query(RATING_COMMENTS_SQL, &[&vendor_id.as_uuid()])
                .await
                .map_err(|e| query_failed("rating_comments", e))?;
            let comments = comment_rows
                .iter()
                .map(|row| {
                    Ok(RatingComment {
                        comment: column(row, EntityType::Rating, "comment")?,
                        created_at: column(row, EntityType::Rating, "created_at")?,
                    })
                })
                .collect::<WaakyeResult<Vec<_>>>()?;

            Ok(VendorRatings { summary, comments })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_config_defaults() {
        let config = DbConfig::default();
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "waakye");
        assert!(!config.migrate);
    }

    #[test]
    fn test_sql_window_matches_page() -> Result<(), waakye_core::ValidationError> {
        let page = PageRequest::new(3, 20)?;
        assert_eq!(sql_window(page), (20, 40));
        Ok(())
    }

    #[test]
    fn test_nearby_sql_filters_inclusively_and_orders_by_distance() {
        assert!(NEARBY_SQL.contains("distance_km <= $4"));
        assert!(NEARBY_SQL.ends_with("ORDER BY nearby.distance_km ASC, nearby.id ASC"));
    }

    #[test]
    fn test_top_rated_sql_excludes_unrated() {
        assert!(TOP_RATED_SQL.contains("r.total_ratings > 0"));
        assert!(TOP_RATED_SQL.contains("DESC, v.id ASC"));
    }

    #[test]
    fn test_schema_is_idempotent() {
        for line in SCHEMA_SQL.lines().filter(|l| l.starts_with("CREATE")) {
            assert!(line.contains("IF NOT EXISTS"), "not idempotent: {}", line);
        }
    }

    #[test]
    fn test_count_from_clamps_negative() {
        assert_eq!(count_from(-1), 0);
        assert_eq!(count_from(7), 7);
    }

    #[tokio::test]
    async fn test_unreachable_database_is_connection_failure() -> ApiResult<()> {
        let config = DbConfig {
            host: "127.0.0.1".to_string(),
            port: 1,
            timeout: Duration::from_millis(200),
            ..DbConfig::default()
        };
        let client = DbClient::from_config(&config, Span::none())?;
        match client.health_check().await {
            Err(WaakyeError::Storage(StorageError::ConnectionFailed { .. })) => Ok(()),
            other => panic!("expected ConnectionFailed, got {:?}", other),
        }
    }
}
