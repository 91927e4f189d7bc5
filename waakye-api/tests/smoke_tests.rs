//! End-to-end smoke tests against a live Postgres.
//!
//! Run with `--features db-tests` and the `WAAKYE_DB_*` variables pointing
//! at a disposable database.

#![cfg(feature = "db-tests")]

use std::sync::Arc;

use waakye_api::{ApiResult, DbClient, DbConfig, VendorDirectory};
use waakye_core::{PageRequest, SearchRadius};
use waakye_test_utils::assertions::*;
use waakye_test_utils::fixtures::*;

async fn test_directory() -> ApiResult<(Arc<DbClient>, VendorDirectory)> {
    let config = DbConfig::from_env();
    let db = Arc::new(DbClient::from_config(&config, tracing::Span::none())?);
    db.ensure_schema().await?;
    let directory = VendorDirectory::new(db.clone(), db.clone(), None, tracing::Span::none());
    Ok((db, directory))
}

#[tokio::test]
async fn smoke_test_create_rate_and_read() -> ApiResult<()> {
    let (_db, directory) = test_directory().await?;

    let vendor = directory.create_vendor(accra_vendor()).await?;
    assert!(!vendor.is_verified);
    assert_eq!(vendor.rating_summary.total_ratings, 0);

    directory
        .rate_vendor(vendor.id, scores(FIRST_RATING), Some("Generous wele".to_string()))
        .await?;
    directory
        .rate_vendor(vendor.id, scores(SECOND_RATING), None)
        .await?;

    let read = directory.get_vendor(vendor.id).await?;
    assert!(!read.from_cache);
    assert_aggregate(&read.vendor.rating_summary, [3.0, 4.0, 3.5, 4.5], 3.75, 2);
    assert_eq!(read.vendor.ratings.as_ref().map(Vec::len), Some(2));

    let summary = directory.vendor_ratings(vendor.id).await?;
    assert_eq!(summary.comments.len(), 1);
    assert_eq!(summary.comments[0].comment, "Generous wele");
    Ok(())
}

#[tokio::test]
async fn smoke_test_nearby_and_listing() -> ApiResult<()> {
    let (_db, directory) = test_directory().await?;

    let near = directory.create_vendor(vendor_at("Makola Waakye", (5.6040, -0.1875))).await?;
    let far = directory.create_vendor(kumasi_vendor()).await?;

    let nearby = directory
        .nearby_vendors(coordinates(ACCRA), SearchRadius::default())
        .await?;
    assert_nearest_first(&nearby, 5.0);
    assert!(nearby.iter().any(|v| v.id == near.id));
    assert!(nearby.iter().all(|v| v.id != far.id));

    let page = directory.list_vendors(PageRequest::new(1, 50)?).await?;
    assert_newest_first(&page.items);
    assert!(page.total_items >= 2);
    Ok(())
}

#[tokio::test]
async fn smoke_test_top_rated_is_ordered() -> ApiResult<()> {
    let (_db, directory) = test_directory().await?;

    let vendor = directory.create_vendor(vendor_at("Top Stall", ACCRA)).await?;
    directory
        .rate_vendor(vendor.id, scores([5, 5, 5, 5]), None)
        .await?;

    let top = directory.top_rated_vendors().await?;
    assert!(top.len() <= 5);
    assert_best_rated_first(&top);
    assert!(top.iter().all(|v| v.rating_summary.has_ratings()));
    Ok(())
}
