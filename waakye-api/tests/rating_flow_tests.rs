//! End-to-end rating flow: register, rate twice, read back through the
//! cache and the summary endpoint.

mod support;

use axum::http::StatusCode;
use serde_json::Value;
use support::{f64_at, TestApp};
use waakye_api::VendorDirectory;
use waakye_test_utils::assertions::*;
use waakye_test_utils::fixtures::*;
use waakye_test_utils::{EntityIdType, RatingAggregate, VendorId};

fn aggregate_at(body: &Value, pointer: &str) -> RatingAggregate {
    let node = body
        .pointer(pointer)
        .cloned()
        .unwrap_or_else(|| panic!("no aggregate at {}", pointer));
    serde_json::from_value(node).expect("aggregate deserializes")
}

#[tokio::test]
async fn test_accra_vendor_rating_scenario() {
    let app = TestApp::new();
    let id = app.create(&accra_vendor()).await;
    let vendor_uri = format!("/api/v1/vendors/{}", id);

    // First read populates the cache, second is served from it
    let (status, body) = app.get(&vendor_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vendor retrieved successfully");
    let (_, body) = app.get(&vendor_uri).await;
    assert_eq!(body["message"], "Vendor retrieved successfully from cache");

    let (status, _) = app
        .post(
            &format!("{}/rate", vendor_uri),
            rate_body(FIRST_RATING, Some("Generous wele")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .post(
            &format!("{}/rate", vendor_uri),
            rate_body(SECOND_RATING, Some("Shito could be hotter")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Rating evicted the cached copy, so the aggregate is fresh
    let (status, body) = app.get(&vendor_uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vendor retrieved successfully");
    assert_aggregate(
        &aggregate_at(&body, "/data/rating_summary"),
        [3.0, 4.0, 3.5, 4.5],
        3.75,
        2,
    );
    let history = body["data"]["ratings"].as_array().cloned().unwrap_or_default();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["comment"], "Shito could be hotter");

    let (status, body) = app.get(&format!("{}/ratings", vendor_uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Vendor ratings retrieved successfully");
    assert_aggregate(&aggregate_at(&body, "/data"), [3.0, 4.0, 3.5, 4.5], 3.75, 2);
    let comments = body["data"]["comments"].as_array().cloned().unwrap_or_default();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["comment"], "Shito could be hotter");
    assert_eq!(comments[1]["comment"], "Generous wele");

    let (_, body) = app.get("/api/v1/vendors/top_rated").await;
    assert_eq!(body["data"][0]["id"], id.as_str());
    assert_close(f64_at(&body, "/data/0/rating_summary/overall_rating"), 3.75);

    // Proximity results carry the same live aggregate
    let (status, body) = app
        .get(&format!(
            "/api/v1/vendors/nearby?lat={}&lng={}&radius_km=1",
            ACCRA.0, ACCRA.1
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["data"][0]["id"], id.as_str());
    assert!(f64_at(&body, "/data/0/distance_km") < 1e-6);
    let summary = aggregate_at(&body, "/data/0/rating_summary");
    assert_close(summary.value_rating, 4.0);
    assert_aggregate(&summary, [3.0, 4.0, 3.5, 4.5], 3.75, 2);
}

#[tokio::test]
async fn test_blank_comment_is_not_listed() {
    let app = TestApp::new();
    let id = app.create(&accra_vendor()).await;

    app.post(
        &format!("/api/v1/vendors/{}/rate", id),
        rate_body(FIRST_RATING, Some("   ")),
    )
    .await;

    let (_, body) = app.get(&format!("/api/v1/vendors/{}/ratings", id)).await;
    assert_eq!(body["data"]["total_ratings"], 1);
    assert_eq!(body["data"]["comments"], serde_json::json!([]));
}

#[tokio::test]
async fn test_reads_without_cache_never_report_cache_hits() {
    let app = TestApp::without_cache();
    let id = app.create(&accra_vendor()).await;
    let uri = format!("/api/v1/vendors/{}", id);

    for _ in 0..2 {
        let (status, body) = app.get(&uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Vendor retrieved successfully");
    }
}

#[tokio::test]
async fn test_directory_rate_then_summary() -> Result<(), Box<dyn std::error::Error>> {
    let store = memory_store();
    let directory =
        VendorDirectory::new(store.clone(), store.clone(), Some(memory_cache()), tracing::Span::none());

    let vendor = directory.create_vendor(accra_vendor()).await?;
    directory
        .rate_vendor(vendor.id, scores(FIRST_RATING), None)
        .await?;
    directory
        .rate_vendor(vendor.id, scores(SECOND_RATING), None)
        .await?;

    let summary = directory.vendor_ratings(vendor.id).await?;
    assert_aggregate(&summary.summary, [3.0, 4.0, 3.5, 4.5], 3.75, 2);

    let missing = directory
        .rate_vendor(VendorId::now_v7(), scores(FIRST_RATING), None)
        .await;
    assert_vendor_not_found(&missing);
    assert_eq!(store.rating_count(), 2);
    Ok(())
}
