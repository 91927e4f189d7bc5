//! Router harness shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use tracing::Span;
use waakye_api::{create_api_router, ApiConfig, AppState, VendorDirectory};
use waakye_test_utils::fixtures::{create_vendor_body, memory_cache, memory_store};
use waakye_test_utils::{InMemoryStore, NewVendor, VendorCache};

/// Full API router over an in-memory store.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    /// Store plus a memory-backed vendor cache.
    pub fn new() -> Self {
        Self::build(Some(memory_cache()))
    }

    pub fn without_cache() -> Self {
        Self::build(None)
    }

    fn build(cache: Option<VendorCache>) -> Self {
        let store = memory_store();
        let directory = VendorDirectory::new(store.clone(), store.clone(), cache, Span::none());
        let router = create_api_router(AppState::new(directory), &ApiConfig::default());
        Self { router, store }
    }

    /// Send a request and decode the JSON response body.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("request builds");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response is JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    /// Register `vendor` through the API and return its id.
    pub async fn create(&self, vendor: &NewVendor) -> String {
        let (status, body) = self
            .post("/api/v1/vendors", create_vendor_body(vendor))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["data"]["id"]
            .as_str()
            .expect("created vendor has an id")
            .to_string()
    }
}

pub fn f64_at(value: &Value, pointer: &str) -> f64 {
    value
        .pointer(pointer)
        .and_then(Value::as_f64)
        .unwrap_or_else(|| panic!("no number at {} in {}", pointer, value))
}
