//! Common test utilities for tindung integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use chrono::NaiveDate;
use serde_json::{json, Value};

use tindung_core::FixedClock;
use tindung_service::{create_router, AppState, ServiceConfig};
use tindung_store::{MemoryStore, Store};

/// The date every harness treats as today.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap()
}

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// The store behind the server, for direct inspection.
    pub store: Arc<dyn Store>,
}

impl TestHarness {
    /// Create a harness over a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    /// Create a harness over the given store.
    pub fn with_store(store: Arc<dyn Store>) -> Self {
        Self::with_config(
            store,
            ServiceConfig {
                listen_addr: "127.0.0.1:0".into(),
                ..ServiceConfig::default()
            },
        )
    }

    /// Create a harness over the given store and configuration.
    pub fn with_config(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        let state =
            AppState::new(store.clone(), config).with_clock(Arc::new(FixedClock::new(today())));
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, store }
    }

    /// Create a credit loan and return its code.
    pub async fn create_credit_loan(&self, loan_date: &str, interest: i64) -> String {
        let response = self
            .server
            .post("/v1/credit-loans")
            .json(&json!({
                "borrower_name": "Nguyễn Văn An",
                "loan_date": loan_date,
                "principal": 20_000_000,
                "period_length_days": 30,
                "interest": interest
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let body: Value = response.json();
        body["data"]["code"].as_str().unwrap().to_string()
    }

    /// Create an installment loan and return its code.
    pub async fn create_installment_loan(&self, loan_date: &str, installment_count: i64) -> String {
        let response = self
            .server
            .post("/v1/installment-loans")
            .json(&json!({
                "borrower_name": "Trần Thị Bình",
                "loan_date": loan_date,
                "principal": 10_000_000,
                "period_length_days": 30,
                "installment_count": installment_count,
                "interest": 200_000,
                "status": "not-paid"
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let body: Value = response.json();
        body["data"]["code"].as_str().unwrap().to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
