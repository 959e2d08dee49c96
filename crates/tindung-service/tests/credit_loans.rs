//! Credit loan (tín chấp) integration tests.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use serde_json::{json, Value};

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_assigns_code_and_not_paid_status() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/credit-loans")
        .json(&json!({
            "borrower_name": "Nguyễn Văn An",
            "loan_date": "2024-01-01",
            "principal": 20_000_000,
            "period_length_days": 30,
            "interest": 500_000
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["code"], "TC001");
    assert_eq!(body["data"]["status"], "not-paid");
    assert_eq!(body["data"]["principal"], 20_000_000);
}

#[tokio::test]
async fn codes_are_sequential() {
    let harness = TestHarness::new();

    let first = harness.create_credit_loan("2024-01-01", 500_000).await;
    let second = harness.create_credit_loan("2024-01-02", 500_000).await;

    assert_eq!(first, "TC001");
    assert_eq!(second, "TC002");
}

#[tokio::test]
async fn create_with_non_positive_principal_fails() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .post("/v1/credit-loans")
        .json(&json!({
            "borrower_name": "Nguyễn Văn An",
            "loan_date": "2024-01-01",
            "principal": 0,
            "period_length_days": 30,
            "interest": 500_000
        }))
        .await;

    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "bad_request");
}

// ============================================================================
// Read
// ============================================================================

#[tokio::test]
async fn get_unknown_code_is_not_found() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/credit-loans/TC404").await;

    response.assert_status_not_found();
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn installment_code_is_not_found_in_credit_table() {
    let harness = TestHarness::new();
    let code = harness.create_installment_loan("2024-02-01", 12).await;

    let response = harness
        .server
        .get(&format!("/v1/credit-loans/{code}"))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn list_paginates_and_filters_by_status() {
    let harness = TestHarness::new();
    for _ in 0..3 {
        harness.create_credit_loan("2024-01-01", 500_000).await;
    }
    harness
        .server
        .put("/v1/credit-loans/TC002")
        .json(&json!({"status": "settled"}))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .get("/v1/credit-loans")
        .add_query_param("skip", 1)
        .add_query_param("limit", 1)
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["code"], "TC002");

    let response = harness
        .server
        .get("/v1/credit-loans")
        .add_query_param("status", "not-paid")
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let response = harness
        .server
        .get("/v1/credit-loans/count")
        .add_query_param("status", "settled")
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["count"], 1);

    let response = harness.server.get("/v1/credit-loans/count").await;
    let body: Value = response.json();
    assert_eq!(body["data"]["count"], 3);
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn update_merges_only_supplied_fields() {
    let harness = TestHarness::new();
    let code = harness.create_credit_loan("2024-01-01", 500_000).await;

    let response = harness
        .server
        .put(&format!("/v1/credit-loans/{code}"))
        .json(&json!({"interest": 750_000}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["interest"], 750_000);
    assert_eq!(body["data"]["borrower_name"], "Nguyễn Văn An");
    assert_eq!(body["data"]["loan_date"], "2024-01-01");
    assert_eq!(body["data"]["status"], "not-paid");
}

#[tokio::test]
async fn update_accepts_vietnamese_status_label() {
    let harness = TestHarness::new();
    let code = harness.create_credit_loan("2024-01-01", 500_000).await;

    let response = harness
        .server
        .put(&format!("/v1/credit-loans/{code}"))
        .json(&json!({"status": "Đã tất toán"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["status"], "settled");
}

#[tokio::test]
async fn update_with_null_required_field_is_rejected() {
    let harness = TestHarness::new();
    let code = harness.create_credit_loan("2024-01-01", 500_000).await;

    let response = harness
        .server
        .put(&format!("/v1/credit-loans/{code}"))
        .json(&json!({"borrower_name": null}))
        .await;
    response.assert_status_bad_request();

    let response = harness
        .server
        .get(&format!("/v1/credit-loans/{code}"))
        .await;
    let body: Value = response.json();
    assert_eq!(body["data"]["borrower_name"], "Nguyễn Văn An");
}

#[tokio::test]
async fn update_with_out_of_range_values_is_rejected() {
    let harness = TestHarness::new();
    let code = harness.create_credit_loan("2024-01-01", 500_000).await;

    let response = harness
        .server
        .put(&format!("/v1/credit-loans/{code}"))
        .json(&json!({
            "principal": -5,
            "period_length_days": 0,
            "interest": -1,
            "borrower_name": ""
        }))
        .await;
    response.assert_status_bad_request();

    let body: Value = harness
        .server
        .get(&format!("/v1/credit-loans/{code}"))
        .await
        .json();
    assert_eq!(body["data"]["principal"], 20_000_000);
    assert_eq!(body["data"]["period_length_days"], 30);
    assert_eq!(body["data"]["interest"], 500_000);

    harness
        .server
        .post(&format!("/v1/history/generate/{code}"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn update_unknown_code_is_not_found() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .put("/v1/credit-loans/TC404")
        .json(&json!({"interest": 1}))
        .await;

    response.assert_status_not_found();
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_then_delete_again() {
    let harness = TestHarness::new();
    let code = harness.create_credit_loan("2024-01-01", 500_000).await;

    harness
        .server
        .delete(&format!("/v1/credit-loans/{code}"))
        .await
        .assert_status_ok();

    harness
        .server
        .delete(&format!("/v1/credit-loans/{code}"))
        .await
        .assert_status_not_found();

    harness
        .server
        .get(&format!("/v1/credit-loans/{code}"))
        .await
        .assert_status_not_found();
}
