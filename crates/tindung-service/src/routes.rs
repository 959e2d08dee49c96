//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use tindung_core::{CreditLoan, InstallmentLoan, Loan};

use crate::handlers::{health, history, loans};
use crate::state::AppState;

/// Maximum concurrent requests for `/v1` endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// - `GET /health` - Health check
///
/// ## Contracts (`credit-loans` and `installment-loans`)
/// - `POST /v1/{product}` - Create
/// - `GET /v1/{product}?skip&limit&status` - List, or filter by status
/// - `GET /v1/{product}/count?status` - Count
/// - `GET|PUT|DELETE /v1/{product}/:code` - Get, merge-update, delete
///
/// ## Payment history
/// - `POST /v1/history` - Record one entry
/// - `GET /v1/history?skip&limit` - List
/// - `GET /v1/history/count?contract_code` - Count
/// - `GET /v1/history/contract/:code` - Entries of one contract
/// - `POST /v1/history/generate/:code` - Run the schedule generator
/// - `GET|PUT|DELETE /v1/history/:id` - Get, merge-update, delete
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors = build_cors_layer(&state.config.cors_origins);
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    let state = Arc::new(state);

    let history_routes = Router::new()
        .route(
            "/",
            post(history::create_history).get(history::list_history),
        )
        .route("/count", get(history::count_history))
        .route("/contract/:code", get(history::list_contract_history))
        .route("/generate/:code", post(history::generate_schedule))
        .route(
            "/:id",
            get(history::get_history)
                .put(history::update_history)
                .delete(history::delete_history),
        );

    let api_routes = Router::new()
        .nest("/credit-loans", loan_routes::<CreditLoan>())
        .nest("/installment-loans", loan_routes::<InstallmentLoan>())
        .nest("/history", history_routes)
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        .route("/health", get(health::health))
        .nest("/v1", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// CRUD routes for one loan product.
fn loan_routes<L: Loan>() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(loans::create::<L>).get(loans::list::<L>))
        .route("/count", get(loans::count::<L>))
        .route(
            "/:code",
            get(loans::get::<L>)
                .put(loans::update::<L>)
                .delete(loans::delete::<L>),
        )
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        cors.allow_origin(origins)
    }
}
