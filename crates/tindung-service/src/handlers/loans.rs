//! Contract handlers, shared by both loan products.
//!
//! Every handler is generic over [`Loan`]; the router instantiates them once
//! for `CreditLoan` under `/v1/credit-loans` and once for `InstallmentLoan`
//! under `/v1/installment-loans`.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use tindung_core::{ContractCode, Loan, LoanKind, PaymentStatus};

use super::{ApiResponse, CountResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListLoansQuery {
    /// Records to skip (default: 0).
    #[serde(default)]
    pub skip: usize,
    /// Maximum records to return.
    pub limit: Option<usize>,
    /// Only return contracts with this status. Pagination does not apply.
    pub status: Option<PaymentStatus>,
}

/// Count query parameters.
#[derive(Debug, Deserialize)]
pub struct CountLoansQuery {
    /// Only count contracts with this status.
    pub status: Option<PaymentStatus>,
}

fn label<L: Loan>() -> &'static str {
    match L::KIND {
        LoanKind::Credit => "credit loan",
        LoanKind::Installment => "installment loan",
    }
}

fn not_found<L: Loan>(code: &ContractCode) -> ApiError {
    ApiError::NotFound(format!("{} not found: {code}", label::<L>()))
}

/// `POST /v1/{product}`
pub async fn create<L: Loan>(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<L::Draft>,
) -> Result<(StatusCode, Json<ApiResponse<L>>), ApiError> {
    let loan = state.contracts::<L>().create(draft)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(format!("{} created", label::<L>()), loan)),
    ))
}

/// `GET /v1/{product}`
pub async fn list<L: Loan>(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListLoansQuery>,
) -> Result<Json<ApiResponse<Vec<L>>>, ApiError> {
    let service = state.contracts::<L>();
    let loans = match query.status {
        Some(status) => service.list_by_status(status)?,
        None => service.list(query.skip, state.config.page_limit(query.limit))?,
    };
    Ok(Json(ApiResponse::ok(
        format!("{} {}s", loans.len(), label::<L>()),
        loans,
    )))
}

/// `GET /v1/{product}/count`
pub async fn count<L: Loan>(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CountLoansQuery>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let count = state.contracts::<L>().count(query.status)?;
    Ok(Json(ApiResponse::ok(
        format!("{} count", label::<L>()),
        CountResponse { count },
    )))
}

/// `GET /v1/{product}/:code`
pub async fn get<L: Loan>(
    State(state): State<Arc<AppState>>,
    Path(code): Path<ContractCode>,
) -> Result<Json<ApiResponse<L>>, ApiError> {
    let loan = state
        .contracts::<L>()
        .get(&code)?
        .ok_or_else(|| not_found::<L>(&code))?;
    Ok(Json(ApiResponse::ok(format!("{} found", label::<L>()), loan)))
}

/// `PUT /v1/{product}/:code` merges only the fields present in the body.
pub async fn update<L: Loan>(
    State(state): State<Arc<AppState>>,
    Path(code): Path<ContractCode>,
    Json(patch): Json<L::Patch>,
) -> Result<Json<ApiResponse<L>>, ApiError> {
    let loan = state
        .contracts::<L>()
        .update(&code, patch)?
        .ok_or_else(|| not_found::<L>(&code))?;
    Ok(Json(ApiResponse::ok(
        format!("{} updated", label::<L>()),
        loan,
    )))
}

/// `DELETE /v1/{product}/:code`
pub async fn delete<L: Loan>(
    State(state): State<Arc<AppState>>,
    Path(code): Path<ContractCode>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.contracts::<L>().delete(&code)? {
        return Err(not_found::<L>(&code));
    }
    Ok(Json(ApiResponse::ok(
        format!("{} {code} deleted", label::<L>()),
        (),
    )))
}
