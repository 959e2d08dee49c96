//! Payment-history handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use tindung_core::{
    ContractCode, HistoryId, HistoryPatch, HistoryRecord, NewHistoryRecord, ScheduleSummary,
};

use super::{ApiResponse, CountResponse, PageQuery};
use crate::error::ApiError;
use crate::state::AppState;

/// Count query parameters.
#[derive(Debug, Deserialize)]
pub struct CountHistoryQuery {
    /// Only count the records of this contract.
    pub contract_code: Option<ContractCode>,
}

fn not_found(id: HistoryId) -> ApiError {
    ApiError::NotFound(format!("payment history not found: {id}"))
}

/// `POST /v1/history`
pub async fn create_history(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<NewHistoryRecord>,
) -> Result<(StatusCode, Json<ApiResponse<HistoryRecord>>), ApiError> {
    let record = state.history().create(draft)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("payment history created", record)),
    ))
}

/// `GET /v1/history`
pub async fn list_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<HistoryRecord>>>, ApiError> {
    let limit = state.config.page_limit(query.limit);
    let records = state.history().list(query.skip, limit)?;
    Ok(Json(ApiResponse::ok(
        format!("{} payment history records", records.len()),
        records,
    )))
}

/// `GET /v1/history/count`
pub async fn count_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CountHistoryQuery>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let service = state.history();
    let count = match &query.contract_code {
        Some(code) => service.count_by_contract(code)?,
        None => service.count()?,
    };
    Ok(Json(ApiResponse::ok(
        "payment history count",
        CountResponse { count },
    )))
}

/// `GET /v1/history/contract/:code`
pub async fn list_contract_history(
    State(state): State<Arc<AppState>>,
    Path(code): Path<ContractCode>,
) -> Result<Json<ApiResponse<Vec<HistoryRecord>>>, ApiError> {
    let records = state.history().list_by_contract(&code)?;
    Ok(Json(ApiResponse::ok(
        format!("{} payment history records for {code}", records.len()),
        records,
    )))
}

/// `POST /v1/history/generate/:code`
pub async fn generate_schedule(
    State(state): State<Arc<AppState>>,
    Path(code): Path<ContractCode>,
) -> Result<Json<ApiResponse<ScheduleSummary>>, ApiError> {
    let summary = state.schedule().generate(&code)?;
    Ok(Json(ApiResponse::ok(summary.message.clone(), summary)))
}

/// `GET /v1/history/:id`
pub async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<HistoryId>,
) -> Result<Json<ApiResponse<HistoryRecord>>, ApiError> {
    let record = state.history().get(id)?.ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::ok("payment history found", record)))
}

/// `PUT /v1/history/:id`
pub async fn update_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<HistoryId>,
    Json(patch): Json<HistoryPatch>,
) -> Result<Json<ApiResponse<HistoryRecord>>, ApiError> {
    let record = state
        .history()
        .update(id, patch)?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(ApiResponse::ok("payment history updated", record)))
}

/// `DELETE /v1/history/:id`
pub async fn delete_history(
    State(state): State<Arc<AppState>>,
    Path(id): Path<HistoryId>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.history().delete(id)? {
        return Err(not_found(id));
    }
    Ok(Json(ApiResponse::ok(
        format!("payment history {id} deleted"),
        (),
    )))
}
