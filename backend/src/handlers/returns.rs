//! HTTP handlers for the returns tracker

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::InventoryReturn;
use crate::services::returns::{
    CreateReturnInput, ReturnDetails, ReturnFilter, ReturnsService, UpdateReturnInput,
};
use crate::AppState;

/// List returns with optional filters
pub async fn list_returns(
    State(state): State<AppState>,
    Query(filter): Query<ReturnFilter>,
) -> AppResult<Json<Vec<ReturnDetails>>> {
    let service = ReturnsService::new(state.db);
    let returns = service.list_returns(filter).await?;
    Ok(Json(returns))
}

/// Create a return
pub async fn create_return(
    State(state): State<AppState>,
    Json(input): Json<CreateReturnInput>,
) -> AppResult<(StatusCode, Json<InventoryReturn>)> {
    let service = ReturnsService::new(state.db);
    let record = service.create_return(input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update a return
pub async fn update_return(
    State(state): State<AppState>,
    Path(return_id): Path<Uuid>,
    Json(input): Json<UpdateReturnInput>,
) -> AppResult<Json<InventoryReturn>> {
    let service = ReturnsService::new(state.db);
    let record = service.update_return(return_id, input).await?;
    Ok(Json(record))
}
