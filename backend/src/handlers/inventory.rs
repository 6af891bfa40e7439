//! HTTP handlers for inventory ledger endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::inventory::{
    InboundInput, InventoryItemDetail, InventoryItemDetails, InventoryService, ItemFilter,
    MovementDetails, MovementFilter, OutboundInput, TransferInput,
};
use crate::AppState;

/// Response for a recorded movement
#[derive(Debug, serde::Serialize)]
pub struct MovementResponse {
    pub message: String,
    pub movement_id: Uuid,
}

/// Response for a completed transfer
#[derive(Debug, serde::Serialize)]
pub struct TransferResponse {
    pub message: String,
    pub outbound_movement_id: Uuid,
    pub inbound_movement_id: Uuid,
}

/// List ledger rows with optional filters
pub async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> AppResult<Json<Vec<InventoryItemDetails>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_items(filter).await?;
    Ok(Json(items))
}

/// Get a single ledger row with its batches
pub async fn get_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<InventoryItemDetail>> {
    let service = InventoryService::new(state.db);
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Record an inbound movement
pub async fn record_inbound(
    State(state): State<AppState>,
    Json(input): Json<InboundInput>,
) -> AppResult<(StatusCode, Json<MovementResponse>)> {
    let service = InventoryService::new(state.db);
    let movement_id = service.record_inbound(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MovementResponse {
            message: "Inbound movement recorded".to_string(),
            movement_id,
        }),
    ))
}

/// Record an outbound movement
pub async fn record_outbound(
    State(state): State<AppState>,
    Json(input): Json<OutboundInput>,
) -> AppResult<(StatusCode, Json<MovementResponse>)> {
    let service = InventoryService::new(state.db);
    let movement_id = service.record_outbound(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(MovementResponse {
            message: "Outbound movement recorded".to_string(),
            movement_id,
        }),
    ))
}

/// Transfer stock between two warehouses
pub async fn transfer_stock(
    State(state): State<AppState>,
    Json(input): Json<TransferInput>,
) -> AppResult<(StatusCode, Json<TransferResponse>)> {
    let service = InventoryService::new(state.db);
    let (outbound_movement_id, inbound_movement_id) = service.transfer(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(TransferResponse {
            message: "Transfer completed".to_string(),
            outbound_movement_id,
            inbound_movement_id,
        }),
    ))
}

/// List stock movements, newest first
pub async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementFilter>,
) -> AppResult<Json<Vec<MovementDetails>>> {
    let service = InventoryService::new(state.db);
    let movements = service.list_movements(filter).await?;
    Ok(Json(movements))
}
