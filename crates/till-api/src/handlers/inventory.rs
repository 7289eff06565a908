//! Inventory ledger endpoints.
//!
//! The ledger is append-only: entries can be created and read, never
//! edited or deleted.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use till_commerce::error::CommerceError;
use till_commerce::ids::{LogEntryId, ProductId};
use till_commerce::inventory::{ChangeType, InventoryLogEntry, StockAdjustment};

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub product_id: ProductId,
    pub change_type: ChangeType,
    pub quantity: i64,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Apply a stock delta and append the matching audit row, atomically.
pub async fn adjust(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(request): Json<AdjustStockRequest>,
) -> Result<(StatusCode, Json<InventoryLogEntry>), ApiError> {
    let entry = state
        .store
        .adjust_stock(&StockAdjustment {
            product_id: request.product_id,
            change_type: request.change_type,
            quantity: request.quantity,
            remarks: request.remarks,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

#[derive(Debug, Deserialize)]
pub struct RecordChangeRequest {
    pub product_id: ProductId,
    pub change_type: ChangeType,
    pub quantity_changed: i64,
    #[serde(default)]
    pub remarks: Option<String>,
}

/// Append an audit row without touching stock, for changes applied outside
/// this system.
pub async fn record(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Json(request): Json<RecordChangeRequest>,
) -> Result<(StatusCode, Json<InventoryLogEntry>), ApiError> {
    let entry = state
        .store
        .record_inventory_change(
            request.product_id,
            request.change_type,
            request.quantity_changed,
            request.remarks.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn list_logs(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
) -> Result<Json<Vec<InventoryLogEntry>>, ApiError> {
    Ok(Json(state.store.inventory_logs().await?))
}

pub async fn get_log(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(log_id): Path<i64>,
) -> Result<Json<InventoryLogEntry>, ApiError> {
    let log_id = LogEntryId::new(log_id);
    let entry = state
        .store
        .inventory_log(log_id)
        .await?
        .ok_or(CommerceError::LogEntryNotFound(log_id))?;
    Ok(Json(entry))
}
