use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::entities::movement_entry;
use crate::errors::ServiceError;
use crate::services::allocation::{LotCandidate, LotWithStock, WarehouseInfo};
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AllocationQuery {
    /// Part the stock is needed for
    pub part_id: i64,
    /// Units needed
    pub quantity: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PartLotsQuery {
    /// Restrict to lots that still hold stock
    #[serde(default)]
    pub only_with_stock: bool,
}

/// One audit-trail row of a lot
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MovementView {
    pub entry_id: i64,
    pub lot_id: i64,
    pub occurred_at: DateTime<Utc>,
    pub direction: String,
    pub quantity: i32,
    pub note: Option<String>,
}

impl From<movement_entry::Model> for MovementView {
    fn from(entry: movement_entry::Model) -> Self {
        Self {
            entry_id: entry.entry_id,
            lot_id: entry.lot_id,
            occurred_at: entry.occurred_at,
            direction: entry.direction,
            quantity: entry.quantity,
            note: entry.note,
        }
    }
}

/// Create the warehouse router (read side of the ledger)
pub fn warehouse_router() -> Router<AppState> {
    Router::new()
        .route("/allocation", get(suggest_allocation))
        .route("/info", post(warehouse_info))
        .route("/lots/:lot_id/movements", get(lot_movements))
        .route("/parts/:part_id/lots", get(part_lots))
}

/// Suggest which lots can cover a stock need, oldest receipt first
#[utoipa::path(
    get,
    path = "/api/v1/warehouse/allocation",
    params(AllocationQuery),
    responses(
        (status = 200, description = "FIFO candidate lots", body = [LotCandidate]),
        (status = 400, description = "Invalid quantity", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown part", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouse"
)]
pub async fn suggest_allocation(
    State(state): State<AppState>,
    Query(query): Query<AllocationQuery>,
) -> Result<Json<Vec<LotCandidate>>, ServiceError> {
    let candidates = state
        .allocation_reader
        .suggest_allocation(query.part_id, query.quantity)
        .await?;
    Ok(Json(candidates))
}

/// Warehouse details for a list of already-chosen lot ids
#[utoipa::path(
    post,
    path = "/api/v1/warehouse/info",
    request_body = Vec<i64>,
    responses(
        (status = 200, description = "Lot, part and supplier details", body = [WarehouseInfo]),
        (status = 404, description = "One or more lots missing", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouse"
)]
pub async fn warehouse_info(
    State(state): State<AppState>,
    Json(lot_ids): Json<Vec<i64>>,
) -> Result<Json<Vec<WarehouseInfo>>, ServiceError> {
    let info = state.allocation_reader.warehouse_info(&lot_ids).await?;
    Ok(Json(info))
}

/// Movement history (audit trail) of one lot
#[utoipa::path(
    get,
    path = "/api/v1/warehouse/lots/{lot_id}/movements",
    params(("lot_id" = i64, Path, description = "Lot id")),
    responses(
        (status = 200, description = "Movements, oldest first", body = [MovementView]),
        (status = 404, description = "Unknown lot", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouse"
)]
pub async fn lot_movements(
    State(state): State<AppState>,
    Path(lot_id): Path<i64>,
) -> Result<Json<Vec<MovementView>>, ServiceError> {
    let entries = state.allocation_reader.movement_history(lot_id).await?;
    Ok(Json(entries.into_iter().map(MovementView::from).collect()))
}

/// Lots of a part with their stock counters, oldest receipt first
#[utoipa::path(
    get,
    path = "/api/v1/warehouse/parts/{part_id}/lots",
    params(
        ("part_id" = i64, Path, description = "Part id"),
        PartLotsQuery
    ),
    responses(
        (status = 200, description = "Lots with stock counters", body = [LotWithStock]),
        (status = 404, description = "Unknown part", body = crate::errors::ErrorResponse)
    ),
    tag = "warehouse"
)]
pub async fn part_lots(
    State(state): State<AppState>,
    Path(part_id): Path<i64>,
    Query(query): Query<PartLotsQuery>,
) -> Result<Json<Vec<LotWithStock>>, ServiceError> {
    let lots = state
        .allocation_reader
        .lots_for_part(part_id, query.only_with_stock)
        .await?;
    Ok(Json(lots))
}
