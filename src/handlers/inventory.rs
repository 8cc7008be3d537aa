use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ServiceError;
use crate::services::inventory::{ExportRequest, ReceiveBatch};
use crate::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReceiveResponse {
    /// Created lot ids, in submission order
    pub lot_ids: Vec<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExportResponse {
    pub message: String,
}

/// Create the inventory router (write side of the ledger)
pub fn inventory_router() -> Router<AppState> {
    Router::new()
        .route("/receive", post(receive_stock))
        .route("/export", post(export_stock))
}

/// Receive a batch of part lots into the warehouse
#[utoipa::path(
    post,
    path = "/api/v1/inventory/receive",
    request_body = ReceiveBatch,
    responses(
        (status = 201, description = "Batch received, lots created", body = ReceiveResponse),
        (status = 400, description = "Invalid batch", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown or deleted part", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn receive_stock(
    State(state): State<AppState>,
    Json(batch): Json<ReceiveBatch>,
) -> Result<impl IntoResponse, ServiceError> {
    let lot_ids = state.inventory_service.receive(batch).await?;
    Ok((StatusCode::CREATED, Json(ReceiveResponse { lot_ids })))
}

/// Export stock from one or more lots, optionally fulfilling an order
#[utoipa::path(
    post,
    path = "/api/v1/inventory/export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Stock deducted", body = ExportResponse),
        (status = 400, description = "Invalid request", body = crate::errors::ErrorResponse),
        (status = 404, description = "Unknown lot or order", body = crate::errors::ErrorResponse),
        (status = 422, description = "Insufficient stock", body = crate::errors::ErrorResponse)
    ),
    tag = "inventory"
)]
pub async fn export_stock(
    State(state): State<AppState>,
    Json(request): Json<ExportRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    state.inventory_service.export(request).await?;
    Ok(Json(ExportResponse {
        message: "Stock exported".to_string(),
    }))
}
