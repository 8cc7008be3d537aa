use std::sync::Arc;

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionError,
    TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{
    movement_entry::Direction,
    repair_order::{self, Entity as RepairOrder},
    stock_record::{self, Entity as StockRecord},
};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::services::{lot_store::LotStore, stock_ledger::StockLedger};

/// One line of a receive batch: a quantity of a part bought at a price,
/// put away at a location.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReceiveItem {
    pub part_id: i64,
    pub quantity: i32,
    /// Purchase price per unit, integer currency units
    pub unit_cost: i64,
    pub location: String,
}

/// A batch of received stock, processed as one atomic unit: N lots,
/// N stock records and N receive movements, or nothing at all.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ReceiveBatch {
    #[validate(length(max = 100))]
    pub supplier_ref: Option<String>,
    #[validate(length(max = 500))]
    pub note: Option<String>,
    #[validate(length(min = 1))]
    pub items: Vec<ReceiveItem>,
}

impl ReceiveBatch {
    fn receipt_note(&self) -> Option<String> {
        match (&self.supplier_ref, &self.note) {
            (Some(supplier), Some(note)) => Some(format!("Received from {}: {}", supplier, note)),
            (Some(supplier), None) => Some(format!("Received from {}", supplier)),
            (None, note) => note.clone(),
        }
    }
}

/// One deduction of an export request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExportItem {
    pub lot_id: i64,
    pub quantity: i32,
}

/// A stock export, processed all-or-nothing across every listed lot.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ExportRequest {
    /// Repair order fulfilled by this export; flipped to exported in the
    /// same transaction as the deductions.
    pub order_id: Option<i64>,
    #[validate(length(min = 1))]
    pub items: Vec<ExportItem>,
}

/// Service for the parts-lot ledger. The single writer of lots, stock
/// records and movement entries; readers go through `AllocationReader`.
#[derive(Clone)]
pub struct InventoryService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl InventoryService {
    /// Creates a new inventory service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Receives a batch of stock: one lot + stock record + receive movement
    /// per item, created in submission order inside one transaction.
    /// Returns the created lot ids in the same order.
    #[instrument(skip(self, batch), fields(items = batch.items.len()))]
    pub async fn receive(&self, batch: ReceiveBatch) -> Result<Vec<i64>, ServiceError> {
        validate_receive(&batch)?;

        let db = self.db_pool.as_ref();
        let note = batch.receipt_note();
        let items = batch.items.clone();

        let lot_ids = db
            .transaction::<_, Vec<i64>, ServiceError>(move |txn| {
                Box::pin(async move {
                    let received_at = Utc::now();
                    let mut lot_ids = Vec::with_capacity(items.len());

                    for item in &items {
                        let (lot, _stock) = LotStore::create_lot(
                            txn,
                            item.part_id,
                            item.quantity,
                            item.unit_cost,
                            &item.location,
                            received_at,
                        )
                        .await?;

                        StockLedger::append_entry(
                            txn,
                            lot.lot_id,
                            Direction::Receive,
                            item.quantity,
                            note.clone(),
                            received_at,
                        )
                        .await?;

                        lot_ids.push(lot.lot_id);
                    }

                    Ok(lot_ids)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(lots = lot_ids.len(), "Received part lots");

        let event = Event::LotsReceived {
            lot_ids: lot_ids.clone(),
            supplier_ref: batch.supplier_ref.clone(),
        };
        if let Err(e) = self.event_sender.send(event).await {
            // The batch is committed; a dead event channel must not
            // make the caller believe the receive failed.
            warn!("Failed to send lot receipt event: {}", e);
        }

        Ok(lot_ids)
    }

    /// Exports stock against one or more lots. Deductions are applied in
    /// submission order inside one transaction; the first lot without
    /// enough stock aborts the whole request, including items already
    /// processed. When `order_id` is set, the order is marked exported in
    /// the same transaction.
    #[instrument(skip(self, request), fields(order_id = ?request.order_id, items = request.items.len()))]
    pub async fn export(&self, request: ExportRequest) -> Result<(), ServiceError> {
        validate_export(&request)?;

        let db = self.db_pool.as_ref();
        let order_id = request.order_id;
        let items = request.items.clone();
        let exported_lot_ids: Vec<i64> = items.iter().map(|i| i.lot_id).collect();

        db.transaction::<_, (), ServiceError>(move |txn| {
            Box::pin(async move {
                let occurred_at = Utc::now();

                for item in &items {
                    // Conditional decrement: the row only changes when enough
                    // stock remains, so two writers racing on the same lot can
                    // never jointly drive it negative.
                    let res = StockRecord::update_many()
                        .col_expr(
                            stock_record::Column::RemainingQuantity,
                            Expr::col(stock_record::Column::RemainingQuantity).sub(item.quantity),
                        )
                        .filter(stock_record::Column::LotId.eq(item.lot_id))
                        .filter(stock_record::Column::RemainingQuantity.gte(item.quantity))
                        .exec(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    if res.rows_affected == 0 {
                        // Either the lot does not exist or it cannot cover the
                        // request; one re-read distinguishes the two.
                        let stock = LotStore::get_stock(txn, item.lot_id).await?;
                        warn!(
                            lot_id = item.lot_id,
                            requested = item.quantity,
                            available = stock.remaining_quantity,
                            "Export rejected: insufficient stock"
                        );
                        return Err(ServiceError::InsufficientStock {
                            lot_id: item.lot_id,
                        });
                    }

                    let note = match order_id {
                        Some(order_id) => format!(
                            "Exported {} units from lot {} for order {}",
                            item.quantity, item.lot_id, order_id
                        ),
                        None => {
                            format!("Exported {} units from lot {}", item.quantity, item.lot_id)
                        }
                    };

                    StockLedger::append_entry(
                        txn,
                        item.lot_id,
                        Direction::Export,
                        item.quantity,
                        Some(note),
                        occurred_at,
                    )
                    .await?;
                }

                if let Some(order_id) = order_id {
                    let order = RepairOrder::find_by_id(order_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Order {} not found", order_id))
                        })?;

                    let mut order: repair_order::ActiveModel = order.into();
                    order.is_exported = Set(true);
                    order.update(txn).await.map_err(ServiceError::db_error)?;
                }

                Ok(())
            })
        })
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
            TransactionError::Transaction(service_err) => service_err,
        })?;

        info!(lots = exported_lot_ids.len(), "Exported stock");

        let event = Event::StockExported {
            order_id,
            lot_ids: exported_lot_ids,
        };
        if let Err(e) = self.event_sender.send(event).await {
            warn!("Failed to send stock export event: {}", e);
        }

        Ok(())
    }
}

/// Full validation of a receive batch, before any storage access.
fn validate_receive(batch: &ReceiveBatch) -> Result<(), ServiceError> {
    batch.validate()?;

    for (idx, item) in batch.items.iter().enumerate() {
        if item.quantity <= 0 {
            return Err(ServiceError::InvalidInput(format!(
                "Receive item {} (part {}): quantity must be positive",
                idx + 1,
                item.part_id
            )));
        }
        if item.unit_cost <= 0 {
            return Err(ServiceError::InvalidInput(format!(
                "Receive item {} (part {}): unit cost must be positive",
                idx + 1,
                item.part_id
            )));
        }
        if item.location.trim().is_empty() {
            return Err(ServiceError::InvalidInput(format!(
                "Receive item {} (part {}): location must not be empty",
                idx + 1,
                item.part_id
            )));
        }
    }

    Ok(())
}

/// Full validation of an export request, before any storage access.
fn validate_export(request: &ExportRequest) -> Result<(), ServiceError> {
    request.validate()?;

    for (idx, item) in request.items.iter().enumerate() {
        if item.quantity <= 0 {
            return Err(ServiceError::InvalidInput(format!(
                "Export item {} (lot {}): quantity must be positive",
                idx + 1,
                item.lot_id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn batch_with(items: Vec<ReceiveItem>) -> ReceiveBatch {
        ReceiveBatch {
            supplier_ref: Some("ACME".to_string()),
            note: None,
            items,
        }
    }

    #[test]
    fn receive_rejects_empty_batch() {
        let batch = batch_with(vec![]);
        assert_matches!(
            validate_receive(&batch),
            Err(ServiceError::ValidationError(_))
        );
    }

    #[test]
    fn receive_rejects_non_positive_quantity() {
        let batch = batch_with(vec![ReceiveItem {
            part_id: 7,
            quantity: 0,
            unit_cost: 1000,
            location: "A-1".to_string(),
        }]);
        let err = validate_receive(&batch).unwrap_err();
        assert_matches!(err, ServiceError::InvalidInput(msg) if msg.contains("part 7"));
    }

    #[test]
    fn receive_rejects_non_positive_cost() {
        let batch = batch_with(vec![ReceiveItem {
            part_id: 7,
            quantity: 5,
            unit_cost: 0,
            location: "A-1".to_string(),
        }]);
        assert_matches!(validate_receive(&batch), Err(ServiceError::InvalidInput(_)));
    }

    #[test]
    fn export_rejects_non_positive_quantity() {
        let request = ExportRequest {
            order_id: None,
            items: vec![ExportItem {
                lot_id: 3,
                quantity: -1,
            }],
        };
        let err = validate_export(&request).unwrap_err();
        assert_matches!(err, ServiceError::InvalidInput(msg) if msg.contains("lot 3"));
    }

    #[test]
    fn receipt_note_combines_supplier_and_note() {
        let batch = ReceiveBatch {
            supplier_ref: Some("ACME".to_string()),
            note: Some("restock".to_string()),
            items: vec![],
        };
        assert_eq!(
            batch.receipt_note().as_deref(),
            Some("Received from ACME: restock")
        );
    }
}
