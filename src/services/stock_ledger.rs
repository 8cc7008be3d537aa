use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::entities::movement_entry::{self, Direction, Entity as MovementEntry};
use crate::errors::ServiceError;

/// Append-only movement log. Pure storage: business validation (quantity
/// signs, stock checks) is the inventory service's job.
pub struct StockLedger;

impl StockLedger {
    pub async fn append_entry<C: ConnectionTrait>(
        conn: &C,
        lot_id: i64,
        direction: Direction,
        quantity: i32,
        note: Option<String>,
        occurred_at: DateTime<Utc>,
    ) -> Result<movement_entry::Model, ServiceError> {
        movement_entry::ActiveModel {
            lot_id: Set(lot_id),
            occurred_at: Set(occurred_at),
            direction: Set(direction.as_str().to_string()),
            quantity: Set(quantity),
            note: Set(note),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(ServiceError::db_error)
    }

    /// Audit trail for one lot, oldest movement first. Entries created in
    /// the same transaction share `occurred_at`, so the entry id keeps
    /// submission order as the secondary sort.
    pub async fn entries_for_lot<C: ConnectionTrait>(
        conn: &C,
        lot_id: i64,
    ) -> Result<Vec<movement_entry::Model>, ServiceError> {
        MovementEntry::find()
            .filter(movement_entry::Column::LotId.eq(lot_id))
            .order_by_asc(movement_entry::Column::OccurredAt)
            .order_by_asc(movement_entry::Column::EntryId)
            .all(conn)
            .await
            .map_err(ServiceError::db_error)
    }
}
