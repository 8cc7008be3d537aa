use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{
    part::{self, Entity as Part},
    part_lot::{self, Entity as PartLot},
    stock_record::{self, Entity as StockRecord},
};
use crate::errors::ServiceError;

/// Durable storage and lookup for lots and their paired stock records.
///
/// Every method is generic over the connection so the inventory service can
/// compose several calls into one transaction; nothing here opens its own.
pub struct LotStore;

impl LotStore {
    /// Looks up a part that is present and not soft-deleted.
    pub async fn get_active_part<C: ConnectionTrait>(
        conn: &C,
        part_id: i64,
    ) -> Result<part::Model, ServiceError> {
        Part::find_by_id(part_id)
            .one(conn)
            .await
            .map_err(ServiceError::db_error)?
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| ServiceError::NotFound(format!("Part {} not found", part_id)))
    }

    /// Creates a lot and its initial stock record as one unit of work in the
    /// caller's connection. The stock record starts at the full received
    /// quantity.
    pub async fn create_lot<C: ConnectionTrait>(
        conn: &C,
        part_id: i64,
        quantity: i32,
        unit_cost: i64,
        location: &str,
        received_at: DateTime<Utc>,
    ) -> Result<(part_lot::Model, stock_record::Model), ServiceError> {
        let part = Self::get_active_part(conn, part_id).await?;

        let lot = part_lot::ActiveModel {
            part_id: Set(part.part_id),
            received_at: Set(received_at),
            unit_cost: Set(unit_cost),
            received_quantity: Set(quantity),
            ..Default::default()
        }
        .insert(conn)
        .await
        .map_err(ServiceError::db_error)?;

        let stock = stock_record::ActiveModel {
            lot_id: Set(lot.lot_id),
            remaining_quantity: Set(quantity),
            location: Set(location.to_string()),
        }
        .insert(conn)
        .await
        .map_err(ServiceError::db_error)?;

        Ok((lot, stock))
    }

    pub async fn get_stock<C: ConnectionTrait>(
        conn: &C,
        lot_id: i64,
    ) -> Result<stock_record::Model, ServiceError> {
        StockRecord::find_by_id(lot_id)
            .one(conn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", lot_id)))
    }

    /// Lists a part's lots with their stock records, oldest receipt first.
    ///
    /// The `received_at ASC, lot_id ASC` ordering is the FIFO basis the
    /// allocation reader builds on; the lot id tiebreak keeps reads
    /// deterministic when two lots share a receipt timestamp.
    pub async fn list_lots_for_part<C: ConnectionTrait>(
        conn: &C,
        part_id: i64,
        only_with_stock: bool,
    ) -> Result<Vec<(part_lot::Model, stock_record::Model)>, ServiceError> {
        let mut query = PartLot::find()
            .find_also_related(StockRecord)
            .filter(part_lot::Column::PartId.eq(part_id))
            .order_by_asc(part_lot::Column::ReceivedAt)
            .order_by_asc(part_lot::Column::LotId);

        if only_with_stock {
            query = query.filter(stock_record::Column::RemainingQuantity.gt(0));
        }

        let rows = query.all(conn).await.map_err(ServiceError::db_error)?;

        rows.into_iter()
            .map(|(lot, stock)| {
                let lot_id = lot.lot_id;
                stock.map(|s| (lot, s)).ok_or_else(|| {
                    // Stock records are created atomically with their lot
                    ServiceError::InternalError(format!("Lot {} has no stock record", lot_id))
                })
            })
            .collect()
    }
}
