use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::db::DbPool;
use crate::entities::{
    movement_entry,
    part::{self, Entity as Part},
    part_lot::{self, Entity as PartLot},
    stock_record::Entity as StockRecord,
    supplier::{self, Entity as Supplier},
};
use crate::errors::ServiceError;
use crate::services::{lot_store::LotStore, stock_ledger::StockLedger};

/// One candidate lot for covering a stock need. The reader never pre-splits
/// quantities across lots; the caller decides the exact draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LotCandidate {
    pub lot_id: i64,
    pub available_quantity: i32,
    pub unit_cost: i64,
    pub location: String,
    pub received_at: DateTime<Utc>,
}

/// Lot + part + supplier details for a lot the caller already picked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WarehouseInfo {
    pub lot_id: i64,
    pub part_id: i64,
    pub part_name: String,
    pub unit: String,
    pub available_quantity: i32,
    pub unit_cost: i64,
    pub location: String,
    pub received_at: DateTime<Utc>,
    pub supplier_name: Option<String>,
}

/// A lot with its live stock counter, as listed per part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LotWithStock {
    pub lot_id: i64,
    pub part_id: i64,
    pub received_at: DateTime<Utc>,
    pub unit_cost: i64,
    pub received_quantity: i32,
    pub remaining_quantity: i32,
    pub location: String,
}

/// Read-only queries over the ledger: FIFO allocation candidates, warehouse
/// detail joins and the per-lot audit trail. Never mutates state.
#[derive(Clone)]
pub struct AllocationReader {
    db_pool: Arc<DbPool>,
}

impl AllocationReader {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Suggests which lots a need of `needed_quantity` units of a part
    /// could draw from: with-stock lots in oldest-receipt-first order, cut
    /// off once their combined stock covers the need. When total stock
    /// cannot cover it, every with-stock lot is returned and the caller
    /// sees the shortfall from the summed quantities.
    #[instrument(skip(self))]
    pub async fn suggest_allocation(
        &self,
        part_id: i64,
        needed_quantity: i32,
    ) -> Result<Vec<LotCandidate>, ServiceError> {
        if needed_quantity <= 0 {
            return Err(ServiceError::InvalidInput(
                "Needed quantity must be positive".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();
        LotStore::get_active_part(db, part_id).await?;

        let lots = LotStore::list_lots_for_part(db, part_id, true).await?;

        let mut candidates = Vec::new();
        let mut covered: i64 = 0;
        for (lot, stock) in lots {
            if covered >= needed_quantity as i64 {
                break;
            }
            covered += stock.remaining_quantity as i64;
            candidates.push(LotCandidate {
                lot_id: lot.lot_id,
                available_quantity: stock.remaining_quantity,
                unit_cost: lot.unit_cost,
                location: stock.location,
                received_at: lot.received_at,
            });
        }

        Ok(candidates)
    }

    /// Resolves warehouse details for specific lots, e.g. to re-display a
    /// previously chosen allocation. Fails with `NotFound` naming every id
    /// that has no matching lot. Result order follows the requested ids;
    /// duplicates are collapsed onto their first occurrence.
    #[instrument(skip(self))]
    pub async fn warehouse_info(&self, lot_ids: &[i64]) -> Result<Vec<WarehouseInfo>, ServiceError> {
        if lot_ids.is_empty() {
            return Err(ServiceError::InvalidInput(
                "At least one lot id is required".to_string(),
            ));
        }

        let db = self.db_pool.as_ref();

        let rows = PartLot::find()
            .find_also_related(StockRecord)
            .filter(part_lot::Column::LotId.is_in(lot_ids.to_vec()))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let found: HashSet<i64> = rows.iter().map(|(lot, _)| lot.lot_id).collect();
        let missing: Vec<i64> = lot_ids
            .iter()
            .filter(|id| !found.contains(*id))
            .copied()
            .collect();
        if !missing.is_empty() {
            return Err(ServiceError::NotFound(format!(
                "No lots found for ids {:?}",
                missing
            )));
        }

        let part_ids: Vec<i64> = rows.iter().map(|(lot, _)| lot.part_id).collect();
        let parts: HashMap<i64, part::Model> = Part::find()
            .filter(part::Column::PartId.is_in(part_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|p| (p.part_id, p))
            .collect();

        let supplier_ids: Vec<i64> = parts.values().filter_map(|p| p.supplier_id).collect();
        let suppliers: HashMap<i64, supplier::Model> = Supplier::find()
            .filter(supplier::Column::SupplierId.is_in(supplier_ids))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|s| (s.supplier_id, s))
            .collect();

        let by_lot: HashMap<i64, _> = rows
            .into_iter()
            .map(|(lot, stock)| (lot.lot_id, (lot, stock)))
            .collect();

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(lot_ids.len());
        for lot_id in lot_ids {
            if !seen.insert(*lot_id) {
                continue;
            }
            let (lot, stock) = &by_lot[lot_id];
            let stock = stock.as_ref().ok_or_else(|| {
                ServiceError::InternalError(format!("Lot {} has no stock record", lot_id))
            })?;
            let part = parts.get(&lot.part_id).ok_or_else(|| {
                ServiceError::NotFound(format!("Part {} not found", lot.part_id))
            })?;
            let supplier_name = part
                .supplier_id
                .and_then(|id| suppliers.get(&id))
                .map(|s| s.name.clone());

            out.push(WarehouseInfo {
                lot_id: lot.lot_id,
                part_id: part.part_id,
                part_name: part.name.clone(),
                unit: part.unit.clone(),
                available_quantity: stock.remaining_quantity,
                unit_cost: lot.unit_cost,
                location: stock.location.clone(),
                received_at: lot.received_at,
                supplier_name,
            });
        }

        Ok(out)
    }

    /// The audit trail for one lot, oldest movement first.
    #[instrument(skip(self))]
    pub async fn movement_history(
        &self,
        lot_id: i64,
    ) -> Result<Vec<movement_entry::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        PartLot::find_by_id(lot_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Lot {} not found", lot_id)))?;

        StockLedger::entries_for_lot(db, lot_id).await
    }

    /// Lists a part's lots with their stock counters, oldest receipt first.
    #[instrument(skip(self))]
    pub async fn lots_for_part(
        &self,
        part_id: i64,
        only_with_stock: bool,
    ) -> Result<Vec<LotWithStock>, ServiceError> {
        let db = self.db_pool.as_ref();
        LotStore::get_active_part(db, part_id).await?;

        let lots = LotStore::list_lots_for_part(db, part_id, only_with_stock).await?;

        Ok(lots
            .into_iter()
            .map(|(lot, stock)| LotWithStock {
                lot_id: lot.lot_id,
                part_id: lot.part_id,
                received_at: lot.received_at,
                unit_cost: lot.unit_cost,
                received_quantity: lot.received_quantity,
                remaining_quantity: stock.remaining_quantity,
                location: stock.location,
            })
            .collect())
    }
}
