use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Part catalog row. The ledger reads it (existence, soft-delete flag) but
/// never mutates it. `reference_price` is the current list price in integer
/// currency units; the purchase price actually paid lives on each lot.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "parts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub part_id: i64,
    pub name: String,
    pub unit: String,
    pub reference_price: Option<i64>,
    pub image_url: Option<String>,
    pub supplier_id: Option<i64>,
    pub is_deleted: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::supplier::Entity",
        from = "Column::SupplierId",
        to = "super::supplier::Column::SupplierId"
    )]
    Supplier,
    #[sea_orm(has_many = "super::part_lot::Entity")]
    PartLots,
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Supplier.def()
    }
}

impl Related<super::part_lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartLots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
