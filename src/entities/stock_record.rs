use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Current-stock projection, one-to-one with `part_lot`.
///
/// `remaining_quantity` is the only contended field in the subsystem and is
/// mutated exclusively by the inventory service's export path, which keeps
/// `0 <= remaining_quantity <= part_lot.received_quantity`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "stock_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub lot_id: i64,
    pub remaining_quantity: i32,
    pub location: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::part_lot::Entity",
        from = "Column::LotId",
        to = "super::part_lot::Column::LotId"
    )]
    PartLot,
}

impl Related<super::part_lot::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PartLot.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
