use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One received batch of a part. Every field is fixed at receipt time:
/// lots are the cost and audit basis for the movement history, so they are
/// never updated or deleted. The live counter lives in `stock_record`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "part_lots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub lot_id: i64,
    pub part_id: i64,
    pub received_at: DateTime<Utc>,
    pub unit_cost: i64,
    pub received_quantity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::part::Entity",
        from = "Column::PartId",
        to = "super::part::Column::PartId"
    )]
    Part,
    #[sea_orm(has_one = "super::stock_record::Entity")]
    StockRecord,
    #[sea_orm(has_many = "super::movement_entry::Entity")]
    MovementEntries,
}

impl Related<super::part::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Part.def()
    }
}

impl Related<super::stock_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockRecord.def()
    }
}

impl Related<super::movement_entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MovementEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
