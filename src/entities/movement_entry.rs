use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only movement ledger row. Entries are never updated or deleted;
/// the signed sum per lot (+receive, -export) must equal the lot's
/// `stock_record.remaining_quantity`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movement_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub entry_id: i64,
    pub lot_id: i64,
    pub occurred_at: DateTime<Utc>,
    pub direction: String, // stored as string, converted via `Direction`
    pub quantity: i32,
    pub note: Option<String>,
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

/// Movement direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Receive,
    Export,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Receive => "receive",
            Direction::Export => "export",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "receive" => Some(Direction::Receive),
            "export" => Some(Direction::Export),
            _ => None,
        }
    }

    /// Sign applied to `quantity` when reconciling a lot's ledger.
    pub fn signum(&self) -> i64 {
        match self {
            Direction::Receive => 1,
            Direction::Export => -1,
        }
    }
}
