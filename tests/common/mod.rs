#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use chrono::Utc;
use motoparts_api::{
    api_v1_routes,
    config::AppConfig,
    db::{self, DbPool},
    entities::{movement_entry::Direction, part, part_lot, repair_order, supplier},
    events::{self, EventSender},
    services::{
        allocation::AllocationReader, inventory::InventoryService, lot_store::LotStore,
        stock_ledger::StockLedger,
    },
    AppState,
};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use tokio::sync::mpsc;

/// Test harness: a fresh in-memory SQLite database with migrations applied
/// and the ledger services wired against it.
pub struct TestApp {
    pub db: Arc<DbPool>,
    pub inventory: InventoryService,
    pub allocation: AllocationReader,
    config: AppConfig,
    event_sender: EventSender,
}

impl TestApp {
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        // In-memory SQLite: each pooled connection would get its own
        // database, so the pool must stay at exactly one connection.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations");

        let db = Arc::new(pool);
        let (tx, rx) = mpsc::channel(100);
        let event_sender = EventSender::new(tx);
        tokio::spawn(events::process_events(rx));

        let inventory = InventoryService::new(db.clone(), event_sender.clone());
        let allocation = AllocationReader::new(db.clone());

        Self {
            db,
            inventory,
            allocation,
            config: cfg,
            event_sender,
        }
    }

    /// Full HTTP router as served by the binary, for request-level tests.
    pub fn router(&self) -> Router {
        let state = AppState {
            db: self.db.clone(),
            config: self.config.clone(),
            event_sender: self.event_sender.clone(),
            inventory_service: self.inventory.clone(),
            allocation_reader: self.allocation.clone(),
        };
        Router::new().nest("/api/v1", api_v1_routes()).with_state(state)
    }
}

pub async fn seed_supplier(db: &DbPool, name: &str) -> i64 {
    supplier::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert supplier")
    .supplier_id
}

pub async fn seed_part(db: &DbPool, name: &str, supplier_id: Option<i64>) -> i64 {
    part::ActiveModel {
        name: Set(name.to_string()),
        unit: Set("piece".to_string()),
        reference_price: Set(Some(65_000)),
        supplier_id: Set(supplier_id),
        is_deleted: Set(false),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert part")
    .part_id
}

pub async fn seed_deleted_part(db: &DbPool, name: &str) -> i64 {
    part::ActiveModel {
        name: Set(name.to_string()),
        unit: Set("piece".to_string()),
        is_deleted: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert part")
    .part_id
}

pub async fn seed_order(db: &DbPool) -> i64 {
    repair_order::ActiveModel {
        is_exported: Set(false),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert order")
    .order_id
}

/// Verifies the two ledger invariants for one lot: the signed sum of its
/// movements equals the live counter, and the counter stays within
/// `[0, received_quantity]`.
pub async fn assert_ledger_consistent(app: &TestApp, lot_id: i64) {
    let conn = app.db.as_ref();

    let stock = LotStore::get_stock(conn, lot_id)
        .await
        .expect("stock record should exist");
    let lot = part_lot::Entity::find_by_id(lot_id)
        .one(conn)
        .await
        .expect("lot query should succeed")
        .expect("lot should exist");
    let entries = StockLedger::entries_for_lot(conn, lot_id)
        .await
        .expect("ledger query should succeed");

    let signed_sum: i64 = entries
        .iter()
        .map(|e| {
            let direction =
                Direction::from_str(&e.direction).expect("ledger row has a known direction");
            direction.signum() * e.quantity as i64
        })
        .sum();

    assert_eq!(
        signed_sum, stock.remaining_quantity as i64,
        "signed movement sum diverged from stock counter for lot {}",
        lot_id
    );
    assert!(
        stock.remaining_quantity >= 0 && stock.remaining_quantity <= lot.received_quantity,
        "stock counter out of range for lot {}: {} of {}",
        lot_id,
        stock.remaining_quantity,
        lot.received_quantity
    );
}
