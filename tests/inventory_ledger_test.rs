mod common;

use assert_matches::assert_matches;
use common::TestApp;
use motoparts_api::entities::{movement_entry, part_lot, repair_order, stock_record};
use motoparts_api::errors::ServiceError;
use motoparts_api::services::inventory::{ExportItem, ExportRequest, ReceiveBatch, ReceiveItem};
use motoparts_api::services::stock_ledger::StockLedger;
use sea_orm::{EntityTrait, PaginatorTrait};

fn item(part_id: i64, quantity: i32, unit_cost: i64, location: &str) -> ReceiveItem {
    ReceiveItem {
        part_id,
        quantity,
        unit_cost,
        location: location.to_string(),
    }
}

fn batch(supplier_ref: Option<&str>, items: Vec<ReceiveItem>) -> ReceiveBatch {
    ReceiveBatch {
        supplier_ref: supplier_ref.map(str::to_string),
        note: None,
        items,
    }
}

async fn receive_single_lot(app: &TestApp, part_id: i64, quantity: i32) -> i64 {
    app.inventory
        .receive(batch(None, vec![item(part_id, quantity, 50_000, "A-01")]))
        .await
        .expect("receive should succeed")[0]
}

#[tokio::test]
async fn receive_creates_lots_stock_and_movements() {
    let app = TestApp::new().await;
    let part_id = common::seed_part(&app.db, "Air filter", None).await;

    let lot_ids = app
        .inventory
        .receive(batch(
            Some("Hondaparts Ltd"),
            vec![
                item(part_id, 10, 65_000, "A-01"),
                item(part_id, 4, 70_000, "A-02"),
            ],
        ))
        .await
        .expect("receive should succeed");

    assert_eq!(lot_ids.len(), 2);

    let stock = stock_record::Entity::find_by_id(lot_ids[0])
        .one(app.db.as_ref())
        .await
        .unwrap()
        .expect("stock record exists");
    assert_eq!(stock.remaining_quantity, 10);
    assert_eq!(stock.location, "A-01");

    let lot = part_lot::Entity::find_by_id(lot_ids[1])
        .one(app.db.as_ref())
        .await
        .unwrap()
        .expect("lot exists");
    assert_eq!(lot.part_id, part_id);
    assert_eq!(lot.received_quantity, 4);
    assert_eq!(lot.unit_cost, 70_000);

    let entries = StockLedger::entries_for_lot(app.db.as_ref(), lot_ids[0])
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].direction, "receive");
    assert_eq!(entries[0].quantity, 10);
    assert!(entries[0]
        .note
        .as_deref()
        .unwrap()
        .contains("Hondaparts Ltd"));

    for &lot_id in &lot_ids {
        common::assert_ledger_consistent(&app, lot_id).await;
    }
}

#[tokio::test]
async fn receive_rejects_invalid_item_without_creating_anything() {
    let app = TestApp::new().await;
    let part_id = common::seed_part(&app.db, "Brake pad", None).await;

    // 5 items, third invalid: the whole batch must be rejected
    let mut items: Vec<ReceiveItem> = (0..5)
        .map(|i| item(part_id, 5 + i, 40_000, "B-01"))
        .collect();
    items[2].quantity = 0;

    let err = app.inventory.receive(batch(None, items)).await.unwrap_err();
    assert_matches!(err, ServiceError::InvalidInput(_));

    let lots = part_lot::Entity::find().count(app.db.as_ref()).await.unwrap();
    assert_eq!(lots, 0, "no lot from the rejected batch may exist");
    let entries = movement_entry::Entity::find()
        .count(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(entries, 0);
}

#[tokio::test]
async fn receive_rolls_back_whole_batch_on_unknown_part() {
    let app = TestApp::new().await;
    let part_id = common::seed_part(&app.db, "Spark plug", None).await;

    // First two items are storable; the third references a missing part,
    // which is only detected inside the transaction.
    let err = app
        .inventory
        .receive(batch(
            None,
            vec![
                item(part_id, 3, 20_000, "C-01"),
                item(part_id, 6, 20_000, "C-02"),
                item(9_999, 1, 20_000, "C-03"),
            ],
        ))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(msg) if msg.contains("9999"));

    let lots = part_lot::Entity::find().count(app.db.as_ref()).await.unwrap();
    assert_eq!(lots, 0, "partial batches must not survive");
    let stocks = stock_record::Entity::find()
        .count(app.db.as_ref())
        .await
        .unwrap();
    assert_eq!(stocks, 0);
}

#[tokio::test]
async fn receive_rejects_soft_deleted_part() {
    let app = TestApp::new().await;
    let part_id = common::seed_deleted_part(&app.db, "Discontinued mirror").await;

    let err = app
        .inventory
        .receive(batch(None, vec![item(part_id, 2, 10_000, "D-01")]))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn export_deducts_stock_and_appends_entries() {
    let app = TestApp::new().await;
    let part_id = common::seed_part(&app.db, "Chain kit", None).await;
    let lot_id = receive_single_lot(&app, part_id, 10).await;
    let order_id = common::seed_order(&app.db).await;

    app.inventory
        .export(ExportRequest {
            order_id: Some(order_id),
            items: vec![ExportItem {
                lot_id,
                quantity: 6,
            }],
        })
        .await
        .expect("export should succeed");

    let stock = stock_record::Entity::find_by_id(lot_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock.remaining_quantity, 4);

    let entries = StockLedger::entries_for_lot(app.db.as_ref(), lot_id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].direction, "export");
    assert_eq!(entries[1].quantity, 6);
    assert!(entries[1]
        .note
        .as_deref()
        .unwrap()
        .contains(&format!("order {}", order_id)));

    common::assert_ledger_consistent(&app, lot_id).await;
}

#[tokio::test]
async fn export_is_atomic_across_lots() {
    let app = TestApp::new().await;
    let part_id = common::seed_part(&app.db, "Oil filter", None).await;
    let lot_a = receive_single_lot(&app, part_id, 10).await;
    let lot_b = receive_single_lot(&app, part_id, 5).await;

    // Lot A could cover its share, lot B cannot: the failure of B must
    // also roll back A's deduction.
    let err = app
        .inventory
        .export(ExportRequest {
            order_id: None,
            items: vec![
                ExportItem {
                    lot_id: lot_a,
                    quantity: 4,
                },
                ExportItem {
                    lot_id: lot_b,
                    quantity: 9,
                },
            ],
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock { lot_id } if lot_id == lot_b);

    let stock_a = stock_record::Entity::find_by_id(lot_a)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock_a.remaining_quantity, 10, "lot A must stay untouched");

    let entries_a = StockLedger::entries_for_lot(app.db.as_ref(), lot_a)
        .await
        .unwrap();
    assert_eq!(entries_a.len(), 1, "only the receive movement may exist");

    common::assert_ledger_consistent(&app, lot_a).await;
    common::assert_ledger_consistent(&app, lot_b).await;
}

#[tokio::test]
async fn export_cannot_overdraw_a_lot() {
    let app = TestApp::new().await;
    let part_id = common::seed_part(&app.db, "Clutch lever", None).await;
    let lot_id = receive_single_lot(&app, part_id, 10).await;

    let export_six = ExportRequest {
        order_id: None,
        items: vec![ExportItem {
            lot_id,
            quantity: 6,
        }],
    };

    app.inventory
        .export(export_six.clone())
        .await
        .expect("first export fits");
    let err = app.inventory.export(export_six).await.unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock { lot_id: l } if l == lot_id);

    let stock = stock_record::Entity::find_by_id(lot_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock.remaining_quantity, 4);

    common::assert_ledger_consistent(&app, lot_id).await;
}

#[tokio::test]
async fn export_unknown_lot_is_not_found() {
    let app = TestApp::new().await;

    let err = app
        .inventory
        .export(ExportRequest {
            order_id: None,
            items: vec![ExportItem {
                lot_id: 404,
                quantity: 1,
            }],
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(_));
}

#[tokio::test]
async fn export_marks_order_exported_in_same_transaction() {
    let app = TestApp::new().await;
    let part_id = common::seed_part(&app.db, "Headlight bulb", None).await;
    let lot_id = receive_single_lot(&app, part_id, 8).await;
    let order_id = common::seed_order(&app.db).await;

    app.inventory
        .export(ExportRequest {
            order_id: Some(order_id),
            items: vec![ExportItem {
                lot_id,
                quantity: 3,
            }],
        })
        .await
        .expect("export should succeed");

    let order = repair_order::Entity::find_by_id(order_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert!(order.is_exported);
}

#[tokio::test]
async fn failed_export_leaves_order_unexported() {
    let app = TestApp::new().await;
    let part_id = common::seed_part(&app.db, "Rear shock", None).await;
    let lot_id = receive_single_lot(&app, part_id, 2).await;
    let order_id = common::seed_order(&app.db).await;

    let err = app
        .inventory
        .export(ExportRequest {
            order_id: Some(order_id),
            items: vec![ExportItem {
                lot_id,
                quantity: 5,
            }],
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InsufficientStock { .. });

    let order = repair_order::Entity::find_by_id(order_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert!(!order.is_exported);
}

#[tokio::test]
async fn export_against_unknown_order_rolls_back_deductions() {
    let app = TestApp::new().await;
    let part_id = common::seed_part(&app.db, "Front fender", None).await;
    let lot_id = receive_single_lot(&app, part_id, 10).await;

    // The deduction itself would fit; the order lookup fails afterwards,
    // inside the same transaction.
    let err = app
        .inventory
        .export(ExportRequest {
            order_id: Some(9_999),
            items: vec![ExportItem {
                lot_id,
                quantity: 2,
            }],
        })
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::NotFound(msg) if msg.contains("9999"));

    let stock = stock_record::Entity::find_by_id(lot_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock.remaining_quantity, 10, "deduction must be rolled back");

    common::assert_ledger_consistent(&app, lot_id).await;
}

#[tokio::test]
async fn ledger_stays_consistent_over_mixed_operations() {
    let app = TestApp::new().await;
    let part_id = common::seed_part(&app.db, "Piston ring set", None).await;
    let lot_id = receive_single_lot(&app, part_id, 20).await;

    for quantity in [3, 7, 5] {
        app.inventory
            .export(ExportRequest {
                order_id: None,
                items: vec![ExportItem { lot_id, quantity }],
            })
            .await
            .expect("export fits");
        common::assert_ledger_consistent(&app, lot_id).await;
    }

    let stock = stock_record::Entity::find_by_id(lot_id)
        .one(app.db.as_ref())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stock.remaining_quantity, 5);

    let entries = StockLedger::entries_for_lot(app.db.as_ref(), lot_id)
        .await
        .unwrap();
    assert_eq!(entries.len(), 4);
}
