pub mod allocation;
pub mod inventory;
pub mod lot_store;
pub mod stock_ledger;
