pub mod inventory;
pub mod warehouse;

pub use inventory::inventory_router;
pub use warehouse::warehouse_router;

use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Liveness + database reachability.
pub async fn health_check(State(state): State<crate::AppState>) -> Json<Value> {
    let db_ok = crate::db::check_connection(&state.db).await.is_ok();
    Json(json!({
        "status": if db_ok { "ok" } else { "degraded" },
        "database": db_ok,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
