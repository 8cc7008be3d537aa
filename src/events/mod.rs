use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Events emitted by the inventory service after a unit of work commits.
/// Delivery is best-effort: a committed receive/export never fails because
/// the channel is closed or full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    LotsReceived {
        lot_ids: Vec<i64>,
        supplier_ref: Option<String>,
    },
    StockExported {
        order_id: Option<i64>,
        lot_ids: Vec<i64>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel for the lifetime of the process. Handling is
/// log-only today; notification fan-out would hang off this loop.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match &event {
            Event::LotsReceived {
                lot_ids,
                supplier_ref,
            } => {
                info!(
                    lots = lot_ids.len(),
                    supplier_ref = supplier_ref.as_deref().unwrap_or("-"),
                    "lots received"
                );
            }
            Event::StockExported { order_id, lot_ids } => {
                info!(?order_id, lots = lot_ids.len(), "stock exported");
            }
        }
    }
    warn!("Event channel closed; event processor exiting");
}
