//! L3 order book reconstruction
//!
//! Estimates per-order queues from aggregate depth changes.

mod book;
mod queue;
mod side;

pub use book::L3Book;
pub use queue::OrderQueue;
pub use side::{PriceKey, SideMap};

use rust_decimal::Decimal;
use serde::Serialize;

/// One price level of a published L3 snapshot.
///
/// `orders` carries the individual reconstructed quantities and is only
/// populated for the top levels of each side.
#[derive(Debug, Clone, Serialize)]
pub struct L3Level {
    pub price: Decimal,
    pub total_size: Decimal,
    pub order_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<Vec<Decimal>>,
    pub max_order: Decimal,
    pub avg_order: Decimal,
}

/// L3 snapshot payload pushed to subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct L3Snapshot {
    pub bids: Vec<L3Level>,
    pub asks: Vec<L3Level>,
    pub timestamp: i64,
    pub symbol: String,
}
