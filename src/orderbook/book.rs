//! L3 book reconstruction from L2 snapshots and deltas

use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::btree_map::Entry;
use std::str::FromStr;
use tracing::debug;

use super::{L3Level, L3Snapshot, OrderQueue, PriceKey, SideMap};
use crate::parser::{DepthSnapshot, DepthUpdate, RawLevel};

/// Levels per side whose individual order quantities are included in
/// published snapshots.
const ORDER_DETAIL_LEVELS: usize = 10;

/// Estimated per-order view of one instrument's book.
///
/// Created empty, populated by exactly one [`load_snapshot`] call, then
/// mutated only by [`apply_delta`]. On symbol switch the book is discarded
/// whole.
///
/// [`load_snapshot`]: L3Book::load_snapshot
/// [`apply_delta`]: L3Book::apply_delta
#[derive(Debug)]
pub struct L3Book {
    symbol: String,
    bids: SideMap,
    asks: SideMap,
    last_update_id: u64,
}

impl L3Book {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            bids: SideMap::default(),
            asks: SideMap::default(),
            last_update_id: 0,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn last_update_id(&self) -> u64 {
        self.last_update_id
    }

    pub fn bid_levels(&self) -> usize {
        self.bids.len()
    }

    pub fn ask_levels(&self) -> usize {
        self.asks.len()
    }

    /// Initialize from a REST snapshot.
    ///
    /// Every surviving level starts as a single synthetic order equal to the
    /// aggregate; subsequent deltas refine the queue from that fiction.
    pub fn load_snapshot(&mut self, snapshot: &DepthSnapshot) {
        self.bids.clear();
        self.asks.clear();

        for level in &snapshot.bids {
            Self::seed_level(&mut self.bids, level);
        }
        for level in &snapshot.asks {
            Self::seed_level(&mut self.asks, level);
        }

        self.last_update_id = snapshot.last_update_id;
    }

    fn seed_level(side: &mut SideMap, level: &RawLevel) {
        let Some(key) = PriceKey::parse(&level.price) else {
            return;
        };
        let Some(qty) = parse_qty(&level.qty) else {
            return;
        };
        if qty.is_zero() {
            return;
        }
        side.insert(key, OrderQueue::seeded(qty));
    }

    /// Apply one depth delta, inferring add/cancel/fill events per level.
    ///
    /// Changes are applied in arrival order; an unparseable price or
    /// quantity skips that change only. The watermark advances to the
    /// delta's final update id when it is greater.
    pub fn apply_delta(&mut self, update: &DepthUpdate) {
        for change in &update.bids {
            Self::apply_change(&mut self.bids, change);
        }
        for change in &update.asks {
            Self::apply_change(&mut self.asks, change);
        }

        if update.final_update_id > self.last_update_id {
            self.last_update_id = update.final_update_id;
        }
    }

    fn apply_change(side: &mut SideMap, change: &RawLevel) {
        let Some(key) = PriceKey::parse(&change.price) else {
            debug!(price = %change.price, "skipping change with unparseable price");
            return;
        };
        let Some(new_qty) = parse_qty(&change.qty) else {
            debug!(price = %change.price, qty = %change.qty, "skipping change with unparseable qty");
            return;
        };

        if new_qty.is_zero() {
            side.remove(&key);
            return;
        }

        match side.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(OrderQueue::seeded(new_qty));
            }
            Entry::Occupied(slot) => {
                let queue = slot.into_mut();
                let old_sum = queue.sum();

                if new_qty > old_sum {
                    // Net arrival: one new order joins the back of the FIFO.
                    queue.push_back(new_qty - old_sum);
                } else if new_qty < old_sum {
                    // Net departure: exact cancellation first, otherwise the
                    // largest resting order absorbs the shortfall. The queue
                    // cannot drain here: diff < old_sum, so an exact match
                    // never takes the sole entry and reduce_largest leaves
                    // either a reduced entry or the rest of the queue.
                    let diff = old_sum - new_qty;
                    if !queue.remove_exact(diff) {
                        queue.reduce_largest(diff);
                    }
                }
            }
        }
    }

    /// Build the L3 snapshot payload: top `top_levels` per side, bids
    /// descending and asks ascending by decimal price, order detail for the
    /// first [`ORDER_DETAIL_LEVELS`] entries.
    pub fn snapshot(&self, top_levels: usize) -> L3Snapshot {
        L3Snapshot {
            bids: build_levels(self.bids.iter_desc(), top_levels),
            asks: build_levels(self.asks.iter_asc(), top_levels),
            timestamp: Utc::now().timestamp_millis(),
            symbol: self.symbol.clone(),
        }
    }
}

fn build_levels<'a>(
    levels: impl Iterator<Item = (&'a PriceKey, &'a OrderQueue)>,
    top_levels: usize,
) -> Vec<L3Level> {
    levels
        .take(top_levels)
        .enumerate()
        .map(|(i, (key, queue))| {
            let total_size = queue.sum();
            let order_count = queue.len();
            let avg_order = if order_count > 0 {
                total_size / Decimal::from(order_count)
            } else {
                Decimal::ZERO
            };

            L3Level {
                price: key.price(),
                total_size,
                order_count,
                orders: (i < ORDER_DETAIL_LEVELS).then(|| queue.orders().to_vec()),
                max_order: queue.max_order().unwrap_or_default(),
                avg_order,
            }
        })
        .collect()
}

fn parse_qty(raw: &str) -> Option<Decimal> {
    let qty = Decimal::from_str(raw).ok()?;
    if qty.is_sign_negative() {
        return None;
    }
    Some(qty)
}
