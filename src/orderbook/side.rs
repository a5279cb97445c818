//! Price-keyed level maps for one side of the book

use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::btree_map::{self, BTreeMap};
use std::str::FromStr;

use super::OrderQueue;

/// Level key: the exchange's price string kept verbatim, paired with its
/// parsed decimal value.
///
/// Ordering is by decimal value, with the raw string as tie-breaker so that
/// distinct string forms of the same value (e.g. "10.0" and "10.00") remain
/// distinct keys. The raw form is never canonicalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceKey {
    price: Decimal,
    raw: String,
}

impl PriceKey {
    /// Parse an exchange price string. Returns `None` for unparseable or
    /// negative prices; the caller skips the change.
    pub fn parse(raw: &str) -> Option<Self> {
        let price = Decimal::from_str(raw).ok()?;
        if price.is_sign_negative() {
            return None;
        }
        Some(Self {
            price,
            raw: raw.to_string(),
        })
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl Ord for PriceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.price
            .cmp(&other.price)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for PriceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Mapping from price to order queue for one side.
///
/// Ascending iteration is best-first for asks; bids use [`iter_desc`].
/// Empty queues are never retained: a zero-quantity change removes the
/// level outright, and positive-quantity arithmetic always leaves at least
/// one order behind.
///
/// [`iter_desc`]: SideMap::iter_desc
#[derive(Debug, Default)]
pub struct SideMap {
    levels: BTreeMap<PriceKey, OrderQueue>,
}

impl SideMap {
    pub fn clear(&mut self) {
        self.levels.clear();
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn insert(&mut self, key: PriceKey, queue: OrderQueue) {
        self.levels.insert(key, queue);
    }

    pub fn remove(&mut self, key: &PriceKey) -> Option<OrderQueue> {
        self.levels.remove(key)
    }

    pub fn get(&self, key: &PriceKey) -> Option<&OrderQueue> {
        self.levels.get(key)
    }

    pub fn entry(&mut self, key: PriceKey) -> btree_map::Entry<'_, PriceKey, OrderQueue> {
        self.levels.entry(key)
    }

    /// Levels in ascending price order (best-first for asks).
    pub fn iter_asc(&self) -> impl Iterator<Item = (&PriceKey, &OrderQueue)> {
        self.levels.iter()
    }

    /// Levels in descending price order (best-first for bids).
    pub fn iter_desc(&self) -> impl Iterator<Item = (&PriceKey, &OrderQueue)> {
        self.levels.iter().rev()
    }
}
