//! Wire types for Binance futures depth messages
//!
//! Prices and quantities arrive as JSON strings and are kept as strings here:
//! the price string is used verbatim as the level key, and quantity parsing
//! happens per change inside the book so one bad entry never poisons the rest
//! of a batch.

use serde::{Deserialize, Deserializer};

/// One `[price, qty]` pair as delivered by the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLevel {
    pub price: String,
    pub qty: String,
}

impl RawLevel {
    pub fn new(price: impl Into<String>, qty: impl Into<String>) -> Self {
        Self {
            price: price.into(),
            qty: qty.into(),
        }
    }
}

/// Incremental depth update from the `@depth@100ms` stream.
///
/// The feed carries both `U` (first update id) and `u` (final update id);
/// only `u` drives the book's watermark.
#[derive(Debug, Clone, Deserialize)]
pub struct DepthUpdate {
    /// First update ID in the event
    #[serde(rename = "U", default)]
    pub first_update_id: u64,

    /// Final update ID in the event
    #[serde(rename = "u")]
    pub final_update_id: u64,

    /// Bid level changes
    #[serde(rename = "b", deserialize_with = "deserialize_levels")]
    pub bids: Vec<RawLevel>,

    /// Ask level changes
    #[serde(rename = "a", deserialize_with = "deserialize_levels")]
    pub asks: Vec<RawLevel>,
}

/// Full depth snapshot from `GET /fapi/v1/depth`.
#[derive(Debug, Clone, Deserialize)]
pub struct DepthSnapshot {
    #[serde(rename = "lastUpdateId")]
    pub last_update_id: u64,

    #[serde(deserialize_with = "deserialize_levels")]
    pub bids: Vec<RawLevel>,

    #[serde(deserialize_with = "deserialize_levels")]
    pub asks: Vec<RawLevel>,
}

/// Deserialize `[[price, qty], ...]`, dropping malformed pairs.
fn deserialize_levels<'de, D>(deserializer: D) -> Result<Vec<RawLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Vec<String>> = Deserialize::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|pair| {
            let mut fields = pair.into_iter();
            let price = fields.next()?;
            let qty = fields.next()?;
            Some(RawLevel { price, qty })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_depth_update() {
        let raw = r#"{
            "e": "depthUpdate",
            "E": 1672531200000,
            "T": 1672531199990,
            "s": "ETHUSDT",
            "U": 100,
            "u": 105,
            "pu": 99,
            "b": [["2000.50", "1.5"], ["1999.00", "2.0"]],
            "a": [["2001.00", "1.0"]]
        }"#;

        let update: DepthUpdate = serde_json::from_str(raw).unwrap();
        assert_eq!(update.first_update_id, 100);
        assert_eq!(update.final_update_id, 105);
        assert_eq!(update.bids.len(), 2);
        assert_eq!(update.bids[0], RawLevel::new("2000.50", "1.5"));
        assert_eq!(update.asks.len(), 1);
    }

    #[test]
    fn parse_depth_update_without_first_id() {
        let raw = r#"{"u": 7, "b": [], "a": [["10.0", "3"]]}"#;
        let update: DepthUpdate = serde_json::from_str(raw).unwrap();
        assert_eq!(update.first_update_id, 0);
        assert_eq!(update.final_update_id, 7);
    }

    #[test]
    fn parse_snapshot() {
        let raw = r#"{
            "lastUpdateId": 160,
            "bids": [["100.00", "5"], ["99.50", "2"]],
            "asks": [["100.50", "1"]]
        }"#;

        let snapshot: DepthSnapshot = serde_json::from_str(raw).unwrap();
        assert_eq!(snapshot.last_update_id, 160);
        assert_eq!(snapshot.bids.len(), 2);
        assert_eq!(snapshot.asks[0], RawLevel::new("100.50", "1"));
    }

    #[test]
    fn malformed_pairs_are_dropped() {
        let raw = r#"{"u": 1, "b": [["100.00"], ["99.00", "2"], []], "a": []}"#;
        let update: DepthUpdate = serde_json::from_str(raw).unwrap();
        assert_eq!(update.bids, vec![RawLevel::new("99.00", "2")]);
    }
}
