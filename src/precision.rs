//! Symbol precision metadata with hourly caching
//!
//! Tick size and lot step come from the exchange info endpoint and are only
//! used for display formatting, never by the reconstruction algorithm.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{FeedError, Result};

/// Seconds a cached entry stays fresh.
const CACHE_TTL_SECS: i64 = 3600;

const DEFAULT_PRECISION: u32 = 2;
const MAX_PRECISION: u32 = 10;

#[derive(Debug, Clone, Deserialize)]
struct ExchangeInfo {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Clone, Deserialize)]
struct SymbolInfo {
    symbol: String,
    filters: Vec<Filter>,
}

#[derive(Debug, Clone, Deserialize)]
struct Filter {
    #[serde(rename = "filterType")]
    filter_type: String,
    #[serde(rename = "tickSize")]
    tick_size: Option<String>,
    #[serde(rename = "stepSize")]
    step_size: Option<String>,
}

/// Display precision for one symbol.
#[derive(Debug, Clone, Serialize)]
pub struct PrecisionInfo {
    pub symbol: String,
    pub price_precision: u32,
    pub qty_precision: u32,
    pub tick_size: String,
    pub step_size: String,
    pub last_updated: i64,
}

impl PrecisionInfo {
    fn defaults(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            price_precision: DEFAULT_PRECISION,
            qty_precision: DEFAULT_PRECISION,
            tick_size: "0.01".to_string(),
            step_size: "0.01".to_string(),
            last_updated: Utc::now().timestamp(),
        }
    }
}

/// Cached lookup of per-symbol precision metadata.
pub struct PrecisionManager {
    config: Arc<Config>,
    client: reqwest::Client,
    cache: RwLock<HashMap<String, PrecisionInfo>>,
}

impl PrecisionManager {
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.rest_timeout_secs))
            .build()?;

        Ok(Self {
            config,
            client,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Precision info for `symbol`, fetched if missing or stale; defaults
    /// when the exchange cannot be reached.
    pub async fn get(&self, symbol: &str) -> PrecisionInfo {
        match self.fetch(symbol).await {
            Ok(info) => info,
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "Precision lookup failed, using defaults");
                PrecisionInfo::defaults(symbol)
            }
        }
    }

    async fn fetch(&self, symbol: &str) -> Result<PrecisionInfo> {
        let upper = symbol.to_uppercase();

        {
            let cache = self.cache.read().await;
            if let Some(info) = cache.get(&upper) {
                if Utc::now().timestamp() - info.last_updated < CACHE_TTL_SECS {
                    return Ok(info.clone());
                }
            }
        }

        let url = format!("{}/exchangeInfo", self.config.rest_endpoint);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(FeedError::RestApi(format!(
                "Exchange info returned status {}",
                response.status()
            )));
        }
        let exchange_info = response.json::<ExchangeInfo>().await?;

        let symbol_info = exchange_info
            .symbols
            .into_iter()
            .find(|s| s.symbol == upper)
            .ok_or_else(|| FeedError::UnknownSymbol(upper.clone()))?;

        let mut info = PrecisionInfo::defaults(&upper);
        for filter in &symbol_info.filters {
            match filter.filter_type.as_str() {
                "PRICE_FILTER" => {
                    if let Some(tick) = filter.tick_size.as_deref().filter(|t| !t.is_empty()) {
                        info.tick_size = tick.to_string();
                        info.price_precision = step_precision(tick);
                    }
                }
                "LOT_SIZE" => {
                    if let Some(step) = filter.step_size.as_deref().filter(|s| !s.is_empty()) {
                        info.step_size = step.to_string();
                        info.qty_precision = step_precision(step);
                    }
                }
                _ => {}
            }
        }

        info!(
            symbol = %upper,
            price_precision = info.price_precision,
            qty_precision = info.qty_precision,
            tick_size = %info.tick_size,
            step_size = %info.step_size,
            "Fetched symbol precision"
        );

        self.cache.write().await.insert(upper, info.clone());
        Ok(info)
    }

    /// Drop every cached entry.
    pub async fn clear(&self) {
        self.cache.write().await.clear();
    }
}

/// Decimal places implied by a step-size string ("0.00100000" -> 3).
///
/// Steps of 1 or more imply whole units. Unparseable or non-positive steps
/// fall back to the default.
fn step_precision(step: &str) -> u32 {
    let Ok(step) = Decimal::from_str(step) else {
        return DEFAULT_PRECISION;
    };
    if step <= Decimal::ZERO {
        return DEFAULT_PRECISION;
    }
    if step >= Decimal::ONE {
        return 0;
    }
    step.normalize().scale().min(MAX_PRECISION)
}
