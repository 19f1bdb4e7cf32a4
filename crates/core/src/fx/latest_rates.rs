//! Short-lived cache for batched latest-rate lookups.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use rust_decimal::Decimal;

use super::fx_store::RateStore;
use crate::constants::LATEST_RATES_TTL_SECS;
use crate::errors::Result;

struct CacheEntry {
    expires_at: Instant,
    rates: HashMap<String, Decimal>,
}

/// Process-wide TTL cache mapping `(quote, sorted bases)` to a rate map.
///
/// Batches N currency lookups into one store round-trip. Expiry is purely
/// time-based: a rate persisted by the resolver may not show up here for up
/// to the TTL, which is an accepted staleness window.
pub struct LatestRatesCache {
    store: Arc<dyn RateStore>,
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl LatestRatesCache {
    pub fn new(store: Arc<dyn RateStore>) -> Self {
        Self::with_ttl(store, Duration::from_secs(LATEST_RATES_TTL_SECS))
    }

    pub fn with_ttl(store: Arc<dyn RateStore>, ttl: Duration) -> Self {
        Self {
            store,
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Returns the most recent rate per base against `quote`.
    ///
    /// Bases missing from the result simply have no snapshot in the store.
    /// An empty `bases` set returns an empty map without touching the store.
    pub fn latest_rates(&self, bases: &[String], quote: &str) -> Result<HashMap<String, Decimal>> {
        if bases.is_empty() {
            return Ok(HashMap::new());
        }

        let mut sorted: Vec<String> = bases.iter().map(|b| b.to_ascii_uppercase()).collect();
        sorted.sort();
        sorted.dedup();

        // Sorting the bases makes the key order-independent, so {EUR,USD}
        // and {USD,EUR} hit the same entry.
        let key = format!("{}:{}", quote, sorted.join(","));

        if let Some(entry) = self.entries.get(&key) {
            if entry.expires_at > Instant::now() {
                return Ok(entry.rates.clone());
            }
        }

        let rows = self.store.latest_rate_rows(quote, Some(&sorted))?;
        let mut rates = HashMap::with_capacity(sorted.len());
        for row in rows {
            // Rows are ordered base asc, date desc, id desc; keep the first
            // (= most recent) row per base.
            if !rates.contains_key(&row.base) {
                rates.insert(row.base, row.rate);
            }
        }

        self.entries.insert(
            key,
            CacheEntry {
                expires_at: Instant::now() + self.ttl,
                rates: rates.clone(),
            },
        );
        Ok(rates)
    }
}
