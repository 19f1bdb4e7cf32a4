//! Rate storage traits.
//!
//! These traits abstract the persistence layer so the resolver and cache can
//! be exercised against mocks and different storage backends.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::fx_model::{ExchangeRate, NewExchangeRate};
use crate::errors::Result;

/// One `(base, rate)` row from the batched latest-rates query.
#[derive(Debug, Clone)]
pub struct RateRow {
    pub base: String,
    pub rate: Decimal,
}

/// Storage interface for exchange-rate snapshots.
#[async_trait]
pub trait RateStore: Send + Sync {
    /// Exact-date lookup for a pair. No nearest-date fallback here; the
    /// latest-regardless-of-date semantics belong to [`latest_rate_rows`](Self::latest_rate_rows).
    fn get_rate_on(&self, base: &str, quote: &str, date: NaiveDate)
        -> Result<Option<ExchangeRate>>;

    /// Most recent snapshot for a pair regardless of date.
    fn get_latest_rate(&self, base: &str, quote: &str) -> Result<Option<ExchangeRate>>;

    /// Rows for `quote`, restricted to `bases` (all known bases when `None`),
    /// ordered by base ascending, then date descending, then insertion id
    /// descending. With that ordering a single forward pass keeping the first
    /// row per base yields the most recent snapshot for every base in one
    /// round-trip.
    fn latest_rate_rows(&self, quote: &str, bases: Option<&[String]>) -> Result<Vec<RateRow>>;

    /// Inserts a snapshot honoring the `(base, quote, date)` uniqueness
    /// constraint. On conflict the existing row is returned untouched, so
    /// concurrent identical writes converge on one row.
    async fn insert_snapshot(&self, snapshot: NewExchangeRate) -> Result<ExchangeRate>;
}
