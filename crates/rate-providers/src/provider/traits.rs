use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::errors::RateProviderError;

/// One external exchange-rate source.
///
/// Implementations are stateless HTTP clients; the chain owns ordering and
/// fallback. Currency codes arrive already normalized to uppercase ISO 4217.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Stable identifier, persisted as the `source` of stored snapshots.
    fn id(&self) -> &'static str;

    /// Lower runs first in the chain.
    fn priority(&self) -> u8 {
        10
    }

    /// Whether a `date` in the past is honored or silently served as latest.
    fn supports_historical(&self) -> bool {
        true
    }

    /// `1 base = ? quote` on `date` (or the latest available when `None`).
    async fn fetch_rate(
        &self,
        base: &str,
        quote: &str,
        date: Option<NaiveDate>,
    ) -> Result<Decimal, RateProviderError>;
}
