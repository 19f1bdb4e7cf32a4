use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::Serialize;

use watchledger_rate_providers::ProviderChain;

use super::currency::normalize_currency_code;
use super::fx_model::{ExchangeRate, NewExchangeRate, SOURCE_MANUAL};
use super::fx_store::RateStore;
use crate::countries::CountryRepositoryTrait;
use crate::errors::Result;

/// Rate resolution service.
///
/// Layers identity -> store -> provider chain so that external calls are the
/// last resort and repeated same-day requests are deterministic once one
/// fetch has succeeded.
pub struct FxService {
    store: Arc<dyn RateStore>,
    providers: ProviderChain,
    countries: Arc<dyn CountryRepositoryTrait>,
}

/// Outcome of one batch rate-population run.
#[derive(Serialize, Debug, Clone)]
pub struct FetchRatesSummary {
    pub date: NaiveDate,
    pub quote: String,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

/// Latest snapshot per base for one quote currency.
#[derive(Debug, Clone)]
pub struct LatestRatesMap {
    pub quote: String,
    pub rates: BTreeMap<String, Decimal>,
}

impl FxService {
    pub fn new(
        store: Arc<dyn RateStore>,
        providers: ProviderChain,
        countries: Arc<dyn CountryRepositoryTrait>,
    ) -> Self {
        Self {
            store,
            providers,
            countries,
        }
    }

    /// Resolves a rate for `(base, quote, date)`.
    ///
    /// Returns `Ok(None)` when no snapshot exists and none could be fetched;
    /// callers treat that as a normal result, not an error.
    ///
    /// 1. Codes are normalized and validated before any I/O.
    /// 2. `base == quote` get-or-creates the identity snapshot and never
    ///    touches the store lookup or the providers.
    /// 3. A supplied `date` requires an exact match in the store; without one
    ///    the most recent snapshot for the pair wins.
    /// 4. On a store miss with `allow_fetch`, providers are tried in priority
    ///    order and the first success is persisted under that provider's id.
    pub async fn resolve(
        &self,
        base: &str,
        quote: &str,
        date: Option<NaiveDate>,
        allow_fetch: bool,
    ) -> Result<Option<ExchangeRate>> {
        let base = normalize_currency_code(base)?;
        let quote = normalize_currency_code(quote)?;

        if base == quote {
            let snapshot = NewExchangeRate::identity(&base, date.unwrap_or_else(today));
            return self.store.insert_snapshot(snapshot).await.map(Some);
        }

        let stored = match date {
            Some(d) => self.store.get_rate_on(&base, &quote, d)?,
            None => self.store.get_latest_rate(&base, &quote)?,
        };
        if stored.is_some() {
            return Ok(stored);
        }

        if !allow_fetch {
            return Ok(None);
        }

        match self.providers.fetch_first(&base, &quote, date).await {
            Some(fetched) => {
                let snapshot = NewExchangeRate {
                    base,
                    quote,
                    date: date.unwrap_or_else(today),
                    rate: fetched.rate,
                    source: fetched.provider.to_string(),
                };
                self.store.insert_snapshot(snapshot).await.map(Some)
            }
            None => {
                debug!("no provider could supply a rate for {}/{}", base, quote);
                Ok(None)
            }
        }
    }

    /// Persists an administratively entered rate (`source = "manual"`).
    pub async fn add_manual_rate(
        &self,
        base: &str,
        quote: &str,
        date: Option<NaiveDate>,
        rate: Decimal,
    ) -> Result<ExchangeRate> {
        let snapshot = NewExchangeRate {
            base: normalize_currency_code(base)?,
            quote: normalize_currency_code(quote)?,
            date: date.unwrap_or_else(today),
            rate,
            source: SOURCE_MANUAL.to_string(),
        };
        self.store.insert_snapshot(snapshot).await
    }

    /// Batch rate population for one date.
    ///
    /// With no explicit `bases`, the set is derived from the distinct
    /// non-empty default currencies across all known countries. Individual
    /// failures are counted, logged, and never abort the run.
    pub async fn fetch_rates(
        &self,
        date: Option<NaiveDate>,
        quote: &str,
        bases: Option<Vec<String>>,
    ) -> Result<FetchRatesSummary> {
        let date = date.unwrap_or_else(today);
        let quote = normalize_currency_code(quote)?;

        let bases = match bases {
            Some(list) => {
                let mut cleaned: Vec<String> = list
                    .iter()
                    .map(|b| b.trim().to_ascii_uppercase())
                    .filter(|b| !b.is_empty())
                    .collect();
                cleaned.sort();
                cleaned.dedup();
                cleaned
            }
            None => self.countries.distinct_default_currencies()?,
        };

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for base in bases {
            match self.resolve(&base, &quote, Some(date), true).await {
                Ok(Some(rate)) => {
                    debug!(
                        "{} 1 {} = {} {} [{}]",
                        date, rate.base, rate.rate, rate.quote, rate.source
                    );
                    succeeded.push(base);
                }
                Ok(None) => {
                    warn!("{} {}->{} rate unavailable", date, base, quote);
                    failed.push(base);
                }
                Err(e) => {
                    warn!("{} {}->{} fetch failed: {}", date, base, quote, e);
                    failed.push(base);
                }
            }
        }

        info!(
            "rate fetch for {} complete: {} succeeded, {} failed",
            date,
            succeeded.len(),
            failed.len()
        );
        Ok(FetchRatesSummary {
            date,
            quote,
            succeeded,
            failed,
        })
    }

    /// Most recent snapshot per base for `quote`, straight from the store.
    ///
    /// Empty `bases` means every base known for the quote. This read path is
    /// uncached; the TTL cache in [`super::LatestRatesCache`] serves the
    /// high-traffic decoration path.
    pub fn latest_rates_map(&self, quote: &str, bases: &[String]) -> Result<LatestRatesMap> {
        let quote = normalize_currency_code(quote)?;
        let normalized: Vec<String> = bases
            .iter()
            .map(|b| normalize_currency_code(b))
            .collect::<std::result::Result<_, _>>()?;

        let rows = self.store.latest_rate_rows(
            &quote,
            if normalized.is_empty() {
                None
            } else {
                Some(&normalized)
            },
        )?;

        // Rows arrive ordered (base asc, date desc, id desc); the first row
        // per base is the latest snapshot.
        let mut rates = BTreeMap::new();
        for row in rows {
            rates.entry(row.base).or_insert(row.rate);
        }
        Ok(LatestRatesMap { quote, rates })
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
