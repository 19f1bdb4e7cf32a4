use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use watchledger_rate_providers::{ProviderChain, RateProvider, RateProviderError};

use super::fx_model::{ExchangeRate, NewExchangeRate, SOURCE_IDENTITY};
use super::fx_service::FxService;
use super::fx_store::{RateRow, RateStore};
use super::latest_rates::LatestRatesCache;
use crate::countries::{Country, CountryRepositoryTrait, NewCountry};
use crate::errors::Result;

/// In-memory store mirroring the unique `(base, quote, date)` constraint
/// and the `(base asc, date desc, id desc)` row ordering contract.
struct MockRateStore {
    rows: Mutex<Vec<ExchangeRate>>,
    next_id: AtomicI32,
    row_queries: AtomicUsize,
}

impl MockRateStore {
    fn new() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
            row_queries: AtomicUsize::new(0),
        }
    }

    fn seeded(snapshots: Vec<NewExchangeRate>) -> Arc<Self> {
        let store = Self::new();
        for snapshot in snapshots {
            store.push(snapshot);
        }
        Arc::new(store)
    }

    fn push(&self, snapshot: NewExchangeRate) -> ExchangeRate {
        let row = ExchangeRate {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            base: snapshot.base,
            quote: snapshot.quote,
            date: snapshot.date,
            rate: snapshot.rate,
            source: snapshot.source,
            created_at: Utc::now().naive_utc(),
        };
        self.rows.lock().unwrap().push(row.clone());
        row
    }

    fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl RateStore for MockRateStore {
    fn get_rate_on(&self, base: &str, quote: &str, date: NaiveDate) -> Result<Option<ExchangeRate>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.base == base && r.quote == quote && r.date == date)
            .cloned())
    }

    fn get_latest_rate(&self, base: &str, quote: &str) -> Result<Option<ExchangeRate>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.base == base && r.quote == quote)
            .max_by_key(|r| (r.date, r.id))
            .cloned())
    }

    fn latest_rate_rows(&self, quote: &str, bases: Option<&[String]>) -> Result<Vec<RateRow>> {
        self.row_queries.fetch_add(1, Ordering::SeqCst);
        let mut matched: Vec<ExchangeRate> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.quote == quote)
            .filter(|r| bases.map_or(true, |b| b.contains(&r.base)))
            .cloned()
            .collect();
        matched.sort_by(|a, b| {
            a.base
                .cmp(&b.base)
                .then(b.date.cmp(&a.date))
                .then(b.id.cmp(&a.id))
        });
        Ok(matched
            .into_iter()
            .map(|r| RateRow {
                base: r.base,
                rate: r.rate,
            })
            .collect())
    }

    async fn insert_snapshot(&self, snapshot: NewExchangeRate) -> Result<ExchangeRate> {
        if let Some(existing) = self.get_rate_on(&snapshot.base, &snapshot.quote, snapshot.date)? {
            return Ok(existing);
        }
        Ok(self.push(snapshot))
    }
}

struct ScriptedProvider {
    id: &'static str,
    priority: u8,
    rate: Option<Decimal>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedProvider {
    fn new(
        id: &'static str,
        priority: u8,
        rate: Option<Decimal>,
    ) -> (Arc<dyn RateProvider>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Arc::new(Self {
                id,
                priority,
                rate,
                calls: calls.clone(),
            }),
            calls,
        )
    }
}

#[async_trait]
impl RateProvider for ScriptedProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    async fn fetch_rate(
        &self,
        base: &str,
        quote: &str,
        _date: Option<NaiveDate>,
    ) -> std::result::Result<Decimal, RateProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.rate.ok_or_else(|| RateProviderError::MissingRate {
            provider: self.id,
            base: base.to_string(),
            quote: quote.to_string(),
        })
    }
}

struct MockCountries {
    currencies: Vec<String>,
}

#[async_trait]
impl CountryRepositoryTrait for MockCountries {
    fn distinct_default_currencies(&self) -> Result<Vec<String>> {
        Ok(self.currencies.clone())
    }

    fn get_country(&self, _id: i32) -> Result<Option<Country>> {
        Ok(None)
    }

    async fn add_country(&self, _new: NewCountry) -> Result<Country> {
        unreachable!("not exercised here")
    }
}

fn service(
    store: Arc<MockRateStore>,
    providers: Vec<Arc<dyn RateProvider>>,
    currencies: &[&str],
) -> FxService {
    FxService::new(
        store,
        ProviderChain::new(providers),
        Arc::new(MockCountries {
            currencies: currencies.iter().map(|c| c.to_string()).collect(),
        }),
    )
}

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn snapshot(base: &str, quote: &str, date: &str, rate: Decimal) -> NewExchangeRate {
    NewExchangeRate {
        base: base.to_string(),
        quote: quote.to_string(),
        date: day(date),
        rate,
        source: "exchangerate.host".to_string(),
    }
}

#[tokio::test]
async fn identity_rate_never_consults_providers() {
    let store = Arc::new(MockRateStore::new());
    let (provider, calls) = ScriptedProvider::new("first", 1, Some(dec!(2)));
    let svc = service(store.clone(), vec![provider], &[]);

    let rate = svc
        .resolve("krw", "KRW", Some(day("2025-11-01")), true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rate.rate, Decimal::ONE);
    assert_eq!(rate.source, SOURCE_IDENTITY);
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    // Get-or-create: a second resolve converges on the same row.
    let again = svc
        .resolve("KRW", "KRW", Some(day("2025-11-01")), true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.id, rate.id);
    assert_eq!(store.row_count(), 1);
}

#[tokio::test]
async fn stored_rate_short_circuits_fetching() {
    let store = MockRateStore::seeded(vec![snapshot("USD", "KRW", "2025-11-01", dec!(1391.25))]);
    let (provider, calls) = ScriptedProvider::new("first", 1, Some(dec!(9999)));
    let svc = service(store.clone(), vec![provider], &[]);

    let rate = svc
        .resolve("USD", "KRW", Some(day("2025-11-01")), true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rate.rate, dec!(1391.25));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.row_count(), 1);
}

#[tokio::test]
async fn exact_date_miss_does_not_fall_back_to_latest() {
    let store = MockRateStore::seeded(vec![snapshot("USD", "KRW", "2025-10-30", dec!(1388))]);
    let svc = service(store, vec![], &[]);

    let got = svc
        .resolve("USD", "KRW", Some(day("2025-11-01")), false)
        .await
        .unwrap();
    assert!(got.is_none());
}

#[tokio::test]
async fn dateless_resolve_serves_the_latest_snapshot() {
    let store = MockRateStore::seeded(vec![
        snapshot("USD", "KRW", "2025-10-30", dec!(1388)),
        snapshot("USD", "KRW", "2025-11-01", dec!(1391.25)),
    ]);
    let svc = service(store, vec![], &[]);

    let rate = svc.resolve("USD", "KRW", None, false).await.unwrap().unwrap();
    assert_eq!(rate.date, day("2025-11-01"));
}

#[tokio::test]
async fn fetched_rate_is_persisted_under_the_providers_id() {
    let store = Arc::new(MockRateStore::new());
    let (failing, _) = ScriptedProvider::new("first", 1, None);
    let (working, _) = ScriptedProvider::new("second", 2, Some(dec!(1593.4)));
    let svc = service(store.clone(), vec![failing, working], &[]);

    let rate = svc
        .resolve("CHF", "KRW", Some(day("2025-11-01")), true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(rate.rate, dec!(1593.4));
    assert_eq!(rate.source, "second");
    assert_eq!(store.row_count(), 1);

    // Next resolve hits the store, not the providers.
    let again = svc
        .resolve("CHF", "KRW", Some(day("2025-11-01")), true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.id, rate.id);
}

#[tokio::test]
async fn exhausted_chain_is_none_and_persists_nothing() {
    let store = Arc::new(MockRateStore::new());
    let (first, _) = ScriptedProvider::new("first", 1, None);
    let (second, _) = ScriptedProvider::new("second", 2, None);
    let svc = service(store.clone(), vec![first, second], &[]);

    let got = svc.resolve("USD", "KRW", None, true).await.unwrap();
    assert!(got.is_none());
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn disallowed_fetch_never_reaches_providers() {
    let store = Arc::new(MockRateStore::new());
    let (provider, calls) = ScriptedProvider::new("first", 1, Some(dec!(1391.25)));
    let svc = service(store.clone(), vec![provider], &[]);

    let got = svc.resolve("USD", "KRW", None, false).await.unwrap();
    assert!(got.is_none());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn invalid_currency_codes_are_rejected_before_io() {
    let store = Arc::new(MockRateStore::new());
    let (provider, calls) = ScriptedProvider::new("first", 1, Some(dec!(1)));
    let svc = service(store.clone(), vec![provider], &[]);

    assert!(svc.resolve("US", "KRW", None, true).await.is_err());
    assert!(svc.resolve("USD", "KR1", None, true).await.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn fetch_rates_derives_bases_from_country_currencies() {
    let store = Arc::new(MockRateStore::new());
    let (provider, _) = ScriptedProvider::new("first", 1, Some(dec!(100)));
    let svc = service(store.clone(), vec![provider], &["CHF", "JPY", "USD"]);

    let summary = svc
        .fetch_rates(Some(day("2025-11-01")), "KRW", None)
        .await
        .unwrap();
    assert_eq!(summary.succeeded, vec!["CHF", "JPY", "USD"]);
    assert!(summary.failed.is_empty());
    assert_eq!(store.row_count(), 3);
}

#[tokio::test]
async fn fetch_rates_cleans_explicit_bases_and_counts_failures() {
    let store = Arc::new(MockRateStore::new());
    let (provider, calls) = ScriptedProvider::new("first", 1, None);
    let svc = service(store.clone(), vec![provider], &[]);

    let summary = svc
        .fetch_rates(
            Some(day("2025-11-01")),
            "KRW",
            Some(vec![
                "usd".to_string(),
                " USD ".to_string(),
                "".to_string(),
                "CHF".to_string(),
            ]),
        )
        .await
        .unwrap();
    assert!(summary.succeeded.is_empty());
    assert_eq!(summary.failed, vec!["CHF", "USD"]);
    // One chain walk per deduplicated base.
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.row_count(), 0);
}

#[tokio::test]
async fn manual_rates_carry_the_manual_source() {
    let store = Arc::new(MockRateStore::new());
    let svc = service(store.clone(), vec![], &[]);

    let rate = svc
        .add_manual_rate("usd", "krw", Some(day("2025-11-01")), dec!(1400))
        .await
        .unwrap();
    assert_eq!(rate.base, "USD");
    assert_eq!(rate.quote, "KRW");
    assert_eq!(rate.source, super::fx_model::SOURCE_MANUAL);
    assert_eq!(store.row_count(), 1);
}

#[tokio::test]
async fn latest_rates_map_keeps_the_newest_row_per_base() {
    let store = MockRateStore::seeded(vec![
        snapshot("USD", "KRW", "2025-10-30", dec!(1388)),
        snapshot("USD", "KRW", "2025-11-01", dec!(1391.25)),
        snapshot("CHF", "KRW", "2025-10-31", dec!(1593.4)),
    ]);
    let svc = service(store, vec![], &[]);

    let map = svc.latest_rates_map("KRW", &[]).unwrap();
    assert_eq!(map.rates.len(), 2);
    assert_eq!(map.rates["USD"], dec!(1391.25));
    assert_eq!(map.rates["CHF"], dec!(1593.4));

    let filtered = svc
        .latest_rates_map("KRW", &["usd".to_string()])
        .unwrap();
    assert_eq!(filtered.rates.len(), 1);
    assert_eq!(filtered.rates["USD"], dec!(1391.25));
}

#[test]
fn cache_key_is_order_independent() {
    let store = MockRateStore::seeded(vec![
        snapshot("USD", "KRW", "2025-11-01", dec!(1391.25)),
        snapshot("EUR", "KRW", "2025-11-01", dec!(1510)),
    ]);
    let cache = LatestRatesCache::new(store.clone());

    let first = cache
        .latest_rates(&["USD".to_string(), "EUR".to_string()], "KRW")
        .unwrap();
    let second = cache
        .latest_rates(&["eur".to_string(), "usd".to_string()], "KRW")
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(store.row_queries.load(Ordering::SeqCst), 1);
}

#[test]
fn cache_expires_after_its_ttl() {
    let store = MockRateStore::seeded(vec![snapshot("USD", "KRW", "2025-11-01", dec!(1391.25))]);
    let cache = LatestRatesCache::with_ttl(store.clone(), Duration::ZERO);

    cache.latest_rates(&["USD".to_string()], "KRW").unwrap();
    cache.latest_rates(&["USD".to_string()], "KRW").unwrap();
    assert_eq!(store.row_queries.load(Ordering::SeqCst), 2);
}

#[test]
fn empty_base_set_skips_the_store() {
    let store = Arc::new(MockRateStore::new());
    let cache = LatestRatesCache::new(store.clone());

    let rates = cache.latest_rates(&[], "KRW").unwrap();
    assert!(rates.is_empty());
    assert_eq!(store.row_queries.load(Ordering::SeqCst), 0);
}

#[test]
fn cache_serves_the_newest_row_per_base() {
    let store = MockRateStore::seeded(vec![
        snapshot("USD", "KRW", "2025-10-30", dec!(1388)),
        snapshot("USD", "KRW", "2025-11-01", dec!(1391.25)),
    ]);
    let cache = LatestRatesCache::new(store);

    let rates = cache.latest_rates(&["USD".to_string()], "KRW").unwrap();
    assert_eq!(rates["USD"], dec!(1391.25));
}
