//! FX (Foreign Exchange) module - rate snapshots, resolution, and caching.

pub mod currency;
mod fx_errors;
mod fx_model;
mod fx_service;
#[cfg(test)]
mod fx_service_tests;
mod fx_store;
mod latest_rates;

pub use currency::normalize_currency_code;
pub use fx_errors::FxError;
pub use fx_model::{ExchangeRate, NewExchangeRate, SOURCE_IDENTITY, SOURCE_MANUAL};
pub use fx_service::{FetchRatesSummary, FxService, LatestRatesMap};
pub use fx_store::{RateRow, RateStore};
pub use latest_rates::LatestRatesCache;
