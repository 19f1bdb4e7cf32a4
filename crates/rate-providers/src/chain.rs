//! Priority-ordered fallback over the configured providers.

use std::sync::Arc;

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;

use crate::provider::{
    ExchangeRateHostProvider, FrankfurterProvider, OpenErApiProvider, RateProvider,
};

/// A rate together with the id of the provider that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRate {
    pub provider: &'static str,
    pub rate: Decimal,
}

/// Tries providers in ascending priority until one answers.
///
/// Any error from a provider, including timeouts and malformed bodies, is
/// logged and skipped. Exhausting the chain is not an error; the caller
/// decides what an unavailable rate means.
pub struct ProviderChain {
    providers: Vec<Arc<dyn RateProvider>>,
}

impl ProviderChain {
    pub fn new(mut providers: Vec<Arc<dyn RateProvider>>) -> Self {
        providers.sort_by_key(|p| p.priority());
        Self { providers }
    }

    /// The standard chain: exchangerate.host, then frankfurter.app, then
    /// open.er-api.com.
    pub fn default_chain() -> Self {
        Self::new(vec![
            Arc::new(ExchangeRateHostProvider::new()),
            Arc::new(FrankfurterProvider::new()),
            Arc::new(OpenErApiProvider::new()),
        ])
    }

    pub fn provider_ids(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.id()).collect()
    }

    /// First successful rate for `(base, quote, date)`, or `None` when every
    /// provider failed.
    pub async fn fetch_first(
        &self,
        base: &str,
        quote: &str,
        date: Option<NaiveDate>,
    ) -> Option<ProviderRate> {
        for provider in &self.providers {
            match provider.fetch_rate(base, quote, date).await {
                Ok(rate) => {
                    debug!("{} supplied {}/{} = {}", provider.id(), base, quote, rate);
                    return Some(ProviderRate {
                        provider: provider.id(),
                        rate,
                    });
                }
                Err(e) => {
                    warn!("skipping {}: {}", provider.id(), e);
                }
            }
        }
        None
    }
}
