//! exchangerate.host client.
//!
//! - Latest: `https://api.exchangerate.host/latest?base={base}&symbols={quote}`
//! - Historical: `https://api.exchangerate.host/{yyyy-mm-dd}?base={base}&symbols={quote}`
//!
//! Responses carry a `rates` object keyed by currency code.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::RateProviderError;
use crate::provider::RateProvider;

const BASE_URL: &str = "https://api.exchangerate.host";
const PROVIDER_ID: &str = "exchangerate.host";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct RatesResponse {
    #[serde(default)]
    rates: HashMap<String, Decimal>,
}

pub struct ExchangeRateHostProvider {
    client: Client,
}

impl ExchangeRateHostProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for ExchangeRateHostProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for ExchangeRateHostProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        1
    }

    async fn fetch_rate(
        &self,
        base: &str,
        quote: &str,
        date: Option<NaiveDate>,
    ) -> Result<Decimal, RateProviderError> {
        let path = match date {
            Some(d) => d.format("%Y-%m-%d").to_string(),
            None => "latest".to_string(),
        };
        let url = format!("{}/{}?base={}&symbols={}", BASE_URL, path, base, quote);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateProviderError::from_reqwest(PROVIDER_ID, e))?;
        if !response.status().is_success() {
            return Err(RateProviderError::Status {
                provider: PROVIDER_ID,
                status: response.status().as_u16(),
            });
        }

        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| RateProviderError::from_reqwest(PROVIDER_ID, e))?;
        extract_rate(&body, base, quote)
    }
}

fn extract_rate(
    body: &RatesResponse,
    base: &str,
    quote: &str,
) -> Result<Decimal, RateProviderError> {
    body.rates
        .get(quote)
        .copied()
        .ok_or_else(|| RateProviderError::MissingRate {
            provider: PROVIDER_ID,
            base: base.to_string(),
            quote: quote.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn parses_rates_payload() {
        let body: RatesResponse = serde_json::from_str(
            r#"{"base":"USD","date":"2025-11-01","rates":{"KRW":1391.25,"EUR":0.92}}"#,
        )
        .unwrap();
        assert_eq!(extract_rate(&body, "USD", "KRW").unwrap(), dec!(1391.25));
    }

    #[test]
    fn missing_symbol_is_missing_rate() {
        let body: RatesResponse =
            serde_json::from_str(r#"{"base":"USD","rates":{"EUR":0.92}}"#).unwrap();
        assert!(matches!(
            extract_rate(&body, "USD", "KRW"),
            Err(RateProviderError::MissingRate { .. })
        ));
    }

    #[test]
    fn empty_payload_is_missing_rate() {
        let body: RatesResponse = serde_json::from_str(r#"{"base":"USD"}"#).unwrap();
        assert!(matches!(
            extract_rate(&body, "USD", "KRW"),
            Err(RateProviderError::MissingRate { .. })
        ));
    }
}
