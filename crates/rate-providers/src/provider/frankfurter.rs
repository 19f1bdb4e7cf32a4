//! frankfurter.app client (ECB reference rates).
//!
//! - Latest: `https://api.frankfurter.app/latest?from={base}&to={quote}`
//! - Historical: `https://api.frankfurter.app/{yyyy-mm-dd}?from={base}&to={quote}`

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::RateProviderError;
use crate::provider::RateProvider;

const BASE_URL: &str = "https://api.frankfurter.app";
const PROVIDER_ID: &str = "frankfurter.app";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct FrankfurterResponse {
    #[serde(default)]
    rates: HashMap<String, Decimal>,
}

pub struct FrankfurterProvider {
    client: Client,
}

impl FrankfurterProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for FrankfurterProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for FrankfurterProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        2
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
        let url = format!("{}/{}?from={}&to={}", BASE_URL, path, base, quote);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateProviderError::from_reqwest(PROVIDER_ID, e))?;
        if !response.status().is_success() {
            // Frankfurter answers 404 for currencies outside the ECB set.
            return Err(RateProviderError::Status {
                provider: PROVIDER_ID,
                status: response.status().as_u16(),
            });
        }

        let body: FrankfurterResponse = response
            .json()
            .await
            .map_err(|e| RateProviderError::from_reqwest(PROVIDER_ID, e))?;
        extract_rate(&body, base, quote)
    }
}

fn extract_rate(
    body: &FrankfurterResponse,
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
        let body: FrankfurterResponse = serde_json::from_str(
            r#"{"amount":1.0,"base":"CHF","date":"2025-10-31","rates":{"KRW":1593.4}}"#,
        )
        .unwrap();
        assert_eq!(extract_rate(&body, "CHF", "KRW").unwrap(), dec!(1593.4));
    }

    #[test]
    fn missing_symbol_is_missing_rate() {
        let body: FrankfurterResponse =
            serde_json::from_str(r#"{"amount":1.0,"base":"CHF","rates":{}}"#).unwrap();
        assert!(matches!(
            extract_rate(&body, "CHF", "KRW"),
            Err(RateProviderError::MissingRate { .. })
        ));
    }
}
