//! open.er-api.com client.
//!
//! Single endpoint: `https://open.er-api.com/v6/latest/{base}`. The free
//! tier serves latest rates only, so a requested historical date is ignored
//! and the freshest published table is returned instead.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::errors::RateProviderError;
use crate::provider::RateProvider;

const BASE_URL: &str = "https://open.er-api.com/v6/latest";
const PROVIDER_ID: &str = "open.er-api.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct OpenErApiResponse {
    /// "success" or "error".
    result: String,
    #[serde(default)]
    rates: HashMap<String, Decimal>,
}

pub struct OpenErApiProvider {
    client: Client,
}

impl OpenErApiProvider {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { client }
    }
}

impl Default for OpenErApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateProvider for OpenErApiProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        3
    }

    fn supports_historical(&self) -> bool {
        false
    }

    async fn fetch_rate(
        &self,
        base: &str,
        quote: &str,
        _date: Option<NaiveDate>,
    ) -> Result<Decimal, RateProviderError> {
        let url = format!("{}/{}", BASE_URL, base);

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

        let body: OpenErApiResponse = response
            .json()
            .await
            .map_err(|e| RateProviderError::from_reqwest(PROVIDER_ID, e))?;
        extract_rate(&body, base, quote)
    }
}

fn extract_rate(
    body: &OpenErApiResponse,
    base: &str,
    quote: &str,
) -> Result<Decimal, RateProviderError> {
    if body.result != "success" {
        return Err(RateProviderError::MalformedResponse {
            provider: PROVIDER_ID,
            message: format!("result = {:?}", body.result),
        });
    }
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
    fn parses_success_payload() {
        let body: OpenErApiResponse = serde_json::from_str(
            r#"{"result":"success","base_code":"JPY","rates":{"KRW":9.12,"USD":0.0066}}"#,
        )
        .unwrap();
        assert_eq!(extract_rate(&body, "JPY", "KRW").unwrap(), dec!(9.12));
    }

    #[test]
    fn error_result_is_rejected() {
        let body: OpenErApiResponse =
            serde_json::from_str(r#"{"result":"error","error-type":"unsupported-code"}"#).unwrap();
        assert!(matches!(
            extract_rate(&body, "XXX", "KRW"),
            Err(RateProviderError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn missing_symbol_is_missing_rate() {
        let body: OpenErApiResponse =
            serde_json::from_str(r#"{"result":"success","rates":{"USD":0.0066}}"#).unwrap();
        assert!(matches!(
            extract_rate(&body, "JPY", "KRW"),
            Err(RateProviderError::MissingRate { .. })
        ));
    }
}
