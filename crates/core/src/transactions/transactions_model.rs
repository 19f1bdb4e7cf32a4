use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ValidationError};
use crate::utils::decimal_serde::opt_decimal_string;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Sell,
    Buy,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Sell => "sell",
            TransactionType::Buy => "buy",
        }
    }
}

/// A buy/sell market transaction for a watch, recorded per country.
///
/// `currency` is pinned from the country's default currency at write time and
/// never independently editable. Exactly one price representation is non-null:
/// `price` for sells, `price_min`/`price_max` for buys.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WatchTransaction {
    pub id: i32,
    pub transaction_type: TransactionType,
    pub year: i32,
    pub country_id: i32,
    pub currency: String,
    #[serde(default, with = "opt_decimal_string")]
    pub price: Option<Decimal>,
    #[serde(default, with = "opt_decimal_string")]
    pub price_min: Option<Decimal>,
    #[serde(default, with = "opt_decimal_string")]
    pub price_max: Option<Decimal>,
    pub note: Option<String>,
    pub url: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct NewWatchTransaction {
    pub transaction_type: TransactionType,
    pub year: i32,
    pub country_id: i32,
    #[serde(default, with = "opt_decimal_string")]
    pub price: Option<Decimal>,
    #[serde(default, with = "opt_decimal_string")]
    pub price_min: Option<Decimal>,
    #[serde(default, with = "opt_decimal_string")]
    pub price_max: Option<Decimal>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl NewWatchTransaction {
    /// Enforces the price-shape invariant and clears the unused side.
    ///
    /// Sells require `price`; buys require `price_min <= price_max`.
    pub fn normalized(mut self) -> Result<Self> {
        match self.transaction_type {
            TransactionType::Sell => {
                if self.price.is_none() {
                    return Err(ValidationError::MissingField("price".to_string()).into());
                }
                self.price_min = None;
                self.price_max = None;
            }
            TransactionType::Buy => {
                let (min, max) = match (self.price_min, self.price_max) {
                    (Some(min), Some(max)) => (min, max),
                    _ => {
                        return Err(ValidationError::MissingField(
                            "price_min/price_max".to_string(),
                        )
                        .into())
                    }
                };
                if min > max {
                    return Err(ValidationError::InvalidInput(
                        "price_max must be greater than or equal to price_min".to_string(),
                    )
                    .into());
                }
                self.price = None;
            }
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn buy(min: Option<Decimal>, max: Option<Decimal>) -> NewWatchTransaction {
        NewWatchTransaction {
            transaction_type: TransactionType::Buy,
            year: 2025,
            country_id: 1,
            price: None,
            price_min: min,
            price_max: max,
            note: None,
            url: None,
        }
    }

    #[test]
    fn sell_requires_price_and_clears_range() {
        let tx = NewWatchTransaction {
            transaction_type: TransactionType::Sell,
            year: 2025,
            country_id: 1,
            price: Some(dec!(100)),
            price_min: Some(dec!(1)),
            price_max: Some(dec!(2)),
            note: None,
            url: None,
        };
        let normalized = tx.normalized().unwrap();
        assert_eq!(normalized.price, Some(dec!(100)));
        assert!(normalized.price_min.is_none());
        assert!(normalized.price_max.is_none());
    }

    #[test]
    fn buy_requires_ordered_range() {
        assert!(buy(Some(dec!(100)), Some(dec!(200))).normalized().is_ok());
        assert!(buy(Some(dec!(200)), Some(dec!(100))).normalized().is_err());
        assert!(buy(Some(dec!(100)), None).normalized().is_err());
    }
}
