use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use watchledger_core::errors::{Error, ValidationError};
use watchledger_core::transactions::{NewWatchTransaction, TransactionType, WatchTransaction};

use crate::schema::watch_transactions;

#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = watch_transactions)]
pub struct WatchTransactionDB {
    pub id: i32,
    pub transaction_type: String,
    pub year: i32,
    pub country_id: i32,
    pub currency: String,
    pub price: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub note: Option<String>,
    pub url: Option<String>,
    pub created_at: NaiveDateTime,
}

fn parse_price(value: Option<String>) -> Result<Option<Decimal>, Error> {
    value
        .map(|v| Decimal::from_str(&v).map_err(ValidationError::from))
        .transpose()
        .map_err(Error::from)
}

impl TryFrom<WatchTransactionDB> for WatchTransaction {
    type Error = Error;

    fn try_from(db: WatchTransactionDB) -> Result<Self, Self::Error> {
        let transaction_type = match db.transaction_type.as_str() {
            "sell" => TransactionType::Sell,
            "buy" => TransactionType::Buy,
            other => {
                return Err(ValidationError::InvalidInput(format!(
                    "unknown transaction type: {}",
                    other
                ))
                .into())
            }
        };
        Ok(WatchTransaction {
            id: db.id,
            transaction_type,
            year: db.year,
            country_id: db.country_id,
            currency: db.currency,
            price: parse_price(db.price)?,
            price_min: parse_price(db.price_min)?,
            price_max: parse_price(db.price_max)?,
            note: db.note,
            url: db.url,
            created_at: db.created_at,
        })
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = watch_transactions)]
pub struct NewWatchTransactionDB {
    pub transaction_type: String,
    pub year: i32,
    pub country_id: i32,
    pub currency: String,
    pub price: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub note: Option<String>,
    pub url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl NewWatchTransactionDB {
    /// Builds the row from an already-validated transaction, pinning the
    /// currency supplied by the country lookup.
    pub fn from_validated(new: NewWatchTransaction, currency: String) -> Self {
        Self {
            transaction_type: new.transaction_type.as_str().to_string(),
            year: new.year,
            country_id: new.country_id,
            currency,
            price: new.price.map(|p| p.to_string()),
            price_min: new.price_min.map(|p| p.to_string()),
            price_max: new.price_max.map(|p| p.to_string()),
            note: new.note,
            url: new.url,
            created_at: Utc::now().naive_utc(),
        }
    }
}
