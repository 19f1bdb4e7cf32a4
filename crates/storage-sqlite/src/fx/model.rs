use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use watchledger_core::errors::{Error, ValidationError};
use watchledger_core::fx::{ExchangeRate, NewExchangeRate};

use crate::schema::exchange_rates;

/// Database row for an exchange-rate snapshot. The rate lives as decimal
/// text in SQLite and is parsed on the way out.
#[derive(Queryable, Identifiable, Debug, Clone)]
#[diesel(table_name = exchange_rates)]
pub struct ExchangeRateDB {
    pub id: i32,
    pub base: String,
    pub quote: String,
    pub date: NaiveDate,
    pub rate: String,
    pub source: String,
    pub created_at: NaiveDateTime,
}

impl TryFrom<ExchangeRateDB> for ExchangeRate {
    type Error = Error;

    fn try_from(db: ExchangeRateDB) -> Result<Self, Self::Error> {
        let rate = Decimal::from_str(&db.rate).map_err(ValidationError::from)?;
        Ok(ExchangeRate {
            id: db.id,
            base: db.base,
            quote: db.quote,
            date: db.date,
            rate,
            source: db.source,
            created_at: db.created_at,
        })
    }
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = exchange_rates)]
pub struct NewExchangeRateDB {
    pub base: String,
    pub quote: String,
    pub date: NaiveDate,
    pub rate: String,
    pub source: String,
    pub created_at: NaiveDateTime,
}

impl From<NewExchangeRate> for NewExchangeRateDB {
    fn from(new: NewExchangeRate) -> Self {
        Self {
            base: new.base,
            quote: new.quote,
            date: new.date,
            rate: new.rate.to_string(),
            source: new.source,
            created_at: Utc::now().naive_utc(),
        }
    }
}
