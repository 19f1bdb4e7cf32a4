use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use rust_decimal::Decimal;

use watchledger_core::errors::{Error, ValidationError};
use watchledger_core::fx::{ExchangeRate, NewExchangeRate, RateRow, RateStore};
use watchledger_core::Result;

use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::exchange_rates;

/// SQLite-backed [`RateStore`].
#[derive(Clone)]
pub struct FxRepository {
    pool: Arc<DbPool>,
}

impl FxRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RateStore for FxRepository {
    fn get_rate_on(&self, base: &str, quote: &str, date: NaiveDate) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;

        let row = exchange_rates::table
            .filter(exchange_rates::base.eq(base))
            .filter(exchange_rates::quote.eq(quote))
            .filter(exchange_rates::date.eq(date))
            .first::<super::ExchangeRateDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(ExchangeRate::try_from).transpose()
    }

    fn get_latest_rate(&self, base: &str, quote: &str) -> Result<Option<ExchangeRate>> {
        let mut conn = get_connection(&self.pool)?;

        let row = exchange_rates::table
            .filter(exchange_rates::base.eq(base))
            .filter(exchange_rates::quote.eq(quote))
            .order((exchange_rates::date.desc(), exchange_rates::id.desc()))
            .first::<super::ExchangeRateDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(ExchangeRate::try_from).transpose()
    }

    fn latest_rate_rows(&self, quote: &str, bases: Option<&[String]>) -> Result<Vec<RateRow>> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = exchange_rates::table
            .filter(exchange_rates::quote.eq(quote))
            .into_boxed();
        if let Some(bases) = bases {
            query = query.filter(exchange_rates::base.eq_any(bases));
        }

        // Callers rely on this ordering to take the first row per base as
        // the most recent snapshot.
        let rows = query
            .select((exchange_rates::base, exchange_rates::rate))
            .order((
                exchange_rates::base.asc(),
                exchange_rates::date.desc(),
                exchange_rates::id.desc(),
            ))
            .load::<(String, String)>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter()
            .map(|(base, rate)| {
                let rate = Decimal::from_str(&rate).map_err(ValidationError::from)?;
                Ok(RateRow { base, rate })
            })
            .collect()
    }

    /// Insert-or-ignore on the `(base, quote, date)` unique constraint, then
    /// re-read inside the same transaction. Concurrent resolvers racing on
    /// the same triple all converge on whichever row landed first.
    async fn insert_snapshot(&self, snapshot: NewExchangeRate) -> Result<ExchangeRate> {
        let pool = self.pool.clone();
        let row = super::NewExchangeRateDB::from(snapshot);

        let db_row = tokio::task::spawn_blocking(
            move || -> std::result::Result<super::ExchangeRateDB, StorageError> {
                let mut conn = pool.get().map_err(StorageError::from)?;
                conn.immediate_transaction(|conn| {
                    diesel::insert_into(exchange_rates::table)
                        .values(&row)
                        .on_conflict((
                            exchange_rates::base,
                            exchange_rates::quote,
                            exchange_rates::date,
                        ))
                        .do_nothing()
                        .execute(conn)?;

                    exchange_rates::table
                        .filter(exchange_rates::base.eq(&row.base))
                        .filter(exchange_rates::quote.eq(&row.quote))
                        .filter(exchange_rates::date.eq(row.date))
                        .first::<super::ExchangeRateDB>(conn)
                        .map_err(StorageError::from)
                })
            },
        )
        .await
        .map_err(|e| Error::Unexpected(e.to_string()))??;

        ExchangeRate::try_from(db_row)
    }
}
