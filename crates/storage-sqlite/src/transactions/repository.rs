use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use watchledger_core::errors::{Error, ValidationError};
use watchledger_core::transactions::{
    NewWatchTransaction, TransactionRepositoryTrait, WatchTransaction,
};
use watchledger_core::Result;

use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::{countries, watch_transactions};

#[derive(Clone)]
pub struct TransactionRepository {
    pool: Arc<DbPool>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<WatchTransaction>> {
        let mut conn = get_connection(&self.pool)?;

        let rows = watch_transactions::table
            .order((
                watch_transactions::created_at.desc(),
                watch_transactions::id.desc(),
            ))
            .limit(limit)
            .offset(offset)
            .load::<super::WatchTransactionDB>(&mut conn)
            .map_err(StorageError::from)?;

        rows.into_iter().map(WatchTransaction::try_from).collect()
    }

    fn get_transaction(&self, id: i32) -> Result<Option<WatchTransaction>> {
        let mut conn = get_connection(&self.pool)?;

        let row = watch_transactions::table
            .find(id)
            .first::<super::WatchTransactionDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        row.map(WatchTransaction::try_from).transpose()
    }

    /// Validates the price shape, pins the currency from the country's
    /// default currency, then inserts. A country without a default currency
    /// cannot carry transactions.
    async fn add_transaction(&self, new: NewWatchTransaction) -> Result<WatchTransaction> {
        let new = new.normalized()?;

        let currency = {
            let mut conn = get_connection(&self.pool)?;
            let currency: Option<Option<String>> = countries::table
                .find(new.country_id)
                .select(countries::default_currency)
                .first(&mut conn)
                .optional()
                .map_err(StorageError::from)?;
            let currency = currency.ok_or_else(|| {
                Error::from(ValidationError::InvalidInput(format!(
                    "unknown country id: {}",
                    new.country_id
                )))
            })?;
            currency.filter(|c| !c.is_empty()).ok_or_else(|| {
                Error::from(ValidationError::InvalidInput(format!(
                    "country {} has no default currency",
                    new.country_id
                )))
            })?
        };

        let pool = self.pool.clone();
        let row = super::NewWatchTransactionDB::from_validated(new, currency);

        let db_row = tokio::task::spawn_blocking(
            move || -> std::result::Result<super::WatchTransactionDB, StorageError> {
                let mut conn = pool.get().map_err(StorageError::from)?;
                diesel::insert_into(watch_transactions::table)
                    .values(&row)
                    .get_result::<super::WatchTransactionDB>(&mut conn)
                    .map_err(StorageError::from)
            },
        )
        .await
        .map_err(|e| Error::Unexpected(e.to_string()))??;

        WatchTransaction::try_from(db_row)
    }
}
