use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;

use watchledger_core::countries::{Country, CountryRepositoryTrait, NewCountry};
use watchledger_core::errors::Error;
use watchledger_core::Result;

use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::countries;

#[derive(Clone)]
pub struct CountryRepository {
    pool: Arc<DbPool>,
}

impl CountryRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CountryRepositoryTrait for CountryRepository {
    /// Distinct non-empty default currencies, uppercased and sorted. This
    /// is the base set for the batch rate job.
    fn distinct_default_currencies(&self) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;

        let raw: Vec<Option<String>> = countries::table
            .select(countries::default_currency)
            .filter(countries::default_currency.is_not_null())
            .filter(countries::default_currency.ne(""))
            .distinct()
            .load(&mut conn)
            .map_err(StorageError::from)?;

        let mut currencies: Vec<String> = raw
            .into_iter()
            .flatten()
            .map(|c| c.trim().to_ascii_uppercase())
            .filter(|c| !c.is_empty())
            .collect();
        currencies.sort();
        currencies.dedup();
        Ok(currencies)
    }

    fn get_country(&self, id: i32) -> Result<Option<Country>> {
        let mut conn = get_connection(&self.pool)?;

        let row = countries::table
            .find(id)
            .first::<super::CountryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;

        Ok(row.map(Country::from))
    }

    async fn add_country(&self, new: NewCountry) -> Result<Country> {
        let pool = self.pool.clone();
        let row = super::NewCountryDB::from(new);

        let db_row = tokio::task::spawn_blocking(
            move || -> std::result::Result<super::CountryDB, StorageError> {
                let mut conn = pool.get().map_err(StorageError::from)?;
                diesel::insert_into(countries::table)
                    .values(&row)
                    .get_result::<super::CountryDB>(&mut conn)
                    .map_err(StorageError::from)
            },
        )
        .await
        .map_err(|e| Error::Unexpected(e.to_string()))??;

        Ok(Country::from(db_row))
    }
}
