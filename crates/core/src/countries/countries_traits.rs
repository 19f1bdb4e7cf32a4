use async_trait::async_trait;

use super::countries_model::{Country, NewCountry};
use crate::errors::Result;

/// Trait defining the contract for country repository operations.
#[async_trait]
pub trait CountryRepositoryTrait: Send + Sync {
    /// Distinct non-empty default currencies across all countries,
    /// uppercased, sorted, and deduplicated.
    fn distinct_default_currencies(&self) -> Result<Vec<String>>;

    fn get_country(&self, id: i32) -> Result<Option<Country>>;

    async fn add_country(&self, new: NewCountry) -> Result<Country>;
}
