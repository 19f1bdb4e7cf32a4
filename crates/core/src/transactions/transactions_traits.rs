use async_trait::async_trait;

use super::transactions_model::{NewWatchTransaction, WatchTransaction};
use crate::errors::Result;

/// Trait defining the contract for transaction repository operations.
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    /// Newest-first page of transactions.
    fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<WatchTransaction>>;

    fn get_transaction(&self, id: i32) -> Result<Option<WatchTransaction>>;

    /// Validates the price shape and pins the currency from the country's
    /// default currency before inserting.
    async fn add_transaction(&self, new: NewWatchTransaction) -> Result<WatchTransaction>;
}
