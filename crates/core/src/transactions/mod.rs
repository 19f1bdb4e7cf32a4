//! Market transactions and read-time currency decoration.

mod converter;
mod transactions_model;
mod transactions_traits;

pub use converter::{decorate_page, decorate_record};
pub use transactions_model::{NewWatchTransaction, TransactionType, WatchTransaction};
pub use transactions_traits::TransactionRepositoryTrait;
