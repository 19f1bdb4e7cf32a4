mod model;
mod repository;

pub use model::{NewWatchTransactionDB, WatchTransactionDB};
pub use repository::TransactionRepository;
