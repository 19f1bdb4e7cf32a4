//! SQLite persistence for the watch ledger, built on Diesel.
//!
//! This is the only crate that knows about Diesel or SQLite. Everything
//! above it works against the repository traits in `watchledger-core`, so
//! the storage backend can be swapped without touching the domain code.

pub mod db;
pub mod errors;
pub mod schema;

pub mod countries;
pub mod fx;
pub mod transactions;

pub use db::{create_pool, get_connection, run_migrations, DbConnection, DbPool};
pub use errors::{IntoCore, StorageError};

pub use countries::CountryRepository;
pub use fx::FxRepository;
pub use transactions::TransactionRepository;
