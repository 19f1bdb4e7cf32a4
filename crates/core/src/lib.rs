//! Watchledger Core - Domain entities, services, and traits.
//!
//! This crate contains the business logic for the watch catalog and
//! transaction ledger. It is database-agnostic: storage traits defined
//! here are implemented by the `storage-sqlite` crate, and external rate
//! sources live in the `rate-providers` crate.

pub mod constants;
pub mod countries;
pub mod errors;
pub mod fx;
pub mod transactions;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
