//! Countries - collaborator surface for the rate subsystem.
//!
//! Transactions pin their currency from the country's default currency, and
//! the batch rate job derives its base set from the distinct values here.

mod countries_model;
mod countries_traits;

pub use countries_model::{Country, NewCountry};
pub use countries_traits::CountryRepositoryTrait;
