//! Individual provider clients.

mod exchangerate_host;
mod frankfurter;
mod open_er_api;
mod traits;

pub use exchangerate_host::ExchangeRateHostProvider;
pub use frankfurter::FrankfurterProvider;
pub use open_er_api::OpenErApiProvider;
pub use traits::RateProvider;
