mod model;
mod repository;

pub use model::{ExchangeRateDB, NewExchangeRateDB};
pub use repository::FxRepository;
