use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("Exchange rate not found: {0}")]
    RateNotFound(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Currency conversion error: {0}")]
    ConversionError(String),
}
