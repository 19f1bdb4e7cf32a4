use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

/// Source tag for the trivial 1.0 rate when base equals quote.
pub const SOURCE_IDENTITY: &str = "identity";
/// Source tag for administratively entered rates.
pub const SOURCE_MANUAL: &str = "manual";

/// One immutable `(base, quote, date) -> rate` snapshot.
///
/// `1 base = rate quote`. At most one row exists per triple; rows are never
/// updated or deleted by normal operation. The rate is serialized as a
/// decimal string to preserve precision across the API boundary.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    pub id: i32,
    pub base: String,
    pub quote: String,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_rate")]
    pub rate: Decimal,
    pub source: String,
    pub created_at: NaiveDateTime,
}

/// A snapshot about to be persisted (no row id yet).
#[derive(Debug, Clone)]
pub struct NewExchangeRate {
    pub base: String,
    pub quote: String,
    pub date: NaiveDate,
    pub rate: Decimal,
    pub source: String,
}

impl NewExchangeRate {
    /// The identity snapshot for a currency against itself.
    pub fn identity(code: &str, date: NaiveDate) -> Self {
        Self {
            base: code.to_string(),
            quote: code.to_string(),
            date,
            rate: Decimal::ONE,
            source: SOURCE_IDENTITY.to_string(),
        }
    }
}

fn serialize_rate<S>(rate: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&rate.to_string())
}
