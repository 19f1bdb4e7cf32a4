//! Serde helpers for decimal fields crossing the API boundary.
//!
//! Monetary values are serialized as decimal strings, never binary floats.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serializer};
use std::str::FromStr;

/// For `Option<Decimal>` fields serialized as `"1234.56"` or `null`.
/// Use with `#[serde(with = "crate::utils::decimal_serde::opt_decimal_string")]`.
pub mod opt_decimal_string {
    use super::*;

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => serializer.serialize_str(&d.to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accept a string, a JSON number, or null.
        let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
        match raw {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(s)) => Decimal::from_str(&s)
                .map(Some)
                .map_err(serde::de::Error::custom),
            Some(serde_json::Value::Number(n)) => Decimal::from_str(&n.to_string())
                .map(Some)
                .map_err(serde::de::Error::custom),
            Some(other) => Err(serde::de::Error::custom(format!(
                "expected decimal string or number, got {}",
                other
            ))),
        }
    }
}
