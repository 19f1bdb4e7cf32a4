//! Read-time currency decoration for serialized transaction records.
//!
//! Operates on already-serialized JSON items so the web layer can run its
//! pagination and serialization first, then hand the page here. Without a
//! target currency the page passes through untouched, with no keys added.

use std::collections::HashMap;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Map, Value};

use crate::constants::CONVERTED_PRICE_SCALE;
use crate::errors::Result;
use crate::fx::LatestRatesCache;
use crate::transactions::TransactionType;

/// Decorates a page of serialized transactions with converted price fields.
///
/// Collects the distinct record currencies that differ from `quote`, loads
/// the latest rate per currency through the cache in one batch, and injects
/// `price_converted` (sell) or `price_min_converted`/`price_max_converted`
/// (buy) plus `convert_quote` and `applied_rate` into every record. A record
/// whose rate is unavailable gets explicit nulls, never a wrong number.
///
/// A page where every record is already in the quote currency is returned
/// unmodified.
pub fn decorate_page(items: &mut [Value], quote: &str, cache: &LatestRatesCache) -> Result<()> {
    let quote = quote.trim().to_ascii_uppercase();
    if quote.is_empty() {
        return Ok(());
    }

    let mut bases: Vec<String> = Vec::new();
    for item in items.iter() {
        if let Some(currency) = item_currency(item) {
            if currency != quote && !bases.contains(&currency) {
                bases.push(currency);
            }
        }
    }
    if bases.is_empty() {
        return Ok(());
    }

    let rates = cache.latest_rates(&bases, &quote)?;
    for item in items.iter_mut() {
        decorate_item(item, &quote, &rates);
    }
    Ok(())
}

/// Single-record variant of [`decorate_page`].
pub fn decorate_record(item: &mut Value, quote: &str, cache: &LatestRatesCache) -> Result<()> {
    decorate_page(std::slice::from_mut(item), quote, cache)
}

fn item_currency(item: &Value) -> Option<String> {
    let currency = item.get("currency")?.as_str()?.trim().to_ascii_uppercase();
    if currency.is_empty() {
        None
    } else {
        Some(currency)
    }
}

fn decorate_item(item: &mut Value, quote: &str, rates: &HashMap<String, Decimal>) {
    let Some(obj) = item.as_object_mut() else {
        return;
    };

    let currency = obj
        .get("currency")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_ascii_uppercase();
    let rate = if currency == quote {
        Some(Decimal::ONE)
    } else {
        rates.get(&currency).copied()
    };

    let is_sell = obj.get("transaction_type").and_then(Value::as_str)
        == Some(TransactionType::Sell.as_str());
    if is_sell {
        let converted = rate.and_then(|r| convert_field(obj, "price", r));
        insert_converted(obj, "price_converted", converted);
    } else {
        // Min and max convert independently; a derived midpoint would hide
        // the spread.
        let min = rate.and_then(|r| convert_field(obj, "price_min", r));
        let max = rate.and_then(|r| convert_field(obj, "price_max", r));
        insert_converted(obj, "price_min_converted", min);
        insert_converted(obj, "price_max_converted", max);
    }

    obj.insert("convert_quote".to_string(), Value::String(quote.to_string()));
    obj.insert(
        "applied_rate".to_string(),
        match rate {
            Some(r) => Value::String(r.to_string()),
            None => Value::Null,
        },
    );
}

/// Multiplies a stored price field by `rate` and rounds half-up to two
/// decimal places. Any malformed value or arithmetic overflow yields `None`
/// so one bad record cannot fail the page.
fn convert_field(obj: &Map<String, Value>, field: &str, rate: Decimal) -> Option<Decimal> {
    let amount = decimal_from_json(obj.get(field)?)?;
    amount.checked_mul(rate).map(|product| {
        product.round_dp_with_strategy(CONVERTED_PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero)
    })
}

fn insert_converted(obj: &mut Map<String, Value>, field: &str, value: Option<Decimal>) {
    obj.insert(
        field.to_string(),
        match value {
            Some(d) => Value::String(format!("{:.1$}", d, CONVERTED_PRICE_SCALE as usize)),
            None => Value::Null,
        },
    );
}

fn decimal_from_json(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}
