/// Quote currency used when a caller does not specify one.
pub const DEFAULT_QUOTE_CURRENCY: &str = "KRW";

/// Time-to-live for the latest-rates cache, in seconds.
pub const LATEST_RATES_TTL_SECS: u64 = 300;

/// Decimal places for converted price fields.
pub const CONVERTED_PRICE_SCALE: u32 = 2;
