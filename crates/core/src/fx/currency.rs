//! Currency code normalization.

use super::fx_errors::FxError;

/// Uppercases a currency code and validates it against the 3-letter shape.
///
/// Rejects empty or malformed codes before any I/O happens; every public
/// entry point that accepts a currency code goes through this.
pub fn normalize_currency_code(code: &str) -> Result<String, FxError> {
    let trimmed = code.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(FxError::InvalidCurrencyCode(code.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}
