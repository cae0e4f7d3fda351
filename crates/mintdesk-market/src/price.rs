use ethers::types::U256;

use crate::error::MarketError;

const ETHER_DECIMALS: usize = 18;

/// Convert a decimal ether amount to wei without going through floating point.
///
/// Accepts plain decimal notation only (`"1"`, `"0.05"`, `".5"`); at most 18
/// fractional digits. Zero is rejected since a free listing is never intended.
pub fn parse_price(value: &str) -> Result<U256, MarketError> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(MarketError::price(value, "price is empty"));
  }

  let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
  if whole.is_empty() && fraction.is_empty() {
    return Err(MarketError::price(value, "not a decimal number"));
  }
  if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
    return Err(MarketError::price(value, "not a decimal number"));
  }
  if fraction.len() > ETHER_DECIMALS {
    return Err(MarketError::price(
      value,
      format!("more than {ETHER_DECIMALS} decimal places"),
    ));
  }

  let whole = if whole.is_empty() { "0" } else { whole };
  let digits = format!("{whole}{fraction:0<width$}", width = ETHER_DECIMALS);
  let wei = U256::from_dec_str(&digits).map_err(|e| MarketError::price(value, e.to_string()))?;

  if wei.is_zero() {
    return Err(MarketError::price(value, "price must be greater than zero"));
  }
  Ok(wei)
}
