// storefront/src/checkout/summary.rs

use crate::errors::{AppError, Result};
use crate::models::OrderLineItem;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Totals shown under the line items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
  pub total_quantity: u64,
  pub total_price: Decimal,
}

impl OrderSummary {
  pub fn from_line_items(items: &[OrderLineItem]) -> Self {
    items.iter().fold(Self::default(), |acc, item| Self {
      total_quantity: acc.total_quantity + u64::from(item.quantity()),
      total_price: acc.total_price + item.subtotal(),
    })
  }
}

/// How monetary amounts are displayed for the store's currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
  /// ISO 4217 code, upper case.
  pub code: String,
  symbol: String,
  minor_digits: u32,
}

impl CurrencyFormat {
  pub fn for_code(code: &str) -> Result<Self> {
    let code = code.trim().to_ascii_uppercase();
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
      return Err(AppError::Config(format!("Invalid STORE_CURRENCY '{}'", code)));
    }
    let (symbol, minor_digits) = match code.as_str() {
      "USD" => ("$".to_string(), 2),
      "EUR" => ("€".to_string(), 2),
      "GBP" => ("£".to_string(), 2),
      "JPY" => ("¥".to_string(), 0),
      "KRW" => ("₩".to_string(), 0),
      "CAD" => ("CA$".to_string(), 2),
      "AUD" => ("A$".to_string(), 2),
      "INR" => ("₹".to_string(), 2),
      other => (format!("{} ", other), 2),
    };
    Ok(Self {
      code,
      symbol,
      minor_digits,
    })
  }

  pub fn minor_digits(&self) -> u32 {
    self.minor_digits
  }

  /// `$1,234.50`, `-$3.00`, `¥1,235`.
  pub fn format(&self, amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(self.minor_digits, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let unsigned = format!("{:.*}", self.minor_digits as usize, rounded.abs());
    let (whole, fraction) = match unsigned.split_once('.') {
      Some((whole, fraction)) => (whole, Some(fraction)),
      None => (unsigned.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
      if i > 0 && (whole.len() - i) % 3 == 0 {
        grouped.push(',');
      }
      grouped.push(digit);
    }

    match fraction {
      Some(fraction) => format!("{}{}{}.{}", sign, self.symbol, grouped, fraction),
      None => format!("{}{}{}", sign, self.symbol, grouped),
    }
  }
}

impl Default for CurrencyFormat {
  fn default() -> Self {
    Self {
      code: "USD".to_string(),
      symbol: "$".to_string(),
      minor_digits: 2,
    }
  }
}
