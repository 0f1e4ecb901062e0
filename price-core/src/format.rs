//! Currency formatting for predicted prices.
//!
//! Mirrors the grouping a browser applies with `toLocaleString()` in the
//! `en-NG`/`en-US` locales: thousands grouped with `,`, at most three
//! fractional digits, trailing fractional zeros dropped.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Naira sign.
pub const NAIRA: &str = "₦";

/// How a price is turned into display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberFormat {
    pub currency_symbol: String,
    pub group_separator: String,
    pub decimal_separator: String,
    pub max_fraction_digits: u32,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            currency_symbol: NAIRA.to_string(),
            group_separator: ",".to_string(),
            decimal_separator: ".".to_string(),
            max_fraction_digits: 3,
        }
    }
}

impl NumberFormat {
    /// Formats `value` as a currency amount, e.g. `₦45,000,000`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use price_core::format::NumberFormat;
    ///
    /// let fmt = NumberFormat::default();
    /// assert_eq!(fmt.currency(dec!(45000000)), "₦45,000,000");
    /// assert_eq!(fmt.currency(dec!(1234.5)), "₦1,234.5");
    /// ```
    pub fn currency(
        &self,
        value: Decimal,
    ) -> String {
        let sign = if value.is_sign_negative() && !value.is_zero() {
            "-"
        } else {
            ""
        };
        format!("{sign}{}{}", self.currency_symbol, self.grouped(value.abs()))
    }

    /// Rounds and groups a non-negative amount without the currency symbol.
    pub fn grouped(
        &self,
        value: Decimal,
    ) -> String {
        let rounded = value
            .round_dp_with_strategy(
                self.max_fraction_digits,
                RoundingStrategy::MidpointAwayFromZero,
            )
            .normalize();

        let text = rounded.abs().to_string();
        let (integer, fraction) = match text.split_once('.') {
            Some((integer, fraction)) => (integer, Some(fraction)),
            None => (text.as_str(), None),
        };

        let mut out = group_thousands(integer, &self.group_separator);
        if let Some(fraction) = fraction {
            out.push_str(&self.decimal_separator);
            out.push_str(fraction);
        }
        out
    }
}

fn group_thousands(
    digits: &str,
    separator: &str,
) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
