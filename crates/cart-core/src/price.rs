//! # Price Types
//!
//! Currency and minor-unit amounts for eurocart.
//!
//! Cart prices arrive display-formatted (`"€45,00"`): a currency symbol, the
//! major amount, and an optional comma decimal separator. They are parsed
//! straight into integer minor units without going through floating point.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    EUR,
}

impl Currency {
    /// Returns the ISO 4217 currency code, lowercase as Stripe expects it
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::EUR => "eur",
        }
    }

    /// Returns the number of decimal places for this currency
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::EUR => 2,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::EUR => "€",
        }
    }

    /// Number of minor units in one major unit (100 for EUR)
    pub fn minor_per_major(&self) -> i64 {
        10_i64.pow(self.decimal_places())
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// Amount in the smallest currency unit (cents for EUR)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    pub const ZERO: MinorUnits = MinorUnits(0);

    pub fn new(amount: i64) -> Self {
        Self(amount)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    pub fn checked_mul(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(quantity)).map(Self)
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Format for display in the cart's own notation (e.g., "€45,00")
    pub fn display(&self, currency: Currency) -> String {
        let places = currency.decimal_places() as usize;
        let per_major = currency.minor_per_major();
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / per_major as u64;
        if places == 0 {
            return format!("{}{}{}", sign, currency.symbol(), major);
        }
        let minor = abs % per_major as u64;
        format!(
            "{}{}{},{:0width$}",
            sign,
            currency.symbol(),
            major,
            minor,
            width = places
        )
    }
}

impl From<MinorUnits> for i64 {
    fn from(value: MinorUnits) -> Self {
        value.0
    }
}

impl std::fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse a display price such as `"€45,00"` into minor units of `currency`.
///
/// Accepted shape: `<symbol><digits>[,<digits>]` where `<symbol>` is exactly
/// the currency's own symbol. Fraction digits beyond the currency's precision
/// round half-up, so the result is `round(value * 100)` computed in decimal.
pub fn parse_display_price(price: &str, currency: Currency) -> CheckoutResult<MinorUnits> {
    let amount = price.strip_prefix(currency.symbol()).ok_or_else(|| {
        CheckoutError::malformed_price(
            price,
            format!("must start with the {} symbol {}", currency, currency.symbol()),
        )
    })?;

    if amount.is_empty() {
        return Err(CheckoutError::malformed_price(
            price,
            "no amount after currency symbol",
        ));
    }

    let (major, fraction) = match amount.split_once(',') {
        Some((major, fraction)) => (major, Some(fraction)),
        None => (amount, None),
    };

    if !is_ascii_digits(major) {
        return Err(CheckoutError::malformed_price(
            price,
            "amount must be digits with an optional comma decimal part",
        ));
    }
    if let Some(fraction) = fraction {
        if !is_ascii_digits(fraction) {
            return Err(CheckoutError::malformed_price(
                price,
                "decimal part must be digits after a single comma",
            ));
        }
    }

    let overflow = || CheckoutError::malformed_price(price, "amount is too large");

    let major_units = major.bytes().try_fold(0_i64, |acc, b| {
        acc.checked_mul(10)?.checked_add(i64::from(b - b'0'))
    });
    let major_units = major_units.ok_or_else(overflow)?;

    let places = currency.decimal_places() as usize;
    let fraction = fraction.unwrap_or("").as_bytes();
    let mut minor_units: i64 = 0;
    for i in 0..places {
        let digit = fraction.get(i).map(|b| i64::from(b - b'0')).unwrap_or(0);
        minor_units = minor_units * 10 + digit;
    }
    if fraction.get(places).is_some_and(|&b| b >= b'5') {
        minor_units += 1;
    }

    major_units
        .checked_mul(currency.minor_per_major())
        .and_then(|m| m.checked_add(minor_units))
        .map(MinorUnits)
        .ok_or_else(overflow)
}

fn is_ascii_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(price: &str) -> i64 {
        parse_display_price(price, Currency::EUR).unwrap().as_i64()
    }

    #[test]
    fn test_display_prices_convert_to_cents() {
        assert_eq!(cents("€45,00"), 4500);
        assert_eq!(cents("€9,99"), 999);
        assert_eq!(cents("€100"), 10000);
        assert_eq!(cents("€0,01"), 1);
        assert_eq!(cents("€0"), 0);
    }

    #[test]
    fn test_short_fraction_is_padded() {
        assert_eq!(cents("€9,9"), 990);
        assert_eq!(cents("€12,5"), 1250);
    }

    #[test]
    fn test_extra_fraction_digits_round_half_up() {
        assert_eq!(cents("€0,005"), 1);
        assert_eq!(cents("€0,004"), 0);
        assert_eq!(cents("€1,999"), 200);
        assert_eq!(cents("€19,994999"), 1999);
    }

    #[test]
    fn test_values_that_drift_in_floating_point_stay_exact() {
        // 0.29 * 100 and 1.15 * 100 both land just below the integer in f64
        assert_eq!(cents("€0,29"), 29);
        assert_eq!(cents("€1,15"), 115);
        assert_eq!(cents("€4,35"), 435);
    }

    #[test]
    fn test_malformed_prices_are_rejected() {
        for price in [
            "abc", "€", "€1,2,3", "45,00", "€45.00", "€,50", "€45,", "€ 45", "€-5", "", "€4a",
            "abc12", "$5,50", "EUR12", "USD5", "£3", "€€5", " €5",
        ] {
            let err = parse_display_price(price, Currency::EUR).unwrap_err();
            assert_eq!(err.kind(), "malformed_price", "{price:?} should be rejected");
        }
    }

    #[test]
    fn test_overflow_is_rejected() {
        let err = parse_display_price("€99999999999999999999", Currency::EUR).unwrap_err();
        assert!(matches!(err, CheckoutError::MalformedPrice { .. }));
    }

    #[test]
    fn test_minor_units_display() {
        assert_eq!(MinorUnits::new(4500).display(Currency::EUR), "€45,00");
        assert_eq!(MinorUnits::new(7).display(Currency::EUR), "€0,07");
        assert_eq!(MinorUnits::new(-250).display(Currency::EUR), "-€2,50");
    }

    #[test]
    fn test_currency_code() {
        assert_eq!(Currency::EUR.as_str(), "eur");
        assert_eq!(Currency::EUR.minor_per_major(), 100);
        assert_eq!(Currency::EUR.to_string(), "EUR");
        assert_eq!(Currency::default(), Currency::EUR);
    }
}
