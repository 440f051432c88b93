//! [`PaymentAmount`] represents a monetary amount submitted to the wallet or vending backend.
//!
//! This module holds its type definition, bounds and parsing.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::PaymentRangeError;

/// Minimum amount the storefront accepts, in currency units. Covers processing fees.
pub const FLATHUB_MIN_PAYMENT: f64 = 1.0;

/// Stripe can handle at most an 8 digit single transaction.
pub const STRIPE_MAX_PAYMENT: f64 = 999_999.99;

/// A payment amount, stored in minor units (cents).
///
/// A `PaymentAmount` can only be constructed inside
/// `[FLATHUB_MIN_PAYMENT, STRIPE_MAX_PAYMENT]` (both inclusive), so an out-of-range
/// amount is rejected before any request is built.
///
/// ```
/// use storefront_core::types::PaymentAmount;
///
/// let amount: PaymentAmount = "999999.99".parse().unwrap();
/// assert_eq!(amount.cents(), 99_999_999);
/// assert!("0.99".parse::<PaymentAmount>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PaymentAmount(u64);

impl PaymentAmount {
    /// Smallest accepted amount: `1.00`.
    pub const MIN: PaymentAmount = PaymentAmount(100);
    /// Largest accepted amount: `999999.99`.
    pub const MAX: PaymentAmount = PaymentAmount(99_999_999);

    /// Create an amount from minor units, checking the payment bounds.
    pub fn from_cents(cents: u64) -> Result<Self, PaymentRangeError> {
        if cents < Self::MIN.0 {
            Err(PaymentRangeError::BelowMinimum(format_cents(cents)))
        } else if cents > Self::MAX.0 {
            Err(PaymentRangeError::AboveMaximum(format_cents(cents)))
        } else {
            Ok(PaymentAmount(cents))
        }
    }

    /// Amount in minor units.
    pub fn cents(&self) -> u64 {
        self.0
    }
}

fn format_cents(cents: u64) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

impl FromStr for PaymentAmount {
    type Err = PaymentRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PaymentRangeError::Malformed(s.to_string());
        let trimmed = s.trim();

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };

        if whole.is_empty()
            || fraction.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let whole: u64 = whole.parse().map_err(|_| malformed())?;
        let fraction: u64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| malformed())? * 10,
            _ => fraction.parse().map_err(|_| malformed())?,
        };

        let cents = whole
            .checked_mul(100)
            .and_then(|w| w.checked_add(fraction))
            .ok_or_else(|| PaymentRangeError::AboveMaximum(trimmed.to_string()))?;

        Self::from_cents(cents)
    }
}

impl TryFrom<f64> for PaymentAmount {
    type Error = PaymentRangeError;

    /// Checks the bounds on the raw value, then rounds to the nearest cent.
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() {
            return Err(PaymentRangeError::Malformed(value.to_string()));
        }
        if value < FLATHUB_MIN_PAYMENT {
            return Err(PaymentRangeError::BelowMinimum(value.to_string()));
        }
        if value > STRIPE_MAX_PAYMENT {
            return Err(PaymentRangeError::AboveMaximum(value.to_string()));
        }

        Self::from_cents((value * 100.0).round() as u64)
    }
}

impl Display for PaymentAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_cents(self.0))
    }
}

impl Serialize for PaymentAmount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Serde helpers for fields that carry a [`PaymentAmount`] in minor units.
///
/// ```
/// use serde::Serialize;
/// use storefront_core::types::PaymentAmount;
///
/// #[derive(Serialize)]
/// struct Donation {
///     #[serde(with = "storefront_core::types::cents")]
///     value: PaymentAmount,
/// }
///
/// let donation = Donation { value: "12.50".parse().unwrap() };
/// assert_eq!(serde_json::to_string(&donation).unwrap(), r#"{"value":1250}"#);
/// ```
pub mod cents {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::PaymentAmount;

    pub fn serialize<S: Serializer>(amount: &PaymentAmount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(amount.cents())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PaymentAmount, D::Error> {
        let cents = u64::deserialize(deserializer)?;
        PaymentAmount::from_cents(cents).map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for PaymentAmount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inclusive_bounds() {
        assert!(PaymentAmount::try_from(0.99).is_err());
        assert!(PaymentAmount::try_from(1_000_000.00).is_err());
        assert_eq!(PaymentAmount::try_from(1.00).unwrap(), PaymentAmount::MIN);
        assert_eq!(
            PaymentAmount::try_from(999_999.99).unwrap(),
            PaymentAmount::MAX
        );
    }

    #[test]
    fn test_bounds_match_constants() {
        assert_eq!(
            PaymentAmount::try_from(FLATHUB_MIN_PAYMENT).unwrap(),
            PaymentAmount::MIN
        );
        assert_eq!(
            PaymentAmount::try_from(STRIPE_MAX_PAYMENT).unwrap(),
            PaymentAmount::MAX
        );
    }

    #[test]
    fn test_parse_decimal_strings() {
        assert_eq!("1".parse::<PaymentAmount>().unwrap().cents(), 100);
        assert_eq!("1.5".parse::<PaymentAmount>().unwrap().cents(), 150);
        assert_eq!("12.34".parse::<PaymentAmount>().unwrap().cents(), 1234);

        assert!(matches!(
            "0.99".parse::<PaymentAmount>(),
            Err(PaymentRangeError::BelowMinimum(_))
        ));
        assert!(matches!(
            "1000000.00".parse::<PaymentAmount>(),
            Err(PaymentRangeError::AboveMaximum(_))
        ));
        assert!(matches!(
            "1.234".parse::<PaymentAmount>(),
            Err(PaymentRangeError::Malformed(_))
        ));
        assert!(matches!(
            "-5".parse::<PaymentAmount>(),
            Err(PaymentRangeError::Malformed(_))
        ));
        assert!(matches!(
            "99999999999999999999".parse::<PaymentAmount>(),
            Err(PaymentRangeError::Malformed(_)) | Err(PaymentRangeError::AboveMaximum(_))
        ));
    }

    #[test]
    fn test_out_of_range_before_rounding() {
        assert!(matches!(
            PaymentAmount::try_from(0.996),
            Err(PaymentRangeError::BelowMinimum(_))
        ));
        assert!(matches!(
            PaymentAmount::try_from(999_999.994),
            Err(PaymentRangeError::AboveMaximum(_))
        ));
        assert!(matches!(
            PaymentAmount::try_from(-0.001),
            Err(PaymentRangeError::BelowMinimum(_))
        ));

        assert_eq!(PaymentAmount::try_from(1.004).unwrap(), PaymentAmount::MIN);
        assert_eq!(PaymentAmount::try_from(12.34).unwrap().cents(), 1234);
    }

    #[test]
    fn test_cents_helper() {
        #[derive(Serialize, Deserialize)]
        struct Split {
            #[serde(with = "cents")]
            amount: PaymentAmount,
        }

        let split = Split {
            amount: PaymentAmount::from_cents(1000).unwrap(),
        };
        assert_eq!(
            serde_json::to_value(&split).unwrap(),
            serde_json::json!({ "amount": 1000 })
        );

        let parsed: Split = serde_json::from_value(serde_json::json!({ "amount": 250 })).unwrap();
        assert_eq!(parsed.amount.cents(), 250);

        assert!(serde_json::from_value::<Split>(serde_json::json!({ "amount": 99 })).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(PaymentAmount::try_from(f64::NAN).is_err());
        assert!(PaymentAmount::try_from(f64::INFINITY).is_err());
    }

    #[test]
    fn test_serde_as_decimal_string() {
        let amount = PaymentAmount::from_cents(2500).unwrap();
        assert_eq!(
            serde_json::to_value(amount).unwrap(),
            serde_json::json!("25.00")
        );

        let parsed: PaymentAmount = serde_json::from_value(serde_json::json!("25.00")).unwrap();
        assert_eq!(parsed, amount);

        assert!(serde_json::from_value::<PaymentAmount>(serde_json::json!("0.50")).is_err());
    }
}
