//! Amount type for handling monetary values read from accounting spreadsheets.
//!
//! This module provides the `Amount` type which wraps `Decimal` and handles parsing values that may
//! carry a currency sign and locale-specific thousands and decimal separators.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub};
use std::str::FromStr;

/// Represents a monetary amount.
///
/// Summation is exact, so totals do not depend on the order in which amounts are added. Addition
/// and subtraction saturate at `Decimal::MAX` and `Decimal::MIN` instead of overflowing.
///
/// # Examples
///
/// Thousands separators in either locale:
/// ```
/// # use contabook::model::Amount;
/// # use std::str::FromStr;
/// let us = Amount::from_str("$1,234,567.50").unwrap();
/// let cl = Amount::from_str("$1.234.567,50").unwrap();
/// assert_eq!(us, cl);
/// assert_eq!(us.to_string(), "$1,234,567.50");
/// ```
///
/// Equality is numeric:
/// ```
/// # use contabook::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("190").unwrap();
/// let b = Amount::from_str("190.00").unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates a new Amount from a Decimal value.
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Converts a spreadsheet number. Returns `None` for NaN and infinities.
    pub fn from_f64(n: f64) -> Option<Self> {
        Decimal::from_f64(n).map(|d| Self(d.normalize()))
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError(rust_decimal::Error);

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses amounts such as `-$60,000.00`, `$ 1.234.567`, `1.234,50` or `(50)`.
    ///
    /// When both `.` and `,` appear, the right-most one is the decimal separator. A lone `,` is a
    /// thousands separator, as is a `.` that appears more than once.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Accounting negatives: (50.00)
        let (negative, body) = match trimmed.strip_prefix('(').and_then(|b| b.strip_suffix(')')) {
            Some(inner) => (true, inner),
            None => (false, trimmed),
        };

        let cleaned: String = body
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '$' && *c != '\'')
            .collect();

        let digits = match (cleaned.rfind('.'), cleaned.rfind(',')) {
            (Some(dot), Some(comma)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
            (Some(_), Some(_)) => cleaned.replace(',', ""),
            (None, Some(_)) => cleaned.replace(',', ""),
            (Some(_), None) if cleaned.matches('.').count() > 1 => cleaned.replace('.', ""),
            _ => cleaned,
        };

        let value = Decimal::from_str(&digits).map_err(AmountError)?;
        Ok(Amount(if negative { -value } else { value }))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        let num = self.0.abs();
        let formatted = if num.fract().is_zero() {
            format_num::format_num!(",.0f", num.to_f64().unwrap_or_default())
        } else {
            format_num::format_num!(",.2f", num.to_f64().unwrap_or_default())
        };
        write!(f, "{sign}${formatted}")
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Plain decimal text keeps the value exact.
        serializer.serialize_str(&self.0.normalize().to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}

impl Add for Amount {
    type Output = Amount;

    fn add(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Amount {
    type Output = Amount;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Amount {
    type Output = Amount;

    fn neg(self) -> Self::Output {
        Amount(-self.0)
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Amount::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Amount(Decimal::from(value))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}
