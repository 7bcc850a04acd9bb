//! Monetary amounts for receipts and member shares.
//!
//! Wraps `rust_decimal` so that splitting an item between members keeps full
//! decimal precision. Rounding happens only when an amount is displayed.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// A decimal money amount.
///
/// Arithmetic is exact up to 28 significant digits. Addition and
/// subtraction saturate at [`Amount::MAX`] / [`Amount::MIN`] instead of
/// overflowing. `Display` rounds to two decimal places for presentation.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use splitease::Amount;
///
/// let amount = Amount::from_str("10.00").unwrap();
/// assert_eq!(amount.split(3).to_string(), "3.33");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Decimal places shown by `Display`.
    pub const DISPLAY_SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// Largest representable amount; sums clamp here.
    pub const MAX: Self = Amount(Decimal::MAX);

    /// Smallest representable amount.
    pub const MIN: Self = Amount(Decimal::MIN);

    /// Largest difference still treated as equal when comparing computed sums.
    pub const TOLERANCE: Self = Amount(Decimal::from_parts(1, 0, 0, false, 6));

    /// Creates an amount from a whole number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Amount(Decimal::new(cents, 2))
    }

    /// Returns the underlying decimal.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns `true` for amounts strictly above zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Divides the amount evenly between `parts` participants.
    ///
    /// Splitting between zero participants yields zero.
    pub fn split(&self, parts: usize) -> Self {
        if parts == 0 {
            return Self::ZERO;
        }
        Amount(self.0 / Decimal::from(parts as u64))
    }

    /// Compares two amounts within [`Amount::TOLERANCE`].
    pub fn approx_eq(&self, other: Amount) -> bool {
        (*self - other).0.abs() <= Self::TOLERANCE.0
    }

    /// Rounds half away from zero to the display scale.
    pub fn rounded(&self) -> Self {
        Amount(
            self.0
                .round_dp_with_strategy(Self::DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero),
        )
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount(value)
    }
}

impl FromStr for Amount {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Ok(Amount(decimal))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded().0)
    }
}

impl Add for Amount {
    type Output = Self;

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
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Amount(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, amount| acc + amount)
    }
}

impl<'a> Sum<&'a Amount> for Amount {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.normalize().to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
