//! # Money Module
//!
//! Provides the `Money` type for handling prices and cart totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A six-pack at $35.70 × 3 summed as floats can drift by a centavo      │
//! │  and the checkout total no longer matches the payment provider.        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    3570 centavos × 3 = 10710 centavos, exactly                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use arca_core::money::Money;
//!
//! let price = Money::from_minor(2100); // $21.00
//! let line = price.multiply_quantity(5);
//! assert_eq!(line.minor(), 10500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (centavos for MXN).
///
/// Serializes as a bare JSON integer, which is the shape the persisted cart
/// payload uses for `unitPrice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use arca_core::money::Money;
    ///
    /// let price = Money::from_minor(2100);
    /// assert_eq!(price.minor(), 2100);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (pesos, dollars).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies money by a line quantity.
    ///
    /// Saturates at the `i64` bounds instead of overflowing, so a pathological
    /// cart can never panic the total computation.
    ///
    /// ## Example
    /// ```rust
    /// use arca_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(3570);
    /// assert_eq!(unit_price.multiply_quantity(3).minor(), 10710);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }

    /// Saturating addition, used when summing cart lines.
    #[inline]
    pub const fn saturating_add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`"21.00"`, `"-5.50"`).
///
/// Currency symbols and grouping are a frontend concern.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        self.saturating_add(other)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = self.saturating_add(other);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Summing saturates like the operators above.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Money::saturating_add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(2199);
        assert_eq!(money.minor(), 2199);
        assert_eq!(money.major(), 21);
        assert_eq!(money.minor_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_minor(2100).to_string(), "21.00");
        assert_eq!(Money::from_minor(5).to_string(), "0.05");
        assert_eq!(Money::from_minor(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);

        let mut c = a;
        c += b;
        assert_eq!(c.minor(), 1500);
    }

    #[test]
    fn test_operators_saturate() {
        let max = Money::from_minor(i64::MAX);
        let min = Money::from_minor(i64::MIN);
        let one = Money::from_minor(1);

        assert_eq!(max + one, max);
        assert_eq!(min - one, min);

        let mut c = max;
        c += one;
        assert_eq!(c, max);
    }

    #[test]
    fn test_multiply_quantity_saturates() {
        assert_eq!(Money::from_minor(2100).multiply_quantity(5).minor(), 10500);
        assert_eq!(
            Money::from_minor(i64::MAX).multiply_quantity(2).minor(),
            i64::MAX
        );
    }

    #[test]
    fn test_sum_saturates() {
        let total: Money = vec![Money::from_minor(i64::MAX), Money::from_minor(1)]
            .into_iter()
            .sum();
        assert_eq!(total.minor(), i64::MAX);

        let total: Money = vec![Money::from_minor(100), Money::from_minor(250)]
            .into_iter()
            .sum();
        assert_eq!(total.minor(), 350);
    }

    #[test]
    fn test_serializes_as_bare_integer() {
        let json = serde_json::to_string(&Money::from_minor(2100)).unwrap();
        assert_eq!(json, "2100");
        let back: Money = serde_json::from_str("2100").unwrap();
        assert_eq!(back, Money::from_minor(2100));
    }
}
