//! # Money Module
//!
//! Provides the `Money` type for every amount shown at the till.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as JSON numbers:                              │
//! │    3.00 × 2 + 1.20 = 7.199999999999999  ❌                              │
//! │                                                                         │
//! │  OUR SOLUTION: integer hundredths                                       │
//! │    300 × 2 + 120 = 720                  ✅                              │
//! │                                                                         │
//! │  Floats are converted exactly once, at the wire boundary                │
//! │  (`from_major_f64` / `to_major_f64`).                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use caisse_core::money::Money;
//!
//! let price = Money::from_cents(300);      // 3.00
//! let line = price.multiply_quantity(2);   // 6.00
//! assert_eq!((line + Money::from_cents(120)).cents(), 720);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use std::iter::Sum;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in hundredths of the currency unit.
///
/// ## Where Money is Used
/// ```text
/// Article.price_incl_tax ──► CartItem.unit_price ──► CartItem.line_total
///                                                          │
///                     Cart gross total ◄───────────────────┘
///                            │
///                Discount::compute ──► net total ──► invoice request
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from hundredths.
    ///
    /// ```rust
    /// use caisse_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount received from the backend.
    ///
    /// Rounds half away from zero to the nearest hundredth. Non-finite
    /// values become zero.
    ///
    /// ```rust
    /// use caisse_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_f64(1.2).cents(), 120);
    /// assert_eq!(Money::from_major_f64(11.32).cents(), 1132);
    /// ```
    pub fn from_major_f64(amount: f64) -> Self {
        if !amount.is_finite() {
            return Money::zero();
        }
        Money((amount * 100.0).round() as i64)
    }

    /// Converts back to a decimal amount for the JSON wire format.
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in hundredths.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the hundredths portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ```rust
    /// use caisse_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Returns `bps` basis points of this amount (1000 bps = 10 %).
    ///
    /// Half-hundredths round up: `(amount × bps + 5000) / 10000`.
    ///
    /// ```rust
    /// use caisse_core::money::Money;
    ///
    /// let gross = Money::from_cents(720);
    /// assert_eq!(gross.percentage(1000).cents(), 72);
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        Money::from_cents(round_div(self.0 as i128 * bps as i128, 10_000))
    }

    /// Scales this amount by `numerator / denominator`, rounding half away
    /// from zero. A zero denominator leaves the amount unchanged (ratio 1).
    ///
    /// ```rust
    /// use caisse_core::money::Money;
    ///
    /// let gross_ht = Money::from_cents(682);
    /// let scaled = gross_ht.scale(Money::from_cents(648), Money::from_cents(720));
    /// assert_eq!(scaled.cents(), 614);
    /// ```
    pub fn scale(&self, numerator: Money, denominator: Money) -> Money {
        if denominator.is_zero() {
            return *self;
        }
        Money::from_cents(round_div(
            self.0 as i128 * numerator.0 as i128,
            denominator.0 as i128,
        ))
    }

    /// Clamps negative values to zero.
    #[inline]
    pub fn clamp_non_negative(self) -> Money {
        if self.0 < 0 {
            Money::zero()
        } else {
            self
        }
    }
}

/// Integer division rounding half away from zero.
fn round_div(numerator: i128, denominator: i128) -> i64 {
    let (n, d) = if denominator < 0 {
        (-numerator, -denominator)
    } else {
        (numerator, denominator)
    };
    let half = d / 2;
    let q = if n >= 0 { (n + half) / d } else { (n - half) / d };
    q as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================
//
// Arithmetic saturates at the i64 bounds: prices come from the server.

/// Shows the amount with two decimals, without a currency marker.
/// Views append the configured currency (see [`crate::view::CurrencyFormat`]).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
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
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_f64_rounds_to_hundredths() {
        assert_eq!(Money::from_major_f64(3.0).cents(), 300);
        assert_eq!(Money::from_major_f64(1.2).cents(), 120);
        assert_eq!(Money::from_major_f64(0.1 + 0.2).cents(), 30);
        assert_eq!(Money::from_major_f64(-5.5).cents(), -550);
        assert_eq!(Money::from_major_f64(f64::NAN).cents(), 0);
    }

    #[test]
    fn test_to_major_f64() {
        assert!((Money::from_cents(648).to_major_f64() - 6.48).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_huge_server_price_saturates() {
        let absurd = Money::from_major_f64(1e17);
        assert_eq!(absurd.cents(), i64::MAX);

        assert_eq!(absurd.multiply_quantity(2).cents(), i64::MAX);
        assert_eq!((absurd + absurd).cents(), i64::MAX);
        assert_eq!((absurd * 3).cents(), i64::MAX);
        assert_eq!((Money::from_cents(i64::MIN) - Money::from_cents(1)).cents(), i64::MIN);

        let total: Money = vec![absurd, Money::from_cents(1)].into_iter().sum();
        assert_eq!(total.cents(), i64::MAX);
    }

    #[test]
    fn test_percentage_rounding() {
        assert_eq!(Money::from_cents(720).percentage(1000).cents(), 72);
        // 12.5% of 0.99 = 0.12375 → 0.12
        assert_eq!(Money::from_cents(99).percentage(1250).cents(), 12);
        // 50% of 0.01 = 0.005 → 0.01
        assert_eq!(Money::from_cents(1).percentage(5000).cents(), 1);
        assert_eq!(Money::from_cents(720).percentage(0).cents(), 0);
    }

    #[test]
    fn test_scale() {
        let ht = Money::from_cents(1000);
        assert_eq!(ht.scale(Money::from_cents(1), Money::from_cents(2)).cents(), 500);
        assert_eq!(ht.scale(Money::from_cents(0), Money::from_cents(2)).cents(), 0);
        // Zero denominator keeps ratio 1
        assert_eq!(ht.scale(Money::from_cents(5), Money::zero()).cents(), 1000);
    }

    #[test]
    fn test_clamp_non_negative() {
        assert_eq!(Money::from_cents(-1).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_cents(7).clamp_non_negative().cents(), 7);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(100).is_positive());
        assert!(Money::from_cents(-100).is_negative());
    }
}
