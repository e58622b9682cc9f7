//! # Money Module
//!
//! Provides the `Money` type for handling rupee amounts safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The browser app stored rates as JS numbers:                            │
//! │    12.10 * 3 = 36.300000000000004  ❌                                   │
//! │                                                                         │
//! │  A 7.5% scheme on ₹1,333.33 should be ₹100.00, not ₹99.99975           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    133333 paise × 750 bps = 99.99975 → rounded once → 10000 paise      │
//! │    Every rounding happens in exactly one place: `percent_of`            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rxdist_core::money::Money;
//! use rxdist_core::types::Percent;
//!
//! let amount = Money::from_rupees(1500);
//! let benefit = amount.percent_of(Percent::from_bps(1000)); // 10%
//! assert_eq!(benefit, Money::from_rupees(150));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

use crate::types::Percent;

// =============================================================================
// Money Type
// =============================================================================

/// A rupee amount held as an integer number of paise.
///
/// ## Design Decisions
/// - **i64 (signed)**: negative amounts are legal input (returns, credit
///   notes) and the scheme engine must not choke on them
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - Serializes as the bare paise integer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ```rust
    /// use rxdist_core::money::Money;
    ///
    /// let rate = Money::from_paise(1250); // ₹12.50
    /// assert_eq!(rate.paise(), 1250);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// For negative amounts only the rupee part carries the sign:
    /// `from_rupees_paise(-5, 50)` is -₹5.50.
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion (truncated toward zero).
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
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

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Computes `self × percent`, rounded half away from zero to the paisa.
    ///
    /// This is the single rounding point for every scheme benefit, cash
    /// incentive, GST amount and margin in the workspace.
    ///
    /// ## Implementation
    /// Integer math in i128: `(|paise| × bps + 5000) / 10000`, sign restored
    /// afterwards so that -₹0.005 rounds to -₹0.01 just like +₹0.005 rounds
    /// to +₹0.01.
    ///
    /// ```rust
    /// use rxdist_core::money::Money;
    /// use rxdist_core::types::Percent;
    ///
    /// let amount = Money::from_paise(1000);            // ₹10.00
    /// let pct = Percent::from_bps(825);                // 8.25%
    /// assert_eq!(amount.percent_of(pct).paise(), 83);  // ₹0.825 → ₹0.83
    /// ```
    ///
    /// Results outside the i64 range saturate.
    pub fn percent_of(&self, percent: Percent) -> Money {
        let magnitude = (self.0.unsigned_abs() as i128 * percent.bps() as i128 + 5000) / 10000;
        let signed = if self.0 < 0 { -magnitude } else { magnitude };
        Money(i64::try_from(signed).unwrap_or(if signed < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Multiplies a unit rate by a quantity.
    ///
    /// ```rust
    /// use rxdist_core::money::Money;
    ///
    /// let rate = Money::from_paise(4550); // ₹45.50 per strip
    /// assert_eq!(rate.multiply_quantity(3).paise(), 13650);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Applies a percentage discount and returns the discounted amount.
    pub fn apply_percentage_discount(&self, discount: Percent) -> Money {
        *self - self.percent_of(discount)
    }

    /// Adds a percentage mark-up (margin on cost) and returns the result.
    pub fn apply_markup(&self, margin: Percent) -> Money {
        *self + self.percent_of(margin)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

// Arithmetic saturates at the i64 bounds instead of panicking.

/// Debug-grade display (`₹1,234.50` formatting is the front end's job).
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
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

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + *m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(1099);
        assert_eq!(money.paise(), 1099);
        assert_eq!(money.rupees(), 10);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_from_rupees_paise() {
        assert_eq!(Money::from_rupees_paise(10, 99).paise(), 1099);
        assert_eq!(Money::from_rupees_paise(-5, 50).paise(), -550);
        assert_eq!(Money::from_rupees(15).paise(), 1500);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(1099)), "₹10.99");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::zero()), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3000);
        assert_eq!((-a).paise(), -1000);
    }

    #[test]
    fn test_sum() {
        let lines = [Money::from_paise(100), Money::from_paise(250), Money::from_paise(-50)];
        let total: Money = lines.iter().sum();
        assert_eq!(total.paise(), 300);
    }

    #[test]
    fn test_percent_of_exact() {
        let amount = Money::from_rupees(1500);
        assert_eq!(amount.percent_of(Percent::from_bps(1000)), Money::from_rupees(150));
    }

    #[test]
    fn test_percent_of_rounds_half_away_from_zero() {
        // ₹10.00 at 8.25% = ₹0.825 → ₹0.83
        let amount = Money::from_paise(1000);
        assert_eq!(amount.percent_of(Percent::from_bps(825)).paise(), 83);

        let refund = Money::from_paise(-1000);
        assert_eq!(refund.percent_of(Percent::from_bps(825)).paise(), -83);
    }

    #[test]
    fn test_percent_of_saturates() {
        let big = Money::from_paise(i64::MAX / 2);
        assert_eq!(big.percent_of(Percent::from_bps(30_000)).paise(), i64::MAX);
        assert_eq!((-big).percent_of(Percent::from_bps(30_000)).paise(), i64::MIN);
    }

    #[test]
    fn test_percent_of_zero_amount() {
        assert!(Money::zero().percent_of(Percent::from_bps(2500)).is_zero());
    }

    #[test]
    fn test_discount_and_markup() {
        let subtotal = Money::from_rupees(100);
        assert_eq!(
            subtotal.apply_percentage_discount(Percent::from_bps(1000)),
            Money::from_rupees(90)
        );
        assert_eq!(subtotal.apply_markup(Percent::from_bps(2000)), Money::from_rupees(120));
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let negative = Money::from_paise(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs().paise(), 100);
    }

    #[test]
    fn test_multiply_quantity() {
        let rate = Money::from_paise(299);
        assert_eq!(rate.multiply_quantity(3).paise(), 897);
    }
}
