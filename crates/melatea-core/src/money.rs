//! # Money Module
//!
//! Whole-rupiah amounts. Prices on the menu, cart totals, change and
//! revenue are all `Money`; nothing in the shop is ever a float.
//!
//! ```text
//! Product.price ──► CartItem.unit_price × qty ──► Cart.total
//!                                                    │
//!                         paid ──► pay() ──► change ─┴──► Receipt / Transaction
//! ```
//!
//! ```rust
//! use melatea_core::money::Money;
//!
//! let total = Money::from_minor(29_000) * 2 + Money::from_minor(20_000);
//! assert_eq!(total.to_string(), "Rp 78.000");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// An amount in rupiah. Signed so shortfalls can be expressed before they
/// are floored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Rupiah have no minor unit in practice, so `from_minor(20_000)` is Rp 20.000.
    #[inline]
    pub const fn from_minor(units: i64) -> Self {
        Money(units)
    }

    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Line total for `qty` units at this price.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Difference `self - other`, floored at zero.
    ///
    /// Used for change and shortfall, which are never negative.
    #[inline]
    pub fn saturating_diff(&self, other: Money) -> Money {
        Money((self.0 - other.0).max(0))
    }
}

// =============================================================================
// Currency Formatting
// =============================================================================

/// How money is rendered for people (receipts, error messages, CSV).
///
/// The default is Indonesian Rupiah with `id-ID` grouping: `Rp 78.000`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyFormat {
    /// Symbol printed before the amount, followed by a space.
    pub symbol: String,

    /// Number of minor-unit digits (0 for rupiah, 2 for dollars). Values
    /// above [`CurrencyFormat::MAX_DECIMALS`] format as that many digits.
    pub decimals: u8,

    /// Separator between groups of three digits.
    pub thousands_separator: char,

    /// Separator before the minor-unit digits.
    pub decimal_separator: char,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        CurrencyFormat {
            symbol: "Rp".to_string(),
            decimals: 0,
            thousands_separator: '.',
            decimal_separator: ',',
        }
    }
}

impl CurrencyFormat {
    /// Largest power of ten that fits in an `i64`.
    pub const MAX_DECIMALS: u8 = 18;

    /// Formats an amount.
    ///
    /// ## Example
    /// ```rust
    /// use melatea_core::money::{CurrencyFormat, Money};
    ///
    /// let idr = CurrencyFormat::default();
    /// assert_eq!(idr.format(Money::from_minor(1_250_000)), "Rp 1.250.000");
    /// ```
    pub fn format(&self, amount: Money) -> String {
        let decimals = self.decimals.min(Self::MAX_DECIMALS);
        let divisor = 10_i64.pow(u32::from(decimals));
        let whole = (amount.minor() / divisor).unsigned_abs();
        let frac = (amount.minor() % divisor).unsigned_abs();

        let digits = whole.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(self.thousands_separator);
            }
            grouped.push(ch);
        }

        let sign = if amount.is_negative() { "-" } else { "" };
        if decimals > 0 {
            format!(
                "{}{} {}{}{:0width$}",
                sign,
                self.symbol,
                grouped,
                self.decimal_separator,
                frac,
                width = usize::from(decimals)
            )
        } else {
            format!("{}{} {}", sign, self.symbol, grouped)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display uses the default rupiah format.
///
/// ## Note
/// Receipts use the store's configured [`CurrencyFormat`] instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&CurrencyFormat::default().format(*self))
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rupiah() {
        assert_eq!(Money::from_minor(78_000).to_string(), "Rp 78.000");
        assert_eq!(Money::from_minor(500).to_string(), "Rp 500");
        assert_eq!(Money::from_minor(0).to_string(), "Rp 0");
        assert_eq!(Money::from_minor(-2_000).to_string(), "-Rp 2.000");
        assert_eq!(Money::from_minor(1_000_000).to_string(), "Rp 1.000.000");
    }

    #[test]
    fn test_format_with_decimals() {
        let usd = CurrencyFormat {
            symbol: "$".to_string(),
            decimals: 2,
            thousands_separator: ',',
            decimal_separator: '.',
        };
        assert_eq!(usd.format(Money::from_minor(123_456)), "$ 1,234.56");
        assert_eq!(usd.format(Money::from_minor(5)), "$ 0.05");
    }

    #[test]
    fn test_format_caps_oversized_decimals() {
        let odd = CurrencyFormat {
            symbol: "X".to_string(),
            decimals: 30,
            thousands_separator: ',',
            decimal_separator: '.',
        };
        assert_eq!(
            odd.format(Money::from_minor(5)),
            "X 0.000000000000000005"
        );
        assert_eq!(
            odd.format(Money::from_minor(i64::MAX)),
            "X 9.223372036854775807"
        );

        let max = CurrencyFormat {
            decimals: u8::MAX,
            ..odd
        };
        assert_eq!(max.format(Money::from_minor(-1)), "-X 0.000000000000000001");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(29_000);
        let b = Money::from_minor(20_000);

        assert_eq!((a + b).minor(), 49_000);
        assert_eq!((a - b).minor(), 9_000);
        assert_eq!((a * 2).minor(), 58_000);

        let total: Money = [a, b, a].iter().sum();
        assert_eq!(total.minor(), 78_000);
    }

    #[test]
    fn test_saturating_diff() {
        let total = Money::from_minor(78_000);
        assert_eq!(Money::from_minor(80_000).saturating_diff(total).minor(), 2_000);
        assert_eq!(Money::from_minor(50_000).saturating_diff(total).minor(), 0);
    }

    #[test]
    fn test_sign_checks() {
        assert!(!Money::zero().is_positive());
        assert!(!Money::zero().is_negative());
        assert!(Money::from_minor(-100).is_negative());
        assert_eq!(Money::from_minor(-1_500).to_string(), "-Rp 1.500");
    }
}
