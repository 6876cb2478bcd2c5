//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Two Representations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE EACH REPRESENTATION IS USED                                      │
//! │                                                                         │
//! │  Money (integer cents)               Decimal (exact base-10)            │
//! │  ─────────────────────               ───────────────────────            │
//! │  • Menu item prices                  • Tax amount   ($2.8875)           │
//! │  • Subtotal (sum of prices)          • Tip amount                       │
//! │  • Rounded breakdown lines           • Total, per-person amount         │
//! │  • Equal-split shares                                                   │
//! │                                                                         │
//! │  Prices are entered in cents, so a sum of cents is exact.               │
//! │  A percentage of cents is not, so it stays a Decimal until displayed.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dine_core::money::Money;
//!
//! let burger = Money::from_cents(1450); // $14.50
//! let fries = Money::from_cents(550);   // $5.50
//! let subtotal = burger + fries;
//! assert_eq!(subtotal.to_string(), "$20.00");
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values (e.g. a comped item)
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use dine_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds an exact decimal amount (in dollars) to whole cents.
    ///
    /// Midpoints round away from zero (half-up), so $22.445 becomes $22.45
    /// and -$0.005 becomes -$0.01. Amounts beyond the i64 range saturate.
    ///
    /// ## Example
    /// ```rust
    /// use dine_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let tax = Decimal::new(28875, 4); // 2.8875
    /// assert_eq!(Money::from_decimal_rounded(tax).cents(), 289);
    /// ```
    pub fn from_decimal_rounded(amount: Decimal) -> Self {
        let mut rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(2);
        let cents = rounded.mantissa();
        let cents = i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX });
        Money(cents)
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the exact value in dollars as a `Decimal` (scale 2).
    ///
    /// ## Example
    /// ```rust
    /// use dine_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(Money::from_cents(3500).to_decimal(), Decimal::new(35, 0));
    /// ```
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
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

    /// Divides the amount into `parts` cent-exact shares.
    ///
    /// ## Remainder Handling
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  $10.00 split 3 ways                                                │
    /// │                                                                     │
    /// │  Naive:    333 + 333 + 333 = 999 cents   → 1 cent lost              │
    /// │  Here:     334 + 333 + 333 = 1000 cents  → nothing lost             │
    /// │                                                                     │
    /// │  The leftover cents go to the first diners, one each.              │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// A `parts` value below 1 is treated as 1. The result describes the
    /// shares without materializing one entry per part.
    ///
    /// ## Example
    /// ```rust
    /// use dine_core::money::Money;
    ///
    /// let shares = Money::from_cents(1000).split_evenly(3);
    /// let cents: Vec<i64> = shares.iter().map(|m| m.cents()).collect();
    /// assert_eq!(cents, vec![334, 333, 333]);
    /// ```
    pub fn split_evenly(&self, parts: i64) -> EvenShares {
        let parts = parts.max(1);

        EvenShares {
            parts,
            base: Money(self.0.div_euclid(parts)),
            extra_cent_count: self.0.rem_euclid(parts),
        }
    }
}

// =============================================================================
// Even Shares
// =============================================================================

/// An amount divided into `parts` shares that differ by at most one cent.
///
/// The first `extra_cent_count` shares are `base + $0.01`, the rest are
/// `base`. Party sizes can be arbitrarily large, so shares are computed on
/// demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EvenShares {
    pub parts: i64,
    pub base: Money,
    pub extra_cent_count: i64,
}

impl EvenShares {
    /// The share paid by diner `index` (zero-based), if there is one.
    pub fn share(&self, index: i64) -> Option<Money> {
        (0..self.parts).contains(&index).then(|| self.share_unchecked(index))
    }

    /// All shares in diner order.
    pub fn iter(&self) -> impl Iterator<Item = Money> {
        let shares = *self;
        (0..shares.parts).map(move |i| shares.share_unchecked(i))
    }

    /// Sum of all shares; equals the divided amount.
    pub fn total(&self) -> Money {
        let total = i128::from(self.base.0) * i128::from(self.parts)
            + i128::from(self.extra_cent_count);
        Money(i64::try_from(total).unwrap_or(if total < 0 { i64::MIN } else { i64::MAX }))
    }

    fn share_unchecked(&self, index: i64) -> Money {
        if index < self.extra_cent_count {
            Money(self.base.0.saturating_add(1))
        } else {
            self.base
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// Used for the breakdown labels; the UI may re-format for localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition saturates at the i64 limits instead of wrapping.
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
        *self = *self + other;
    }
}

/// Summing an iterator of prices gives the subtotal.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |mut acc, m| {
            acc += m;
            acc
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
