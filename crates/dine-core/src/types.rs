//! # Domain Types
//!
//! Core domain types used throughout the bill estimator.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    LineItem     │   │   Percentage    │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  id             │   │  Decimal        │                              │
//! │  │  name           │   │  8.25 = 8.25%   │                              │
//! │  │  price_cents    │   │  (tax and tip)  │                              │
//! │  │  category       │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Percentage
// =============================================================================

/// An exact percentage used for tax and tip rates.
///
/// ## Why Decimal Instead of Basis Points?
/// Jurisdiction rates have two decimals (8.31%), but a custom tip typed by
/// a diner can be anything (17.5%, 33.333%). A base-10 decimal holds both
/// exactly and keeps `subtotal * rate / 100` free of float drift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(Decimal);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);

    /// One hundred percent.
    pub const HUNDRED: Percentage = Percentage(Decimal::ONE_HUNDRED);

    /// Creates a percentage from basis points (825 = 8.25%).
    #[inline]
    pub fn from_bps(bps: u32) -> Self {
        Percentage(Decimal::new(i64::from(bps), 2))
    }

    /// Creates a whole-number percentage (20 = 20%).
    #[inline]
    pub fn whole(pct: u32) -> Self {
        Percentage(Decimal::from(pct))
    }

    /// Wraps an exact decimal percentage.
    #[inline]
    pub const fn from_decimal(pct: Decimal) -> Self {
        Percentage(pct)
    }

    /// Converts a float from a numeric input field.
    ///
    /// The value is rounded to 4 decimal places so that `8.25_f64`
    /// becomes exactly 8.25 rather than its binary approximation.
    ///
    /// ## Errors
    /// `CoreError::InvalidPercentage` for NaN or infinite input.
    pub fn from_f64(pct: f64) -> CoreResult<Self> {
        Decimal::from_f64(pct)
            .map(|d| Percentage(d.round_dp(4).normalize()))
            .ok_or_else(|| CoreError::InvalidPercentage {
                input: pct.to_string(),
                reason: "not a finite number".to_string(),
            })
    }

    /// Returns the underlying decimal value (8.25 for 8.25%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Checks if the rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Applies the percentage to an amount: `amount * pct / 100`, exactly.
    ///
    /// Never panics. When the exact product is out of `Decimal` range the
    /// result saturates at `Decimal::MAX` or `Decimal::MIN`.
    ///
    /// ## Example
    /// ```rust
    /// use dine_core::types::Percentage;
    /// use rust_decimal::Decimal;
    ///
    /// let austin = Percentage::from_bps(825);
    /// let tax = austin.apply_to(Decimal::new(35, 0));
    /// assert_eq!(tax, Decimal::new(28875, 4)); // 2.8875
    /// ```
    pub fn apply_to(&self, amount: Decimal) -> Decimal {
        amount
            .checked_mul(self.0)
            .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED))
            // Scaling the rate first keeps large rates representable.
            .or_else(|| self.0.checked_div(Decimal::ONE_HUNDRED)?.checked_mul(amount))
            .unwrap_or_else(|| amount.saturating_mul(self.0))
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

/// Parses "8.25", "8.25%" or " 20 % " from a text field.
impl FromStr for Percentage {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

        Decimal::from_str(number)
            .map(|d| Percentage(d.normalize()))
            .map_err(|e| CoreError::InvalidPercentage {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One ordered menu item.
///
/// Owned by the caller; the calculator only reads it. The estimation result
/// carries its own copy so it stays a self-contained value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Identifier, unique within one bill.
    pub id: String,

    /// Menu name shown in the breakdown.
    pub name: String,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Menu category ("Mains", "Drinks", ...).
    pub category: String,
}

impl LineItem {
    /// Creates a line item with a freshly generated id (UUID v4).
    pub fn new(name: impl Into<String>, price: Money, category: impl Into<String>) -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            price_cents: price.cents(),
            category: category.into(),
        }
    }

    /// Creates a line item with a caller-supplied id (e.g. the menu item id).
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        price: Money,
        category: impl Into<String>,
    ) -> Self {
        LineItem {
            id: id.into(),
            name: name.into(),
            price_cents: price.cents(),
            category: category.into(),
        }
    }

    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
