//! # Validation Module
//!
//! Boundary checks for input coming from the dining UI.
//!
//! ## Where Validation Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI forms                                                     │
//! │  └── min/max hints on numeric inputs (tax 0-15, tip 0-50)              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: dine-session                                                 │
//! │  └── THIS MODULE: reject malformed items, warn on odd rates            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: estimate::compute                                            │
//! │  └── No validation. Degenerate values use fallbacks, never errors.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{LineItem, Percentage};
use crate::{
    MAX_BILL_ITEMS, MAX_ITEM_PRICE_CENTS, MAX_LOCATION_LENGTH, MAX_PARTY_SIZE, MAX_TIP_HINT,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Line Items
// =============================================================================

/// Validates a single line item.
///
/// ## Rules
/// - `id` and `name` must not be blank
/// - Price must be between zero (a comped dish) and `MAX_ITEM_PRICE_CENTS`
pub fn validate_line_item(item: &LineItem) -> ValidationResult<()> {
    if item.id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "item id".to_string(),
        });
    }

    if item.name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "item name".to_string(),
        });
    }

    validate_price_cents(item.price_cents)
}

/// Validates a whole order.
///
/// ## Rules
/// - Every item passes `validate_line_item`
/// - Ids are unique within the bill
/// - At most `MAX_BILL_ITEMS` items
///
/// An empty list is valid; it simply produces no estimation.
pub fn validate_line_items(items: &[LineItem]) -> ValidationResult<()> {
    if items.len() > MAX_BILL_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "line items".to_string(),
            min: 0,
            max: MAX_BILL_ITEMS as i64,
        });
    }

    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        validate_line_item(item)?;

        if !seen.insert(item.id.as_str()) {
            return Err(ValidationError::Duplicate {
                field: "item id".to_string(),
                value: item.id.clone(),
            });
        }
    }

    Ok(())
}

/// Validates a price in cents.
///
/// The ceiling keeps a full bill (`MAX_BILL_ITEMS` at the ceiling) far
/// inside the i64 range.
///
/// ## Example
/// ```rust
/// use dine_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());     // $10.99
/// assert!(validate_price_cents(0).is_ok());        // Comped
/// assert!(validate_price_cents(-100).is_err());    // Invalid
/// assert!(validate_price_cents(i64::MAX).is_err()); // Not a dish
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_ITEM_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_ITEM_PRICE_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Inputs
// =============================================================================

/// Validates a party size against the reservation form's range.
///
/// The calculator itself tolerates any value (≤ 0 divides by 1); this is
/// for callers that want to flag it.
pub fn validate_party_size(party_size: i64) -> ValidationResult<()> {
    if party_size <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "party size".to_string(),
        });
    }

    if party_size > MAX_PARTY_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "party size".to_string(),
            min: 1,
            max: MAX_PARTY_SIZE,
        });
    }

    Ok(())
}

/// Validates a tax rate: 0% to 100%.
pub fn validate_tax_rate(rate: Percentage) -> ValidationResult<()> {
    if rate < Percentage::ZERO || rate > Percentage::HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: "tax rate".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

/// Checks a tip against the practical 0-50% range offered by the UI.
///
/// Advisory only: the tip policy accepts values outside this range.
pub fn validate_tip_percentage(pct: Percentage) -> ValidationResult<()> {
    if pct < Percentage::ZERO || pct > Percentage::whole(MAX_TIP_HINT) {
        return Err(ValidationError::OutOfRange {
            field: "tip percentage".to_string(),
            min: 0,
            max: i64::from(MAX_TIP_HINT),
        });
    }

    Ok(())
}

// =============================================================================
// Text Inputs
// =============================================================================

/// Validates the restaurant location text.
///
/// Empty is allowed (resolves to the default rate).
pub fn validate_location(location: &str) -> ValidationResult<()> {
    if location.chars().count() > MAX_LOCATION_LENGTH {
        return Err(ValidationError::TooLong {
            field: "location".to_string(),
            max: MAX_LOCATION_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn item(id: &str, cents: i64) -> LineItem {
        LineItem::with_id(id, format!("Dish {}", id), Money::from_cents(cents), "Mains")
    }

    #[test]
    fn test_validate_line_item() {
        assert!(validate_line_item(&item("a", 1200)).is_ok());
        assert!(validate_line_item(&item("a", 0)).is_ok());
        assert!(validate_line_item(&item("", 1200)).is_err());
        assert!(validate_line_item(&item("a", -1)).is_err());

        let mut nameless = item("b", 100);
        nameless.name = "   ".to_string();
        assert!(matches!(
            validate_line_item(&nameless),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_line_items_rejects_duplicate_ids() {
        assert!(validate_line_items(&[]).is_ok());
        assert!(validate_line_items(&[item("a", 100), item("b", 200)]).is_ok());

        let err = validate_line_items(&[item("a", 100), item("a", 200)]).unwrap_err();
        assert!(matches!(err, ValidationError::Duplicate { ref value, .. } if value == "a"));
    }

    #[test]
    fn test_validate_line_items_limit() {
        let items: Vec<LineItem> = (0..=MAX_BILL_ITEMS)
            .map(|i| item(&i.to_string(), 100))
            .collect();
        assert!(validate_line_items(&items).is_err());
        assert!(validate_line_items(&items[..MAX_BILL_ITEMS]).is_ok());
    }

    #[test]
    fn test_validate_price_ceiling() {
        assert!(validate_price_cents(MAX_ITEM_PRICE_CENTS).is_ok());
        assert!(matches!(
            validate_price_cents(MAX_ITEM_PRICE_CENTS + 1),
            Err(ValidationError::OutOfRange { max: MAX_ITEM_PRICE_CENTS, .. })
        ));

        let half = i64::MAX / 2 + 1;
        assert!(validate_line_items(&[item("a", half), item("b", half)]).is_err());

        let full_bill: Vec<LineItem> = (0..MAX_BILL_ITEMS)
            .map(|i| item(&i.to_string(), MAX_ITEM_PRICE_CENTS))
            .collect();
        assert!(validate_line_items(&full_bill).is_ok());
        let total = (MAX_BILL_ITEMS as i64).checked_mul(MAX_ITEM_PRICE_CENTS);
        assert!(total.is_some());
    }

    #[test]
    fn test_validate_party_size() {
        assert!(validate_party_size(1).is_ok());
        assert!(validate_party_size(MAX_PARTY_SIZE).is_ok());
        assert!(validate_party_size(0).is_err());
        assert!(validate_party_size(-3).is_err());
        assert!(validate_party_size(MAX_PARTY_SIZE + 1).is_err());
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(Percentage::ZERO).is_ok());
        assert!(validate_tax_rate(Percentage::from_bps(1025)).is_ok());
        assert!(validate_tax_rate(Percentage::HUNDRED).is_ok());
        assert!(validate_tax_rate(Percentage::from_bps(10001)).is_err());
        assert!(validate_tax_rate("-1".parse().unwrap()).is_err());
    }

    #[test]
    fn test_validate_tip_percentage_hint_range() {
        assert!(validate_tip_percentage(Percentage::whole(18)).is_ok());
        assert!(validate_tip_percentage(Percentage::whole(50)).is_ok());
        assert!(validate_tip_percentage(Percentage::whole(51)).is_err());
        assert!(validate_tip_percentage("-0.5".parse().unwrap()).is_err());
    }

    #[test]
    fn test_validate_location() {
        assert!(validate_location("").is_ok());
        assert!(validate_location("Seattle, WA").is_ok());
        assert!(validate_location(&"x".repeat(MAX_LOCATION_LENGTH + 1)).is_err());
    }
}
