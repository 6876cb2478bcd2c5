//! # dine-core: Pure Bill Estimation for the Dining Assistant
//!
//! This crate is the **heart** of the bill estimator. It contains all
//! estimation logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Dining Assistant Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dining UI (external)                         │   │
//! │  │   Search ──► Restaurant ──► Menu picks ──► Bill panel           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ set_items / set_party_size / ...       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    dine-session                                 │   │
//! │  │    current inputs, recompute on change, notify observers        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dine-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌──────────────┐  ┌───────────┐  ┌─────────┐  │   │
//! │  │   │   money   │  │ jurisdiction │  │    tip    │  │estimate │  │   │
//! │  │   │   Money   │  │   TaxTable   │  │ TipPolicy │  │ compute │  │   │
//! │  │   └───────────┘  └──────────────┘  └───────────┘  └─────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `LineItem` and `Percentage`
//! - [`money`] - Money type with integer cents
//! - [`jurisdiction`] - Location text to sales-tax rate
//! - [`tip`] - Tip presets and custom tips
//! - [`estimate`] - The calculator and its result types
//! - [`validation`] - Boundary checks for UI input
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use dine_core::{estimate, LineItem, Money, TipPolicy};
//!
//! let items = vec![
//!     LineItem::new("Smoked Brisket", Money::from_cents(2000), "Mains"),
//!     LineItem::new("Pecan Pie", Money::from_cents(1500), "Dessert"),
//! ];
//! let tip = TipPolicy::preset(20).unwrap();
//!
//! let bill = estimate(&items, 2, "Austin, TX", &tip).unwrap();
//! assert_eq!(bill.breakdown_labels.tax, "8.25% = $2.89");
//! assert_eq!(bill.breakdown_labels.per_person, "$22.45");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod estimate;
pub mod jurisdiction;
pub mod money;
pub mod tip;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use estimate::{
    compute, estimate, estimate_and_notify, estimate_with_table, BillEstimation,
    EstimationObserver,
};
pub use jurisdiction::{resolve_tax_rate, TaxJurisdiction, TaxTable};
pub use money::{EvenShares, Money};
pub use tip::{TipMode, TipPolicy, TIP_PRESETS};
pub use types::{LineItem, Percentage};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum line items accepted for one bill.
pub const MAX_BILL_ITEMS: usize = 100;

/// Highest accepted price for one line item ($1,000,000).
pub const MAX_ITEM_PRICE_CENTS: i64 = 100_000_000;

/// Largest party the reservation form offers.
pub const MAX_PARTY_SIZE: i64 = 12;

/// Upper end of the tip range the UI suggests (not enforced by the policy).
pub const MAX_TIP_HINT: u32 = 50;

/// Longest accepted location text.
pub const MAX_LOCATION_LENGTH: usize = 200;
