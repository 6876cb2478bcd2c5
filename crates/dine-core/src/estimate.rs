//! # Estimation Calculator
//!
//! Turns an order, a party size, a tax rate and a tip rate into a
//! `BillEstimation`.
//!
//! ## Computation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items ──► subtotal = Σ price              (integer cents, exact)       │
//! │                │                                                        │
//! │                ├──► tax   = subtotal × tax% / 100   (Decimal, exact)    │
//! │                ├──► tip   = subtotal × tip% / 100   (Decimal, exact)    │
//! │                ▼                                                        │
//! │            total = subtotal + tax + tip                                 │
//! │                │                                                        │
//! │                ▼                                                        │
//! │       per person = total / max(1, party size)                           │
//! │                                                                         │
//! │  Rounded view: tax and tip rounded half-up to cents, total = sum of     │
//! │  the rounded lines, equal split shares sum to that total exactly.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Absence vs Zero
//! An empty order yields `None`. An order of free items yields a
//! `BillEstimation` whose amounts are all zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::jurisdiction::{resolve_tax_rate, TaxTable};
use crate::money::{EvenShares, Money};
use crate::tip::TipPolicy;
use crate::types::{LineItem, Percentage};

// =============================================================================
// Result Types
// =============================================================================

/// The full breakdown of one bill.
///
/// A value: every input change produces a new one, nothing is mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillEstimation {
    /// Sum of item prices.
    pub subtotal: Money,

    /// Sales tax percentage applied.
    #[ts(as = "String")]
    pub tax_rate: Percentage,

    /// `subtotal * tax_rate / 100`, unrounded.
    #[ts(as = "String")]
    pub tax_amount: Decimal,

    /// Tip percentage applied.
    #[ts(as = "String")]
    pub tip_rate: Percentage,

    /// `subtotal * tip_rate / 100`, unrounded.
    #[ts(as = "String")]
    pub tip_amount: Decimal,

    /// `subtotal + tax_amount + tip_amount`, unrounded.
    #[ts(as = "String")]
    pub total: Decimal,

    /// `total / max(1, party_size)`, unrounded.
    #[ts(as = "String")]
    pub per_person_amount: Decimal,

    /// Party size as supplied by the caller.
    pub party_size: i64,

    /// The items this estimation was computed from.
    pub line_items: Vec<LineItem>,

    /// Display strings for the breakdown panel.
    pub breakdown_labels: BreakdownLabels,

    /// The breakdown rounded to whole cents.
    pub rounded: RoundedBreakdown,

    /// Present only for parties larger than one.
    pub split: Option<SplitOptions>,
}

impl BillEstimation {
    /// The divisor used for per-person amounts.
    #[inline]
    pub fn effective_party_size(&self) -> i64 {
        effective_party_size(self.party_size)
    }

    /// The equal split, if the party has more than one diner.
    pub fn equal_split(&self) -> Option<&EqualSplit> {
        self.split.as_ref().map(|s| &s.equal)
    }

    /// True for an order whose items are all free.
    pub fn is_zero_cost(&self) -> bool {
        self.total.is_zero()
    }
}

/// The breakdown in whole cents, as printed.
///
/// `total` is the sum of the rounded lines so the printed breakdown adds up;
/// it can differ by a cent from rounding the exact total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundedBreakdown {
    pub subtotal: Money,
    pub tax: Money,
    pub tip: Money,
    pub total: Money,
    pub per_person: Money,
}

impl RoundedBreakdown {
    fn from_exact(subtotal: Money, tax: Decimal, tip: Decimal, divisor: i64) -> Self {
        let tax = Money::from_decimal_rounded(tax);
        let tip = Money::from_decimal_rounded(tip);
        let total = subtotal + tax + tip;
        let per_person = Money::from_decimal_rounded(divide(total.to_decimal(), divisor));

        RoundedBreakdown {
            subtotal,
            tax,
            tip,
            total,
            per_person,
        }
    }
}

/// Human-readable breakdown lines, e.g. `tax: "8.25% = $2.89"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BreakdownLabels {
    pub subtotal: String,
    pub tax: String,
    pub tip: String,
    pub total: String,
    pub per_person: String,
}

impl BreakdownLabels {
    fn new(rounded: &RoundedBreakdown, tax_rate: Percentage, tip_rate: Percentage) -> Self {
        BreakdownLabels {
            subtotal: rounded.subtotal.to_string(),
            tax: format!("{} = {}", tax_rate, rounded.tax),
            tip: format!("{} = {}", tip_rate, rounded.tip),
            total: rounded.total.to_string(),
            per_person: rounded.per_person.to_string(),
        }
    }
}

/// Split options offered when `party_size > 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SplitOptions {
    pub equal: EqualSplit,
    pub itemized: ItemizedSplit,
}

/// Everyone pays the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EqualSplit {
    pub party_size: i64,

    /// Same value as `BillEstimation::per_person_amount`.
    #[ts(as = "String")]
    pub per_person: Decimal,

    /// Cent shares of the rounded total; they sum to it exactly.
    pub shares: EvenShares,
}

/// Per-diner itemized splitting.
///
/// Not computed here: dividing dishes among diners is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemizedSplit {
    CallerManaged,
}

// =============================================================================
// Change Notification
// =============================================================================

/// Receives every completed computation, including absence.
pub trait EstimationObserver {
    fn on_estimation_change(&mut self, estimation: Option<&BillEstimation>);
}

impl<F> EstimationObserver for F
where
    F: FnMut(Option<&BillEstimation>),
{
    fn on_estimation_change(&mut self, estimation: Option<&BillEstimation>) {
        self(estimation)
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Party sizes below one divide by one.
#[inline]
pub fn effective_party_size(party_size: i64) -> i64 {
    party_size.max(1)
}

fn divide(amount: Decimal, divisor: i64) -> Decimal {
    // divisor >= 1, so this only guards the operator
    amount.checked_div(Decimal::from(divisor)).unwrap_or(amount)
}

/// Computes the breakdown for explicit rates.
///
/// ## Example
/// ```rust
/// use dine_core::estimate::compute;
/// use dine_core::money::Money;
/// use dine_core::types::{LineItem, Percentage};
/// use rust_decimal::Decimal;
///
/// let items = vec![
///     LineItem::new("Brisket", Money::from_cents(2000), "Mains"),
///     LineItem::new("Pecan Pie", Money::from_cents(1500), "Dessert"),
/// ];
/// let bill = compute(&items, 2, Percentage::from_bps(825), Percentage::whole(20)).unwrap();
///
/// assert_eq!(bill.total, Decimal::new(448875, 4));            // 44.8875
/// assert_eq!(bill.per_person_amount, Decimal::new(2244375, 5)); // 22.44375
/// assert!(compute(&[], 2, Percentage::ZERO, Percentage::ZERO).is_none());
/// ```
pub fn compute(
    items: &[LineItem],
    party_size: i64,
    tax_rate: Percentage,
    tip_rate: Percentage,
) -> Option<BillEstimation> {
    if items.is_empty() {
        return None;
    }

    let subtotal: Money = items.iter().map(LineItem::price).sum();
    let exact_subtotal = subtotal.to_decimal();

    // normalize() only drops trailing zeros so serialized amounts read "2.8875"
    let tax_amount = tax_rate.apply_to(exact_subtotal).normalize();
    let tip_amount = tip_rate.apply_to(exact_subtotal).normalize();
    let total = exact_subtotal
        .saturating_add(tax_amount)
        .saturating_add(tip_amount)
        .normalize();

    let divisor = effective_party_size(party_size);
    let per_person_amount = divide(total, divisor).normalize();

    let rounded = RoundedBreakdown::from_exact(subtotal, tax_amount, tip_amount, divisor);
    let breakdown_labels = BreakdownLabels::new(&rounded, tax_rate, tip_rate);

    let split = (party_size > 1).then(|| SplitOptions {
        equal: EqualSplit {
            party_size,
            per_person: per_person_amount,
            shares: rounded.total.split_evenly(party_size),
        },
        itemized: ItemizedSplit::CallerManaged,
    });

    Some(BillEstimation {
        subtotal,
        tax_rate,
        tax_amount,
        tip_rate,
        tip_amount,
        total,
        per_person_amount,
        party_size,
        line_items: items.to_vec(),
        breakdown_labels,
        rounded,
        split,
    })
}

/// Estimates a bill from a free-text location and a tip selection.
pub fn estimate(
    items: &[LineItem],
    party_size: i64,
    location: &str,
    tip: &TipPolicy,
) -> Option<BillEstimation> {
    compute(items, party_size, resolve_tax_rate(location), tip.percentage())
}

/// Same as [`estimate`], resolving the location against `table`.
pub fn estimate_with_table(
    items: &[LineItem],
    party_size: i64,
    location: &str,
    tip: &TipPolicy,
    table: &TaxTable,
) -> Option<BillEstimation> {
    compute(items, party_size, table.resolve(location), tip.percentage())
}

/// Estimates and reports the result to `observer` exactly once.
pub fn estimate_and_notify<O>(
    items: &[LineItem],
    party_size: i64,
    location: &str,
    tip: &TipPolicy,
    observer: &mut O,
) -> Option<BillEstimation>
where
    O: EstimationObserver + ?Sized,
{
    let estimation = estimate(items, party_size, location, tip);
    observer.on_estimation_change(estimation.as_ref());
    estimation
}

// =============================================================================
// Unit Tests
// =============================================================================
