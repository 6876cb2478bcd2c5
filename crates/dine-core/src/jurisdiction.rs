//! # Jurisdiction Module
//!
//! Maps a free-text restaurant location to a sales-tax percentage.
//!
//! ## Lookup Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  "Downtown Portland, OR"                                                │
//! │        │                                                                │
//! │        ▼  lowercase                                                     │
//! │  "downtown portland, or"                                                │
//! │        │                                                                │
//! │        ▼  walk the table in declaration order                           │
//! │  seattle?  new york?  ...  portland? ✔ → 0%                             │
//! │                                                                         │
//! │  First key contained in the input wins. No match → 8%.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! First-match is kept even though a location can contain more than one key
//! (a street named after another city); longest-match would change results
//! for inputs that resolve today.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use ts_rs::TS;

use crate::types::Percentage;

/// Rate applied when no jurisdiction matches, in basis points (8.00%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 800;

/// Built-in jurisdictions as (key, basis points), in lookup order.
const BUILTIN_JURISDICTIONS: &[(&str, u32)] = &[
    ("seattle", 1025),
    ("new york", 825),
    ("san francisco", 875),
    ("los angeles", 950),
    ("chicago", 1025),
    ("miami", 700),
    ("austin", 825),
    ("denver", 831),
    ("portland", 0), // Oregon has no sales tax
    ("boston", 625),
];

// =============================================================================
// Tax Jurisdiction
// =============================================================================

/// One row of the jurisdiction table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxJurisdiction {
    /// Lowercase substring looked for in the location text.
    pub key: String,

    /// Sales tax percentage for this jurisdiction.
    #[ts(as = "String")]
    pub rate: Percentage,
}

impl TaxJurisdiction {
    /// Creates an entry; the key is trimmed and lowercased.
    pub fn new(key: &str, rate: Percentage) -> Self {
        TaxJurisdiction {
            key: key.trim().to_lowercase(),
            rate,
        }
    }

    /// An empty key never matches, otherwise it would swallow every input.
    fn matches(&self, normalized_location: &str) -> bool {
        !self.key.is_empty() && normalized_location.contains(self.key.as_str())
    }
}

// =============================================================================
// Tax Table
// =============================================================================

/// An ordered jurisdiction table plus its fallback rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTable {
    jurisdictions: Vec<TaxJurisdiction>,
    default_rate: Percentage,
}

impl TaxTable {
    /// Creates a table; `jurisdictions` order is the lookup order.
    pub fn new(jurisdictions: Vec<TaxJurisdiction>, default_rate: Percentage) -> Self {
        TaxTable {
            jurisdictions,
            default_rate,
        }
    }

    /// The process-wide built-in table (ten US cities, 8% default).
    pub fn builtin() -> &'static TaxTable {
        static BUILTIN: OnceLock<TaxTable> = OnceLock::new();
        BUILTIN.get_or_init(|| {
            let jurisdictions = BUILTIN_JURISDICTIONS
                .iter()
                .map(|(key, bps)| TaxJurisdiction::new(key, Percentage::from_bps(*bps)))
                .collect();
            TaxTable::new(jurisdictions, Percentage::from_bps(DEFAULT_TAX_RATE_BPS))
        })
    }

    /// Returns a copy of this table with a different fallback rate.
    pub fn with_default_rate(mut self, default_rate: Percentage) -> Self {
        self.default_rate = default_rate;
        self
    }

    /// The rate used when nothing matches.
    #[inline]
    pub fn default_rate(&self) -> Percentage {
        self.default_rate
    }

    /// The entries in lookup order.
    #[inline]
    pub fn jurisdictions(&self) -> &[TaxJurisdiction] {
        &self.jurisdictions
    }

    /// Finds the first entry whose key occurs in `location` (case-insensitive).
    pub fn lookup(&self, location: &str) -> Option<&TaxJurisdiction> {
        let normalized = location.to_lowercase();
        self.jurisdictions.iter().find(|j| j.matches(&normalized))
    }

    /// Resolves a location to a tax rate; never fails.
    pub fn resolve(&self, location: &str) -> Percentage {
        self.lookup(location)
            .map(|j| j.rate)
            .unwrap_or(self.default_rate)
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        TaxTable::builtin().clone()
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// Resolves a free-text location against the built-in table.
///
/// ## Example
/// ```rust
/// use dine_core::jurisdiction::resolve_tax_rate;
/// use dine_core::types::Percentage;
///
/// assert_eq!(resolve_tax_rate("Seattle, WA"), Percentage::from_bps(1025));
/// assert_eq!(resolve_tax_rate("Nowhere, XX"), Percentage::from_bps(800));
/// assert_eq!(resolve_tax_rate(""), Percentage::from_bps(800));
/// ```
pub fn resolve_tax_rate(location: &str) -> Percentage {
    TaxTable::builtin().resolve(location)
}

/// Reports which built-in entry a location matched, if any.
pub fn resolve_jurisdiction(location: &str) -> Option<&'static TaxJurisdiction> {
    TaxTable::builtin().lookup(location)
}

// =============================================================================
// Unit Tests
// =============================================================================
