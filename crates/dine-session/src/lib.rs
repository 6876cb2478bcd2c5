//! # dine-session: Reactive Bill Estimation
//!
//! Keeps the bill panel's inputs and recomputes the estimation through
//! `dine-core` whenever one of them changes.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Session Data Flow                               │
//! │                                                                         │
//! │  EstimatorConfig ──► BillSession::new()                                 │
//! │  (toml + DINE_*)          │                                             │
//! │                           ▼                                             │
//! │  UI input ──► setter ──► SessionInputs ──► dine_core::compute()         │
//! │                                                  │                      │
//! │                          ┌───────────────────────┴──────────┐           │
//! │                          ▼                                  ▼           │
//! │                   observers (callbacks)          watch::Receiver        │
//! │                   Option<&BillEstimation>        EstimationUpdate       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use dine_core::{LineItem, Money};
//! use dine_session::BillSession;
//!
//! let session = BillSession::with_defaults();
//! session.set_location("Seattle, WA").unwrap();
//! let bill = session
//!     .set_items(vec![LineItem::new("Salmon", Money::from_cents(3000), "Mains")])
//!     .unwrap()
//!     .unwrap();
//!
//! assert_eq!(bill.rounded.total, Money::from_cents(3848));
//! ```

use tracing::Level;
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod error;
pub mod session;

pub use config::EstimatorConfig;
pub use error::{SessionError, SessionResult};
pub use session::{BillSession, EstimationUpdate, SessionInputs, SubscriptionId, TaxSource};

/// Installs the fmt subscriber for hosts that have none.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=dine=trace` - Trace for dine crates only
/// - Default: INFO, DEBUG for dine crates
///
/// Returns false when a global subscriber was already set.
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,dine=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice() {
        init_tracing();
        assert!(!init_tracing());
    }
}
