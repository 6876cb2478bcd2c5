//! # Bill Session
//!
//! Holds the current estimation inputs and recomputes on every change.
//!
//! ## Update Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  UI Action                 Session Call              Input Change       │
//! │  ─────────                 ────────────              ────────────       │
//! │  Pick menu items ────────► set_items() ────────────► items              │
//! │  Change party size ──────► set_party_size() ───────► party_size         │
//! │  Open restaurant ────────► set_location() ─────────► location, tax rate │
//! │  Click tip button ───────► select_tip_preset() ────► tip                │
//! │  Type custom tip ────────► set_custom_tip() ───────► tip                │
//! │  Edit tax field ─────────► set_tax_rate() ─────────► tax rate (manual)  │
//! │                                                                         │
//! │  Every call: lock → change input → compute → notify → unlock            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Computation and notification both happen while the session lock is held,
//! so observers and the watch channel see results in input order. Observers
//! must not call back into the same session.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use dine_core::validation::{
    validate_line_items, validate_location, validate_party_size, validate_tax_rate,
    validate_tip_percentage,
};
use dine_core::{
    compute, BillEstimation, EstimationObserver, LineItem, Percentage, TaxTable, TipPolicy,
};

use crate::config::EstimatorConfig;
use crate::error::SessionResult;

/// Handle returned by [`BillSession::subscribe`].
pub type SubscriptionId = u64;

// =============================================================================
// Inputs
// =============================================================================

/// Where the current tax rate came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaxSource {
    /// No location yet; the table's fallback rate.
    Default,
    /// Resolved from the location text. `None` means no key matched.
    Location { jurisdiction: Option<String> },
    /// Typed into the tax field.
    Manual,
}

/// The four estimation inputs plus the tax rate's provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInputs {
    pub items: Vec<LineItem>,
    pub party_size: i64,
    pub location: String,
    pub tip: TipPolicy,
    pub tax_rate: Percentage,
    pub tax_source: TaxSource,
}

/// What the watch channel carries.
#[derive(Debug, Clone)]
pub struct EstimationUpdate {
    /// Increments on every computation; 0 before the first one.
    pub generation: u64,
    pub computed_at: DateTime<Utc>,
    pub estimation: Option<BillEstimation>,
}

// =============================================================================
// Session State
// =============================================================================

struct SessionState {
    inputs: SessionInputs,
    last: Option<BillEstimation>,
    generation: u64,
    observers: Vec<(SubscriptionId, Box<dyn EstimationObserver + Send>)>,
    next_subscription: SubscriptionId,
    updates: watch::Sender<EstimationUpdate>,
}

/// A reactive bill estimation session.
///
/// Cloning shares the same state, the way one cart is shared between
/// commands.
#[derive(Clone)]
pub struct BillSession {
    state: Arc<Mutex<SessionState>>,
    table: Arc<TaxTable>,
    notify_unchanged: bool,
}

impl BillSession {
    /// Creates a session from configuration.
    pub fn new(config: &EstimatorConfig) -> SessionResult<Self> {
        let table = config.tax_table()?;
        let tip = config.initial_tip()?;

        info!(
            jurisdictions = table.jurisdictions().len(),
            default_tax = %table.default_rate(),
            tip = %tip.percentage(),
            "Bill session created"
        );

        Ok(Self::with_parts(
            table,
            tip,
            config.session.default_party_size,
            config.session.notify_unchanged,
        ))
    }

    /// Creates a session with the built-in table and default tip.
    pub fn with_defaults() -> Self {
        Self::with_parts(TaxTable::builtin().clone(), TipPolicy::default(), 1, true)
    }

    fn with_parts(table: TaxTable, tip: TipPolicy, party_size: i64, notify_unchanged: bool) -> Self {
        let (updates, _) = watch::channel(EstimationUpdate {
            generation: 0,
            computed_at: Utc::now(),
            estimation: None,
        });

        let inputs = SessionInputs {
            items: Vec::new(),
            party_size,
            location: String::new(),
            tip,
            tax_rate: table.default_rate(),
            tax_source: TaxSource::Default,
        };

        BillSession {
            state: Arc::new(Mutex::new(SessionState {
                inputs,
                last: None,
                generation: 0,
                observers: Vec::new(),
                next_subscription: 1,
                updates,
            })),
            table: Arc::new(table),
            notify_unchanged,
        }
    }

    // =========================================================================
    // Input Setters
    // =========================================================================

    /// Replaces the ordered items.
    ///
    /// Rejects blank ids/names, negative prices and duplicate ids; the
    /// previous items stay in place on error.
    pub fn set_items(&self, items: Vec<LineItem>) -> SessionResult<Option<BillEstimation>> {
        validate_line_items(&items)?;
        Ok(self.update(|inputs| inputs.items = items))
    }

    /// Sets the party size. Values outside 1..=12 are logged and still used;
    /// the calculator divides by at least one.
    pub fn set_party_size(&self, party_size: i64) -> Option<BillEstimation> {
        if let Err(e) = validate_party_size(party_size) {
            warn!(party_size, error = %e, "Unusual party size");
        }
        self.update(|inputs| inputs.party_size = party_size)
    }

    /// Sets the restaurant location.
    ///
    /// A non-empty location resolves the tax rate through the table and
    /// replaces any manual rate. An empty location keeps the current rate.
    pub fn set_location(&self, location: impl Into<String>) -> SessionResult<Option<BillEstimation>> {
        let location = location.into();
        validate_location(&location)?;

        let table = Arc::clone(&self.table);
        Ok(self.update(move |inputs| {
            if !location.trim().is_empty() {
                let matched = table.lookup(&location);
                match matched {
                    Some(j) => debug!(key = %j.key, rate = %j.rate, "Location matched jurisdiction"),
                    None => info!(
                        location = %location,
                        rate = %table.default_rate(),
                        "No jurisdiction matched, using default tax rate"
                    ),
                }

                inputs.tax_rate = table.resolve(&location);
                inputs.tax_source = TaxSource::Location {
                    jurisdiction: matched.map(|j| j.key.clone()),
                };
            }
            inputs.location = location;
        }))
    }

    /// Selects a preset tip button.
    pub fn select_tip_preset(&self, pct: u32) -> SessionResult<Option<BillEstimation>> {
        let tip = TipPolicy::preset(pct)?;
        Ok(self.update(|inputs| inputs.tip = tip))
    }

    /// Uses a custom tip. Values outside the 0-50% hint are logged, not refused;
    /// amounts beyond `Decimal` range saturate.
    pub fn set_custom_tip(&self, pct: Percentage) -> Option<BillEstimation> {
        if let Err(e) = validate_tip_percentage(pct) {
            warn!(tip = %pct, error = %e, "Custom tip outside suggested range");
        }
        self.update(|inputs| inputs.tip.set_custom(pct))
    }

    /// Overrides the tax rate by hand.
    pub fn set_tax_rate(&self, rate: Percentage) -> SessionResult<Option<BillEstimation>> {
        validate_tax_rate(rate)?;
        Ok(self.update(|inputs| {
            inputs.tax_rate = rate;
            inputs.tax_source = TaxSource::Manual;
        }))
    }

    /// Drops a manual tax rate and re-resolves from the current location.
    pub fn clear_tax_override(&self) -> Option<BillEstimation> {
        let table = Arc::clone(&self.table);
        self.update(move |inputs| {
            if inputs.location.trim().is_empty() {
                inputs.tax_rate = table.default_rate();
                inputs.tax_source = TaxSource::Default;
            } else {
                inputs.tax_rate = table.resolve(&inputs.location);
                inputs.tax_source = TaxSource::Location {
                    jurisdiction: table.lookup(&inputs.location).map(|j| j.key.clone()),
                };
            }
        })
    }

    /// Recomputes with unchanged inputs.
    pub fn recompute(&self) -> Option<BillEstimation> {
        self.update(|_| {})
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    /// Registers an observer called after every computation.
    pub fn subscribe<O>(&self, observer: O) -> SubscriptionId
    where
        O: EstimationObserver + Send + 'static,
    {
        let mut state = self.lock();
        let id = state.next_subscription;
        state.next_subscription += 1;
        state.observers.push((id, Box::new(observer)));
        debug!(subscription = id, "Estimation observer subscribed");
        id
    }

    /// Removes an observer. Returns false if the id was unknown.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut state = self.lock();
        let before = state.observers.len();
        state.observers.retain(|(sub, _)| *sub != id);
        state.observers.len() != before
    }

    /// A receiver that always holds the latest update.
    pub fn watch(&self) -> watch::Receiver<EstimationUpdate> {
        self.lock().updates.subscribe()
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The last computed estimation (absent before items are added).
    pub fn current(&self) -> Option<BillEstimation> {
        self.lock().last.clone()
    }

    /// A snapshot of the current inputs.
    pub fn inputs(&self) -> SessionInputs {
        self.lock().inputs.clone()
    }

    /// Number of computations so far.
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        // A panicking observer must not wedge the session.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update<F>(&self, change: F) -> Option<BillEstimation>
    where
        F: FnOnce(&mut SessionInputs),
    {
        let mut state = self.lock();
        change(&mut state.inputs);
        self.recompute_locked(&mut state)
    }

    fn recompute_locked(&self, state: &mut SessionState) -> Option<BillEstimation> {
        let inputs = &state.inputs;
        let estimation = compute(
            &inputs.items,
            inputs.party_size,
            inputs.tax_rate,
            inputs.tip.percentage(),
        );

        state.generation += 1;
        debug!(
            generation = state.generation,
            items = inputs.items.len(),
            party_size = inputs.party_size,
            tax_rate = %inputs.tax_rate,
            tip = %inputs.tip.percentage(),
            total = ?estimation.as_ref().map(|e| e.total),
            "Bill estimation recomputed"
        );

        let changed = state.last != estimation;
        if changed || self.notify_unchanged {
            for (_, observer) in state.observers.iter_mut() {
                observer.on_estimation_change(estimation.as_ref());
            }
        }

        state.updates.send_replace(EstimationUpdate {
            generation: state.generation,
            computed_at: Utc::now(),
            estimation: estimation.clone(),
        });

        state.last = estimation.clone();
        estimation
    }
}

impl Default for BillSession {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for BillSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("BillSession")
            .field("inputs", &state.inputs)
            .field("generation", &state.generation)
            .field("observers", &state.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JurisdictionEntry;
    use crate::error::SessionError;
    use dine_core::Money;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn item(id: &str, cents: i64) -> LineItem {
        LineItem::with_id(id, format!("Dish {}", id), Money::from_cents(cents), "Mains")
    }

    fn recorder(session: &BillSession) -> Arc<Mutex<Vec<Option<Decimal>>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        session.subscribe(move |e: Option<&BillEstimation>| {
            sink.lock().unwrap().push(e.map(|b| b.total));
        });
        seen
    }

    #[test]
    fn test_new_session_is_absent() {
        let session = BillSession::with_defaults();
        assert!(session.current().is_none());
        assert_eq!(session.generation(), 0);
        assert_eq!(session.inputs().tax_rate, Percentage::from_bps(800));
        assert_eq!(session.inputs().tax_source, TaxSource::Default);
    }

    #[test]
    fn test_end_to_end_through_setters() {
        let session = BillSession::with_defaults();
        session.set_location("Austin, TX").unwrap();
        session.select_tip_preset(20).unwrap();
        session.set_party_size(2);
        let bill = session
            .set_items(vec![item("a", 2000), item("b", 1500)])
            .unwrap()
            .unwrap();

        assert_eq!(bill.total, dec!(44.8875));
        assert_eq!(bill.per_person_amount, dec!(22.44375));
        assert_eq!(session.current(), Some(bill));
        assert_eq!(session.generation(), 4);
        assert_eq!(
            session.inputs().tax_source,
            TaxSource::Location {
                jurisdiction: Some("austin".to_string())
            }
        );
    }

    #[test]
    fn test_observer_fires_once_per_change_including_absence() {
        let session = BillSession::with_defaults();
        let seen = recorder(&session);

        session.set_items(vec![item("a", 1000)]).unwrap();
        session.set_custom_tip(Percentage::ZERO);
        session.set_items(Vec::new()).unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], Some(dec!(12.6))); // 10 + 8% + 18%
        assert_eq!(seen[1], Some(dec!(10.8)));
        assert_eq!(seen[2], None);
    }

    #[test]
    fn test_unchanged_results_can_be_suppressed() {
        let mut config = EstimatorConfig::default();
        config.session.notify_unchanged = false;
        let session = BillSession::new(&config).unwrap();
        let seen = recorder(&session);

        session.set_items(vec![item("a", 1000)]).unwrap();
        session.recompute();
        session.set_party_size(2); // same as the configured default
        session.set_party_size(3);

        assert_eq!(seen.lock().unwrap().len(), 2);
        assert_eq!(session.generation(), 4);
    }

    #[test]
    fn test_unsubscribe() {
        let session = BillSession::with_defaults();
        let seen = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&seen);
        let id = session.subscribe(move |_: Option<&BillEstimation>| *sink.lock().unwrap() += 1);

        session.set_items(vec![item("a", 500)]).unwrap();
        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.set_party_size(3);

        assert_eq!(*seen.lock().unwrap(), 1);
    }

    #[test]
    fn test_invalid_items_are_rejected_and_keep_previous() {
        let session = BillSession::with_defaults();
        session.set_items(vec![item("a", 500)]).unwrap();

        let err = session.set_items(vec![item("x", 100), item("x", 200)]).unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(session.set_items(vec![item("neg", -1)]).is_err());

        assert_eq!(session.inputs().items, vec![item("a", 500)]);
        assert_eq!(session.generation(), 1);
    }

    #[test]
    fn test_unknown_preset_is_rejected() {
        let session = BillSession::with_defaults();
        assert!(matches!(
            session.select_tip_preset(30),
            Err(SessionError::Core(dine_core::CoreError::UnknownTipPreset(30)))
        ));
        assert_eq!(session.inputs().tip, TipPolicy::default());
    }

    #[test]
    fn test_location_drives_tax_rate() {
        let session = BillSession::with_defaults();
        session.set_items(vec![item("a", 10000)]).unwrap();

        let bill = session.set_location("Downtown Portland").unwrap().unwrap();
        assert!(bill.tax_amount.is_zero());

        let bill = session.set_location("Nowhere, XX").unwrap().unwrap();
        assert_eq!(bill.tax_rate, Percentage::from_bps(800));
        assert_eq!(
            session.inputs().tax_source,
            TaxSource::Location { jurisdiction: None }
        );
    }

    #[test]
    fn test_empty_location_keeps_current_rate() {
        let session = BillSession::with_defaults();
        session.set_location("Seattle").unwrap();
        session.set_location("").unwrap();

        let inputs = session.inputs();
        assert_eq!(inputs.tax_rate, Percentage::from_bps(1025));
        assert_eq!(inputs.location, "");
    }

    #[test]
    fn test_manual_tax_rate_and_reset() {
        let session = BillSession::with_defaults();
        session.set_items(vec![item("a", 10000)]).unwrap();
        session.set_location("Boston").unwrap();

        let bill = session.set_tax_rate("7.5".parse().unwrap()).unwrap().unwrap();
        assert_eq!(bill.tax_amount, dec!(7.5));
        assert_eq!(session.inputs().tax_source, TaxSource::Manual);

        assert!(session.set_tax_rate(Percentage::whole(101)).is_err());

        let bill = session.clear_tax_override().unwrap();
        assert_eq!(bill.tax_rate, Percentage::from_bps(625));

        // A new location replaces a manual rate.
        session.set_tax_rate(Percentage::ZERO).unwrap();
        let bill = session.set_location("Miami").unwrap().unwrap();
        assert_eq!(bill.tax_rate, Percentage::whole(7));
    }

    #[test]
    fn test_config_table_is_used() {
        let mut config = EstimatorConfig::default();
        config.tax.default_rate = 5.0;
        config.tax.jurisdictions.push(JurisdictionEntry {
            key: "toronto".into(),
            rate: 13.0,
        });
        let session = BillSession::new(&config).unwrap();
        session.set_items(vec![item("a", 10000)]).unwrap();

        let bill = session.set_location("Toronto, ON").unwrap().unwrap();
        assert_eq!(bill.tax_amount, dec!(13));

        let bill = session.set_location("Seattle").unwrap().unwrap();
        assert_eq!(bill.tax_amount, dec!(5));
        assert_eq!(session.inputs().party_size, 2);
    }

    #[test]
    fn test_odd_party_size_is_still_applied() {
        let session = BillSession::with_defaults();
        session.set_items(vec![item("a", 1000)]).unwrap();

        let zero = session.set_party_size(0).unwrap();
        let one = session.set_party_size(1).unwrap();
        assert_eq!(zero.per_person_amount, one.per_person_amount);
        assert_eq!(session.set_party_size(40).unwrap().party_size, 40);
    }

    #[test]
    fn test_huge_party_size_keeps_session_usable() {
        let session = BillSession::with_defaults();
        session.set_items(vec![item("a", 2000)]).unwrap();

        let parts = 1_000_000_000_000_000;
        let bill = session.set_party_size(parts).unwrap();
        let shares = bill.equal_split().unwrap().shares;
        assert_eq!(shares.parts, parts);
        assert_eq!(shares.total(), bill.rounded.total);

        assert!(session.set_party_size(i64::MAX).is_some());
        assert_eq!(session.set_party_size(2).unwrap().party_size, 2);
    }

    #[test]
    fn test_extreme_custom_tip_is_applied_saturated() {
        let session = BillSession::with_defaults();
        session.set_location("Austin").unwrap();
        session.set_items(vec![item("a", 100000)]).unwrap();

        let huge = Percentage::from_decimal(Decimal::from_scientific("1e27").unwrap());
        let bill = session.set_custom_tip(huge).unwrap();
        assert_eq!(bill.tip_amount, Decimal::from_scientific("1e28").unwrap());
        assert_eq!(bill.rounded.total, Money::from_cents(i64::MAX));

        let bill = session.set_custom_tip(Percentage::from_decimal(Decimal::MAX)).unwrap();
        assert_eq!(bill.total, Decimal::MAX);

        // The session still works after extreme input.
        let bill = session.select_tip_preset(20).unwrap().unwrap();
        assert_eq!(bill.tip_amount, dec!(200));
    }

    #[test]
    fn test_prices_above_ceiling_are_rejected() {
        let session = BillSession::with_defaults();
        let half = i64::MAX / 2 + 1;

        let err = session.set_items(vec![item("a", half), item("b", half)]).unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(session.current().is_none());

        let priciest = item("a", dine_core::MAX_ITEM_PRICE_CENTS);
        assert!(session.set_items(vec![priciest]).unwrap().is_some());
    }

    #[test]
    fn test_panicking_observer_does_not_wedge_session() {
        let session = BillSession::with_defaults();
        session.subscribe(|_: Option<&BillEstimation>| panic!("observer bug"));

        let clone = session.clone();
        let result = std::thread::spawn(move || clone.set_items(vec![item("a", 100)])).join();
        assert!(result.is_err());

        // Poisoned lock is recovered; state reflects the completed input change.
        assert_eq!(session.inputs().items.len(), 1);
    }

    #[tokio::test]
    async fn test_watch_sees_latest_update() {
        let session = BillSession::with_defaults();
        let mut rx = session.watch();
        assert_eq!(rx.borrow().generation, 0);

        session.set_items(vec![item("a", 1000)]).unwrap();
        session.set_party_size(4);
        session.set_items(Vec::new()).unwrap();

        rx.changed().await.unwrap();
        let update = rx.borrow_and_update().clone();
        assert_eq!(update.generation, 3);
        assert!(update.estimation.is_none());
    }

    #[tokio::test]
    async fn test_watch_across_tasks() {
        let session = BillSession::with_defaults();
        let mut rx = session.watch();

        let writer = session.clone();
        tokio::spawn(async move {
            writer.set_items(vec![item("a", 2000)]).unwrap();
        })
        .await
        .unwrap();

        rx.changed().await.unwrap();
        let total = rx.borrow().estimation.as_ref().map(|e| e.total);
        assert_eq!(total, Some(dec!(25.2)));
    }
}
