//! # Tip Policy
//!
//! Holds the selected gratuity percentage and where it came from.
//!
//! ## Selection Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   [15%] [18%] [20%] [22%] [25%]     Custom: [ 17.5 ] %                  │
//! │                                                                         │
//! │   Clicking a preset  → mode = Preset, percentage = preset               │
//! │   Typing a custom    → mode = Custom, percentage = whatever was typed   │
//! │                                                                         │
//! │   A preset button is highlighted whenever the current percentage        │
//! │   equals it, even if the value was typed into the custom field.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::Percentage;

/// Preset tip buttons, in display order.
pub const TIP_PRESETS: [u32; 5] = [15, 18, 20, 22, 25];

/// Tip used before the diner picks anything.
pub const DEFAULT_TIP_PERCENTAGE: u32 = 18;

/// Where the current tip percentage came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TipMode {
    /// One of `TIP_PRESETS`.
    #[default]
    Preset,
    /// A value typed by the diner.
    Custom,
}

/// The selected gratuity rate and its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TipPolicy {
    mode: TipMode,
    #[ts(as = "String")]
    percentage: Percentage,
}

impl TipPolicy {
    /// Selects one of the preset buttons.
    ///
    /// ## Errors
    /// `CoreError::UnknownTipPreset` if `pct` is not in `TIP_PRESETS`.
    pub fn preset(pct: u32) -> CoreResult<Self> {
        if !TIP_PRESETS.contains(&pct) {
            return Err(CoreError::UnknownTipPreset(pct));
        }

        Ok(TipPolicy {
            mode: TipMode::Preset,
            percentage: Percentage::whole(pct),
        })
    }

    /// Uses a custom percentage. Any value is accepted.
    ///
    /// ## Example
    /// ```rust
    /// use dine_core::tip::{TipMode, TipPolicy};
    /// use dine_core::types::Percentage;
    ///
    /// let tip = TipPolicy::custom(Percentage::from_bps(1750));
    /// assert_eq!(tip.mode(), TipMode::Custom);
    /// assert_eq!(tip.percentage().to_string(), "17.5%");
    /// ```
    pub fn custom(pct: Percentage) -> Self {
        TipPolicy {
            mode: TipMode::Custom,
            percentage: pct,
        }
    }

    /// Switches to a preset, overwriting any custom value.
    pub fn select_preset(&mut self, pct: u32) -> CoreResult<()> {
        *self = TipPolicy::preset(pct)?;
        Ok(())
    }

    /// Switches to a custom value.
    pub fn set_custom(&mut self, pct: Percentage) {
        *self = TipPolicy::custom(pct);
    }

    /// Whether the tip came from a preset button or the custom field.
    #[inline]
    pub fn mode(&self) -> TipMode {
        self.mode
    }

    /// The raw percentage the calculator applies.
    #[inline]
    pub fn percentage(&self) -> Percentage {
        self.percentage
    }

    /// The percentage clamped into 0..=100 for display.
    pub fn display_percentage(&self) -> Percentage {
        self.percentage.clamp(Percentage::ZERO, Percentage::HUNDRED)
    }

    /// Whether the preset button `pct` should render as selected.
    pub fn is_preset_selected(&self, pct: u32) -> bool {
        self.percentage == Percentage::whole(pct)
    }

    /// The preset button values.
    #[inline]
    pub fn presets() -> &'static [u32] {
        &TIP_PRESETS
    }
}

impl Default for TipPolicy {
    fn default() -> Self {
        TipPolicy {
            mode: TipMode::Preset,
            percentage: Percentage::whole(DEFAULT_TIP_PERCENTAGE),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_eighteen_percent_preset() {
        let tip = TipPolicy::default();
        assert_eq!(tip.mode(), TipMode::Preset);
        assert_eq!(tip.percentage(), Percentage::whole(18));
        assert!(tip.is_preset_selected(18));
    }

    #[test]
    fn test_presets() {
        for pct in TIP_PRESETS {
            let tip = TipPolicy::preset(pct).unwrap();
            assert_eq!(tip.percentage(), Percentage::whole(pct));
        }
        assert!(matches!(TipPolicy::preset(17), Err(CoreError::UnknownTipPreset(17))));
        assert_eq!(TipPolicy::presets(), &[15, 18, 20, 22, 25]);
    }

    #[test]
    fn test_switching_preset_overwrites_custom() {
        let mut tip = TipPolicy::custom(Percentage::from_bps(1750));
        tip.select_preset(22).unwrap();
        assert_eq!(tip.mode(), TipMode::Preset);
        assert_eq!(tip.percentage(), Percentage::whole(22));
    }

    #[test]
    fn test_unknown_preset_leaves_policy_untouched() {
        let mut tip = TipPolicy::preset(20).unwrap();
        assert!(tip.select_preset(30).is_err());
        assert_eq!(tip.percentage(), Percentage::whole(20));
    }

    #[test]
    fn test_custom_accepts_anything() {
        let mut tip = TipPolicy::default();
        tip.set_custom(Percentage::whole(150));
        assert_eq!(tip.mode(), TipMode::Custom);
        assert_eq!(tip.percentage(), Percentage::whole(150));
        assert_eq!(tip.display_percentage(), Percentage::HUNDRED);

        tip.set_custom("-5".parse().unwrap());
        assert_eq!(tip.display_percentage(), Percentage::ZERO);
    }

    #[test]
    fn test_custom_value_matching_a_preset_highlights_it() {
        let tip = TipPolicy::custom(Percentage::whole(20));
        assert_eq!(tip.mode(), TipMode::Custom);
        assert!(tip.is_preset_selected(20));
        assert!(!tip.is_preset_selected(18));
    }
}
