//! # Estimator Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DINE_DEFAULT_TAX_RATE=8.5                                          │
//! │     DINE_DEFAULT_TIP=20                                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/dine-assistant/estimator.toml (Linux)                    │
//! │     ~/Library/Application Support/com.dine.assistant/estimator.toml    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     built-in city table, 8% fallback, 18% tip                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [tax]
//! default_rate = 8.0
//!
//! # When present, replaces the built-in city table (order = lookup order)
//! [[tax.jurisdictions]]
//! key = "toronto"
//! rate = 13.0
//!
//! [tip]
//! default_percentage = 18
//!
//! [session]
//! notify_unchanged = true
//! default_party_size = 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use dine_core::jurisdiction::DEFAULT_TAX_RATE_BPS;
use dine_core::tip::DEFAULT_TIP_PERCENTAGE;
use dine_core::validation::validate_tax_rate;
use dine_core::{Percentage, TaxJurisdiction, TaxTable, TipPolicy, TIP_PRESETS};

use crate::error::{SessionError, SessionResult};

// =============================================================================
// Tax Settings
// =============================================================================

/// One configured jurisdiction row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionEntry {
    /// Substring looked for in the location (case-insensitive).
    pub key: String,

    /// Sales tax percentage.
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxSettings {
    /// Rate used when no jurisdiction matches.
    #[serde(default = "default_tax_rate")]
    pub default_rate: f64,

    /// Replacement table. Empty keeps the built-in cities.
    #[serde(default)]
    pub jurisdictions: Vec<JurisdictionEntry>,
}

fn default_tax_rate() -> f64 {
    f64::from(DEFAULT_TAX_RATE_BPS) / 100.0
}

impl Default for TaxSettings {
    fn default() -> Self {
        TaxSettings {
            default_rate: default_tax_rate(),
            jurisdictions: Vec::new(),
        }
    }
}

// =============================================================================
// Tip Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TipSettings {
    /// Tip selected when a session starts.
    /// A preset value selects the preset button; anything else is custom.
    #[serde(default = "default_tip_percentage")]
    pub default_percentage: f64,
}

fn default_tip_percentage() -> f64 {
    f64::from(DEFAULT_TIP_PERCENTAGE)
}

impl Default for TipSettings {
    fn default() -> Self {
        TipSettings {
            default_percentage: default_tip_percentage(),
        }
    }
}

// =============================================================================
// Session Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Call observers even when the result equals the previous one.
    #[serde(default = "default_true")]
    pub notify_unchanged: bool,

    /// Party size before the UI supplies one.
    #[serde(default = "default_party_size")]
    pub default_party_size: i64,
}

fn default_true() -> bool {
    true
}

fn default_party_size() -> i64 {
    2
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            notify_unchanged: default_true(),
            default_party_size: default_party_size(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete estimator configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    #[serde(default)]
    pub tax: TaxSettings,

    #[serde(default)]
    pub tip: TipSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl EstimatorConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (estimator.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SessionResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading estimator config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load estimator config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SessionResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SessionError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Estimator config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SessionResult<()> {
        let default_rate = Percentage::from_f64(self.tax.default_rate)?;
        validate_tax_rate(default_rate).map_err(|_| {
            SessionError::InvalidConfig(format!(
                "tax.default_rate must be between 0 and 100, got {}",
                self.tax.default_rate
            ))
        })?;

        for entry in &self.tax.jurisdictions {
            if entry.key.trim().is_empty() {
                return Err(SessionError::InvalidConfig(
                    "tax.jurisdictions entries need a non-empty key".into(),
                ));
            }

            let rate = Percentage::from_f64(entry.rate)?;
            validate_tax_rate(rate).map_err(|_| {
                SessionError::InvalidConfig(format!(
                    "rate for '{}' must be between 0 and 100, got {}",
                    entry.key, entry.rate
                ))
            })?;
        }

        Percentage::from_f64(self.tip.default_percentage)?;

        if self.session.default_party_size < 1 {
            return Err(SessionError::InvalidConfig(
                "session.default_party_size must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Builds the jurisdiction table this configuration describes.
    pub fn tax_table(&self) -> SessionResult<TaxTable> {
        let default_rate = Percentage::from_f64(self.tax.default_rate)?;

        if self.tax.jurisdictions.is_empty() {
            return Ok(TaxTable::builtin().clone().with_default_rate(default_rate));
        }

        let jurisdictions = self
            .tax
            .jurisdictions
            .iter()
            .map(|entry| Ok(TaxJurisdiction::new(&entry.key, Percentage::from_f64(entry.rate)?)))
            .collect::<SessionResult<Vec<_>>>()?;

        Ok(TaxTable::new(jurisdictions, default_rate))
    }

    /// The tip policy a new session starts with.
    pub fn initial_tip(&self) -> SessionResult<TipPolicy> {
        let pct = Percentage::from_f64(self.tip.default_percentage)?;

        let preset = TIP_PRESETS
            .iter()
            .copied()
            .find(|p| Percentage::whole(*p) == pct);

        match preset {
            Some(p) => Ok(TipPolicy::preset(p)?),
            None => Ok(TipPolicy::custom(pct)),
        }
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(rate) = lookup("DINE_DEFAULT_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(r) => {
                    debug!(rate = r, "Overriding default tax rate from environment");
                    self.tax.default_rate = r;
                }
                Err(_) => warn!(value = %rate, "Ignoring unparseable DINE_DEFAULT_TAX_RATE"),
            }
        }

        if let Some(tip) = lookup("DINE_DEFAULT_TIP") {
            match tip.trim().trim_end_matches('%').parse::<f64>() {
                Ok(t) => {
                    debug!(tip = t, "Overriding default tip from environment");
                    self.tip.default_percentage = t;
                }
                Err(_) => warn!(value = %tip, "Ignoring unparseable DINE_DEFAULT_TIP"),
            }
        }

        if let Some(flag) = lookup("DINE_NOTIFY_UNCHANGED") {
            match flag.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.session.notify_unchanged = true,
                "0" | "false" | "no" => self.session.notify_unchanged = false,
                _ => warn!(value = %flag, "Unknown DINE_NOTIFY_UNCHANGED value"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "dine", "assistant")
            .map(|dirs| dirs.config_dir().join("estimator.toml"))
    }
}
