//! # Document Settings
//!
//! Per-document configuration consumed by the pricing engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     INANDOUT_CURRENCY=JPY                                               │
//! │     INANDOUT_ROUNDING_MODE=bankers   (all three rules)                  │
//! │     INANDOUT_FORCE_ITEM_ID=true                                         │
//! │                                                                         │
//! │  2. TOML Settings File                                                  │
//! │     ~/.config/inandout/settings.toml (Linux)                            │
//! │     ~/Library/Application Support/com.inandout.InAndOut/settings.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     USD, every rounding rule = half-up at the currency's minor units    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Settings File Format
//! ```toml
//! force_item_id = false
//! currency = "CAD"
//! always_generate_transaction_id = true
//!
//! [rounding.tax_item]
//! scale = 2
//! mode = "bankers"
//!
//! [rounding.transaction_total]
//! scale = 0
//! mode = "plain"
//! ```
//!
//! A rule left out of `[rounding]` follows the currency.

use inandout_core::{RoundingMode, RoundingRule, RoundingRuleSet, MAX_ROUNDING_SCALE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::currency::{default_rounding_rule, is_well_formed_code, DEFAULT_CURRENCY};
use crate::error::{SettingsError, SettingsResult};

/// File name inside the platform config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

// =============================================================================
// Rounding Settings
// =============================================================================

/// Per-stage overrides. `None` means "follow the currency".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundingSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_item: Option<RoundingRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_total: Option<RoundingRule>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_total: Option<RoundingRule>,
}

impl RoundingSettings {
    fn rules(&self) -> [Option<RoundingRule>; 3] {
        [self.tax_item, self.item_total, self.transaction_total]
    }
}

// =============================================================================
// Document Settings
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSettings {
    /// Every line item must carry an item ID.
    #[serde(default)]
    pub force_item_id: bool,

    /// ISO 4217 code; only its minor units matter to the engine.
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Editors pre-fill a transaction ID for new transactions.
    #[serde(default = "default_true")]
    pub always_generate_transaction_id: bool,

    #[serde(default)]
    pub rounding: RoundingSettings,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DocumentSettings {
    fn default() -> Self {
        DocumentSettings {
            force_item_id: false,
            currency: default_currency(),
            always_generate_transaction_id: true,
            rounding: RoundingSettings::default(),
        }
    }
}

impl DocumentSettings {
    /// Defaults for a given currency.
    pub fn for_currency(currency: impl Into<String>) -> Self {
        DocumentSettings {
            currency: currency.into(),
            ..Self::default()
        }
    }

    /// Loads settings from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Settings file
    /// 3. Environment variables
    pub fn load(path: Option<PathBuf>) -> SettingsResult<Self> {
        let mut settings = Self::default();

        if let Some(path) = path.or_else(Self::default_path) {
            if path.exists() {
                info!(?path, "Loading document settings from file");
                settings = Self::from_file(&path)?;
            } else {
                debug!(?path, "Settings file not found, using defaults");
            }
        }

        settings.apply_overrides(|key| std::env::var(key).ok());
        settings.validate()?;

        Ok(settings)
    }

    /// Parses one settings file without overrides or validation.
    pub fn from_file(path: &Path) -> SettingsResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Writes settings as pretty TOML, creating parent directories.
    pub fn save(&self, path: Option<PathBuf>) -> SettingsResult<PathBuf> {
        let path = path
            .or_else(Self::default_path)
            .ok_or(SettingsError::NoSettingsPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Document settings saved");
        Ok(path)
    }

    /// Validates the settings.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.currency.trim().is_empty() {
            return Err(SettingsError::InvalidConfig(
                "currency must not be empty".into(),
            ));
        }

        if !is_well_formed_code(self.currency.trim()) {
            return Err(SettingsError::InvalidConfig(format!(
                "currency must be a three-letter ISO 4217 code, got: {}",
                self.currency
            )));
        }

        for rule in self.rounding.rules().into_iter().flatten() {
            if rule.scale > MAX_ROUNDING_SCALE {
                return Err(SettingsError::InvalidConfig(format!(
                    "rounding scale must be at most {}, got: {}",
                    MAX_ROUNDING_SCALE, rule.scale
                )));
            }
        }

        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment in
    /// [`DocumentSettings::load`]).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(currency) = lookup("INANDOUT_CURRENCY") {
            debug!(currency = %currency, "Overriding currency from environment");
            self.currency = currency;
        }

        if let Some(mode) = lookup("INANDOUT_ROUNDING_MODE") {
            match mode.parse::<RoundingMode>() {
                Ok(parsed) => {
                    debug!(mode = %parsed, "Overriding rounding mode from environment");
                    self.set_rounding_mode(parsed);
                }
                Err(e) => warn!(mode = %mode, "Ignoring rounding mode override: {}", e),
            }
        }

        if let Some(flag) = lookup("INANDOUT_FORCE_ITEM_ID") {
            match flag.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.force_item_id = true,
                "0" | "false" | "no" | "off" => self.force_item_id = false,
                _ => warn!(value = %flag, "Unknown INANDOUT_FORCE_ITEM_ID value"),
            }
        }
    }

    /// Pins all three rules to `mode`, keeping each rule's current scale.
    pub fn set_rounding_mode(&mut self, mode: RoundingMode) {
        let rules = self.rounding_rules();
        self.rounding = RoundingSettings {
            tax_item: Some(RoundingRule::new(rules.tax_item.scale, mode)),
            item_total: Some(RoundingRule::new(rules.item_total.scale, mode)),
            transaction_total: Some(RoundingRule::new(rules.transaction_total.scale, mode)),
        };
    }

    /// Returns the platform settings file path.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "inandout", "InAndOut")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// The rule a stage falls back to when not set explicitly.
    pub fn currency_default_rule(&self) -> RoundingRule {
        default_rounding_rule(&self.currency)
    }

    /// The effective rule set handed to the engine.
    pub fn rounding_rules(&self) -> RoundingRuleSet {
        let fallback = self.currency_default_rule();
        RoundingRuleSet::new(
            self.rounding.tax_item.unwrap_or(fallback),
            self.rounding.item_total.unwrap_or(fallback),
            self.rounding.transaction_total.unwrap_or(fallback),
        )
    }
}
