//! # inandout-settings: Document Settings
//!
//! Turns a settings file, the environment, and the document currency into
//! the [`RoundingRuleSet`](inandout_core::RoundingRuleSet) the pricing engine
//! consumes.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   settings.toml        INANDOUT_* env vars        currency code         │
//! │        │                      │                        │                │
//! │        ▼                      ▼                        ▼                │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │           ★ inandout-settings (THIS CRATE) ★                     │  │
//! │  │   DocumentSettings::load()  ──►  rounding_rules()                │  │
//! │  │   currency::minor_units()   ──►  default RoundingRule            │  │
//! │  └───────────────────────────────┬──────────────────────────────────┘  │
//! │                                  ▼                                      │
//! │                       inandout-core (pure engine)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use inandout_settings::DocumentSettings;
//!
//! let settings = DocumentSettings::for_currency("JPY");
//! assert_eq!(settings.rounding_rules().transaction_total.scale, 0);
//! ```

pub mod currency;
pub mod error;
pub mod settings;

pub use currency::{default_rounding_rule, minor_units, DEFAULT_CURRENCY};
pub use error::{SettingsError, SettingsResult};
pub use settings::{DocumentSettings, RoundingSettings, SETTINGS_FILE_NAME};
