//! # Rounding Module
//!
//! A rounding rule is a fractional-digit count plus a [`RoundingMode`].
//! [`round`] is the only place in the engine where a value loses digits;
//! every caller names the rule for the stage it is rounding.
//!
//! ## Where Each Rule Applies
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Rounding Stages                                    │
//! │                                                                         │
//! │  tax_item          each rate-based tax cost (regular and compound)      │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  item_total        a line item's after-tax total                        │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  transaction_total the grand total, once, after summing                 │
//! │                                                                         │
//! │  Never rounded: before-tax totals, per-unit before-tax prices,          │
//! │                 fixed-amount taxes, explicit after-tax totals           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The default scale for a currency is looked up by the settings layer and
//! handed in; this module knows nothing about currencies.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Rounding Mode
// =============================================================================

/// How the digit past the cutoff is resolved.
///
/// ```text
/// value      HalfUp   Bankers   Up     Down      (scale = 0)
/// ─────      ──────   ───────   ──     ────
///  2.5         3        2        3      2
///  3.5         4        4        4      3
///  2.1         2        2        3      2
/// -2.5        -3       -2       -3     -2
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Always away from zero once anything is past the cutoff.
    Up,
    /// Half away from zero ("plain" rounding).
    #[default]
    #[serde(rename = "plain", alias = "half_up")]
    HalfUp,
    /// Half to the nearest even digit.
    Bankers,
    /// Truncate toward zero.
    Down,
}

impl RoundingMode {
    fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::Up => RoundingStrategy::AwayFromZero,
            RoundingMode::HalfUp => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::Bankers => RoundingStrategy::MidpointNearestEven,
            RoundingMode::Down => RoundingStrategy::ToZero,
        }
    }
}

impl fmt::Display for RoundingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundingMode::Up => write!(f, "up"),
            RoundingMode::HalfUp => write!(f, "plain"),
            RoundingMode::Bankers => write!(f, "bankers"),
            RoundingMode::Down => write!(f, "down"),
        }
    }
}

impl FromStr for RoundingMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(RoundingMode::Up),
            "plain" | "half_up" | "half-up" => Ok(RoundingMode::HalfUp),
            "bankers" | "half_even" | "half-even" => Ok(RoundingMode::Bankers),
            "down" => Ok(RoundingMode::Down),
            other => Err(ValidationError::UnknownRoundingMode(other.to_string())),
        }
    }
}

// =============================================================================
// Rounding Rule
// =============================================================================

/// Fractional digit count plus rounding mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundingRule {
    /// Number of digits kept after the decimal point.
    pub scale: u32,
    #[serde(default)]
    pub mode: RoundingMode,
}

impl RoundingRule {
    #[inline]
    pub const fn new(scale: u32, mode: RoundingMode) -> Self {
        RoundingRule { scale, mode }
    }

    /// Half-up rule at `scale` digits, the usual default for a currency.
    #[inline]
    pub const fn half_up(scale: u32) -> Self {
        RoundingRule::new(scale, RoundingMode::HalfUp)
    }

    /// Rounds `value` with this rule. Same as [`round`].
    #[inline]
    pub fn apply(&self, value: Decimal) -> Decimal {
        round(value, *self)
    }
}

/// Rounds `value` to `rule.scale` fractional digits using `rule.mode`.
///
/// Values that already have no more than `rule.scale` digits come back
/// unchanged, which makes the function idempotent.
///
/// ## Example
/// ```rust
/// use inandout_core::rounding::{round, RoundingMode, RoundingRule};
/// use rust_decimal::Decimal;
///
/// let bankers = RoundingRule::new(0, RoundingMode::Bankers);
/// assert_eq!(round(Decimal::new(25, 1), bankers), Decimal::from(2));
/// assert_eq!(round(Decimal::new(35, 1), bankers), Decimal::from(4));
/// ```
pub fn round(value: Decimal, rule: RoundingRule) -> Decimal {
    value.round_dp_with_strategy(rule.scale, rule.mode.strategy())
}

// =============================================================================
// Rounding Rule Set
// =============================================================================

/// The three independently configurable rules of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundingRuleSet {
    /// Each rate-based tax cost. Not used when inferring a before-tax price
    /// from an after-tax one.
    pub tax_item: RoundingRule,
    pub item_total: RoundingRule,
    pub transaction_total: RoundingRule,
}

impl RoundingRuleSet {
    pub const fn new(
        tax_item: RoundingRule,
        item_total: RoundingRule,
        transaction_total: RoundingRule,
    ) -> Self {
        RoundingRuleSet {
            tax_item,
            item_total,
            transaction_total,
        }
    }

    /// Uses the same rule at every stage.
    pub const fn uniform(rule: RoundingRule) -> Self {
        RoundingRuleSet::new(rule, rule, rule)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
