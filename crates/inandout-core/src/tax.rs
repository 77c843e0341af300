//! # Tax Item Module
//!
//! Three kinds of tax can sit on a line item:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Kind          Base                              Rounded?               │
//! │  ────          ────                              ────────               │
//! │  regular       before-tax total                  yes (tax_item rule)    │
//! │  compound      before-tax total + regular taxes  yes (tax_item rule)    │
//! │  fixed amount  none, flat add                    never                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Regular and compound taxes share [`RateTaxItem`]; which list holds an
//! item decides its role. Two items are the same tax when name and rate
//! (or name and amount) match.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::rounding::{round, RoundingRule};

/// A percentage tax. `rate` is a fraction: `0.05` is 5%.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RateTaxItem {
    pub name: String,
    #[ts(as = "String")]
    pub rate: Decimal,
}

impl RateTaxItem {
    pub fn new(name: impl Into<String>, rate: Decimal) -> Self {
        RateTaxItem {
            name: name.into(),
            rate,
        }
    }

    /// Blank item, as added by an editor before the user types anything.
    pub fn fresh() -> Self {
        RateTaxItem::new("", Decimal::ZERO)
    }

    /// `round(base * rate, rule)`.
    ///
    /// ## Example
    /// ```rust
    /// use inandout_core::rounding::RoundingRule;
    /// use inandout_core::tax::RateTaxItem;
    /// use rust_decimal::Decimal;
    ///
    /// let gst = RateTaxItem::new("GST", Decimal::new(5, 2));
    /// let cost = gst.tax_cost(Decimal::from(100), RoundingRule::half_up(2));
    /// assert_eq!(cost, Decimal::new(500, 2));
    /// ```
    pub fn tax_cost(&self, base: Decimal, rule: RoundingRule) -> Decimal {
        tax_cost(base, self.rate, rule)
    }

    /// Nothing was entered: zero rate and a blank name.
    pub fn is_blank(&self) -> bool {
        self.rate.is_zero() && self.name.trim().is_empty()
    }
}

/// A flat addition. Never rate-based, never rounded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FixedAmountItem {
    pub name: String,
    #[ts(as = "String")]
    pub amount: Decimal,
}

impl FixedAmountItem {
    pub fn new(name: impl Into<String>, amount: Decimal) -> Self {
        FixedAmountItem {
            name: name.into(),
            amount,
        }
    }

    pub fn fresh() -> Self {
        FixedAmountItem::new("", Decimal::ZERO)
    }

    pub fn is_blank(&self) -> bool {
        self.amount.is_zero() && self.name.trim().is_empty()
    }
}

/// Cost of one rate-based tax on `base`, rounded with the tax item rule.
#[inline]
pub fn tax_cost(base: Decimal, rate: Decimal, rule: RoundingRule) -> Decimal {
    round(base * rate, rule)
}

/// Sum of the (unrounded) rates.
pub fn rate_sum(items: &[RateTaxItem]) -> Decimal {
    items.iter().map(|item| item.rate).sum()
}

/// Sum of the raw fixed amounts.
pub fn fixed_amount_sum(items: &[FixedAmountItem]) -> Decimal {
    items.iter().map(|item| item.amount).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
