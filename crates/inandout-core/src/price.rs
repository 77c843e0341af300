//! # Price Module
//!
//! [`PriceInfo`] describes the anatomy of one line item's price and derives
//! every total the rest of the system needs from it.
//!
//! ## Exactness by Price Type
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PriceType          before-tax total   per-unit before   after-tax total│
//! │  ─────────          ────────────────   ───────────────   ───────────────│
//! │  PerUnitBeforeTax   exact              exact             exact + rounded│
//! │  SumBeforeTax       exact              average           exact + rounded│
//! │  PerUnitAfterTax    inferred           inferred          exact          │
//! │  SumAfterTax        inferred           inferred average  exact          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Inferred values divide by the combined tax rate and are never rounded.
//! Callers show them as approximate using
//! [`PriceInfo::can_only_infer_price_before_tax`] and
//! [`PriceInfo::can_only_calculate_average_price`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use ts_rs::TS;

use crate::rounding::{round, RoundingRule};
use crate::tax::{fixed_amount_sum, rate_sum, FixedAmountItem, RateTaxItem};

/// Line item quantity. Whole units only.
pub type ItemQuantity = u32;

// =============================================================================
// Price Type
// =============================================================================

/// Which figure `PriceInfo::price` holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceType {
    /// Untaxed price of one unit.
    #[default]
    PerUnitBeforeTax,
    /// Taxed price of one unit. Rarely entered directly.
    PerUnitAfterTax,
    /// Untaxed total for the whole quantity.
    SumBeforeTax,
    /// Taxed total for the whole quantity.
    SumAfterTax,
}

impl PriceType {
    /// `price` covers the whole quantity, so per-unit figures are averages.
    #[inline]
    pub const fn is_sum(self) -> bool {
        matches!(self, PriceType::SumBeforeTax | PriceType::SumAfterTax)
    }

    /// `price` already includes tax.
    #[inline]
    pub const fn is_after_tax(self) -> bool {
        matches!(self, PriceType::PerUnitAfterTax | PriceType::SumAfterTax)
    }
}

// =============================================================================
// Price Info
// =============================================================================

/// Price, quantity and tax items of one line item.
///
/// Tax item names must be unique across all three lists; see
/// [`PriceInfo::contains_tax_items_with_same_name`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceInfo {
    #[ts(as = "String")]
    pub price: Decimal,
    pub price_type: PriceType,
    /// Overrides every derived after-tax total. Never rounded.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub explicit_after_tax_total: Option<Decimal>,
    #[serde(default)]
    pub quantity: ItemQuantity,
    #[serde(default)]
    pub regular_tax_items: Vec<RateTaxItem>,
    #[serde(default)]
    pub compound_tax_items: Vec<RateTaxItem>,
    /// Called a tax rather than a fixed cost so nobody mistakes it for part
    /// of the before-tax total.
    #[serde(default)]
    pub fixed_amount_tax_items: Vec<FixedAmountItem>,
}

impl Default for PriceInfo {
    fn default() -> Self {
        PriceInfo::fresh()
    }
}

impl PriceInfo {
    pub fn new(price: Decimal, price_type: PriceType, quantity: ItemQuantity) -> Self {
        PriceInfo {
            price,
            price_type,
            explicit_after_tax_total: None,
            quantity,
            regular_tax_items: Vec::new(),
            compound_tax_items: Vec::new(),
            fixed_amount_tax_items: Vec::new(),
        }
    }

    /// Zero per-unit before-tax price, zero quantity, no taxes.
    pub fn fresh() -> Self {
        PriceInfo::new(Decimal::ZERO, PriceType::PerUnitBeforeTax, 0)
    }

    pub fn with_regular_tax(mut self, item: RateTaxItem) -> Self {
        self.regular_tax_items.push(item);
        self
    }

    pub fn with_compound_tax(mut self, item: RateTaxItem) -> Self {
        self.compound_tax_items.push(item);
        self
    }

    pub fn with_fixed_tax(mut self, item: FixedAmountItem) -> Self {
        self.fixed_amount_tax_items.push(item);
        self
    }

    pub fn with_explicit_after_tax_total(mut self, total: Decimal) -> Self {
        self.explicit_after_tax_total = Some(total);
        self
    }

    #[inline]
    fn item_quantity(&self) -> Decimal {
        Decimal::from(self.quantity)
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// True for the two `Sum*` price types.
    pub fn can_only_calculate_average_price(&self) -> bool {
        self.price_type.is_sum()
    }

    /// True for the two `*AfterTax` price types.
    pub fn can_only_infer_price_before_tax(&self) -> bool {
        self.price_type.is_after_tax()
    }

    // =========================================================================
    // Rates
    // =========================================================================

    /// Multiplier from before-tax to after-tax, ignoring fixed taxes.
    ///
    /// Starts at `1 + Σregular` and adds `(1 + Σregular) * compound.rate`
    /// for every compound item.
    pub fn combined_tax_rate(&self) -> Decimal {
        let regular_multiplier = Decimal::ONE + rate_sum(&self.regular_tax_items);
        self.compound_tax_items
            .iter()
            .fold(regular_multiplier, |rate, item| {
                rate + regular_multiplier * item.rate
            })
    }

    // =========================================================================
    // Before Tax
    // =========================================================================

    /// Untaxed total. Exact for the before-tax types, an estimate otherwise.
    ///
    /// Not rounded. For the after-tax types fixed taxes are left inside the
    /// divided price, unlike [`PriceInfo::price_per_unit_before_tax`].
    pub fn total_before_tax(&self) -> Decimal {
        match self.price_type {
            PriceType::PerUnitBeforeTax => self.price * self.item_quantity(),
            PriceType::SumBeforeTax => self.price,
            PriceType::PerUnitAfterTax => {
                divide_or_zero(self.price, self.combined_tax_rate()) * self.item_quantity()
            }
            PriceType::SumAfterTax => divide_or_zero(self.price, self.combined_tax_rate()),
        }
    }

    /// Untaxed price of one unit. Never rounded.
    pub fn price_per_unit_before_tax(&self) -> Decimal {
        match self.price_type {
            PriceType::PerUnitBeforeTax => self.price,
            PriceType::SumBeforeTax => divide_or_zero(self.price, self.item_quantity()),
            PriceType::PerUnitAfterTax => {
                divide_or_zero(self.price - self.fixed_tax_sum(), self.combined_tax_rate())
            }
            PriceType::SumAfterTax => divide_or_zero(
                divide_or_zero(self.price - self.fixed_tax_sum(), self.combined_tax_rate()),
                self.item_quantity(),
            ),
        }
    }

    // =========================================================================
    // Taxes
    // =========================================================================

    /// Σ regular tax costs, each rounded on its own before summing.
    pub fn regular_tax_sum(&self, tax_item_rule: RoundingRule) -> Decimal {
        let base = self.total_before_tax();
        self.regular_tax_items
            .iter()
            .map(|item| item.tax_cost(base, tax_item_rule))
            .sum()
    }

    /// Before-tax total plus the rounded regular taxes: the compound base.
    pub fn total_after_regular_tax(&self, tax_item_rule: RoundingRule) -> Decimal {
        self.total_before_tax() + self.regular_tax_sum(tax_item_rule)
    }

    /// Σ compound tax costs on [`PriceInfo::total_after_regular_tax`].
    pub fn compound_tax_sum(&self, tax_item_rule: RoundingRule) -> Decimal {
        let base = self.total_after_regular_tax(tax_item_rule);
        self.compound_tax_items
            .iter()
            .map(|item| item.tax_cost(base, tax_item_rule))
            .sum()
    }

    /// Σ fixed amounts. Never rounded.
    pub fn fixed_tax_sum(&self) -> Decimal {
        fixed_amount_sum(&self.fixed_amount_tax_items)
    }

    /// Regular + compound + fixed.
    pub fn all_tax_sum(&self, tax_item_rule: RoundingRule) -> Decimal {
        self.regular_tax_sum(tax_item_rule)
            + self.compound_tax_sum(tax_item_rule)
            + self.fixed_tax_sum()
    }

    /// Cost of every tax item keyed by name.
    ///
    /// Assumes names are unique; with duplicates the later item wins.
    pub fn tax_item_costs(&self, tax_item_rule: RoundingRule) -> HashMap<String, Decimal> {
        let regular_base = self.total_before_tax();
        let compound_base = self.total_after_regular_tax(tax_item_rule);

        let mut costs = HashMap::new();
        for item in &self.regular_tax_items {
            costs.insert(item.name.clone(), item.tax_cost(regular_base, tax_item_rule));
        }
        for item in &self.compound_tax_items {
            costs.insert(item.name.clone(), item.tax_cost(compound_base, tax_item_rule));
        }
        for item in &self.fixed_amount_tax_items {
            costs.insert(item.name.clone(), item.amount);
        }
        costs
    }

    // =========================================================================
    // After Tax
    // =========================================================================

    /// Taxed total, rounded with `item_total_rule`.
    ///
    /// An explicit after-tax total short-circuits everything and is returned
    /// as entered.
    ///
    /// ## Example
    /// ```rust
    /// use inandout_core::price::{PriceInfo, PriceType};
    /// use inandout_core::rounding::RoundingRule;
    /// use inandout_core::tax::RateTaxItem;
    /// use rust_decimal::Decimal;
    ///
    /// let info = PriceInfo::new(Decimal::from(100), PriceType::SumBeforeTax, 1)
    ///     .with_regular_tax(RateTaxItem::new("GST", Decimal::new(5, 2)));
    /// let rule = RoundingRule::half_up(2);
    /// assert_eq!(info.total_after_tax(rule, rule), Decimal::from(105));
    /// ```
    pub fn total_after_tax(
        &self,
        tax_item_rule: RoundingRule,
        item_total_rule: RoundingRule,
    ) -> Decimal {
        if let Some(explicit) = self.explicit_after_tax_total {
            return explicit;
        }
        let total = match self.price_type {
            PriceType::PerUnitAfterTax => self.price * self.item_quantity(),
            PriceType::PerUnitBeforeTax => {
                self.total_before_tax() + self.all_tax_sum(tax_item_rule)
            }
            PriceType::SumBeforeTax => self.price + self.all_tax_sum(tax_item_rule),
            PriceType::SumAfterTax => self.price,
        };
        round(total, item_total_rule)
    }

    /// Taxed price of one unit; `0` when quantity is zero.
    pub fn price_per_unit_after_tax(
        &self,
        tax_item_rule: RoundingRule,
        item_total_rule: RoundingRule,
    ) -> Decimal {
        if self.price_type == PriceType::PerUnitAfterTax {
            return self.price;
        }
        divide_or_zero(
            self.total_after_tax(tax_item_rule, item_total_rule),
            self.item_quantity(),
        )
    }

    // =========================================================================
    // Checked Arithmetic
    // =========================================================================
    //
    // `Decimal` operators panic on overflow. These mirror the figures above
    // and return `None` instead, so validation can reject a line before any
    // of the panicking versions run.

    /// [`PriceInfo::combined_tax_rate`], or `None` on overflow.
    pub fn checked_combined_tax_rate(&self) -> Option<Decimal> {
        let regular_multiplier = self
            .regular_tax_items
            .iter()
            .try_fold(Decimal::ONE, |sum, item| sum.checked_add(item.rate))?;
        self.compound_tax_items
            .iter()
            .try_fold(regular_multiplier, |rate, item| {
                rate.checked_add(regular_multiplier.checked_mul(item.rate)?)
            })
    }

    /// [`PriceInfo::total_before_tax`], or `None` on overflow.
    pub fn checked_total_before_tax(&self) -> Option<Decimal> {
        match self.price_type {
            PriceType::PerUnitBeforeTax => self.price.checked_mul(self.item_quantity()),
            PriceType::SumBeforeTax => Some(self.price),
            PriceType::PerUnitAfterTax => {
                divide_or_zero(self.price, self.checked_combined_tax_rate()?)
                    .checked_mul(self.item_quantity())
            }
            PriceType::SumAfterTax => Some(divide_or_zero(
                self.price,
                self.checked_combined_tax_rate()?,
            )),
        }
    }

    /// [`PriceInfo::fixed_tax_sum`], or `None` on overflow.
    pub fn checked_fixed_tax_sum(&self) -> Option<Decimal> {
        self.fixed_amount_tax_items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(item.amount))
    }

    /// [`PriceInfo::all_tax_sum`], or `None` on overflow.
    pub fn checked_all_tax_sum(&self, tax_item_rule: RoundingRule) -> Option<Decimal> {
        let base = self.checked_total_before_tax()?;
        let regular = self
            .regular_tax_items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| {
                sum.checked_add(round(base.checked_mul(item.rate)?, tax_item_rule))
            })?;

        let compound_base = base.checked_add(regular)?;
        let compound = self
            .compound_tax_items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| {
                sum.checked_add(round(compound_base.checked_mul(item.rate)?, tax_item_rule))
            })?;

        regular
            .checked_add(compound)?
            .checked_add(self.checked_fixed_tax_sum()?)
    }

    /// [`PriceInfo::total_after_tax`], or `None` on overflow.
    pub fn checked_total_after_tax(
        &self,
        tax_item_rule: RoundingRule,
        item_total_rule: RoundingRule,
    ) -> Option<Decimal> {
        if let Some(explicit) = self.explicit_after_tax_total {
            return Some(explicit);
        }
        let total = match self.price_type {
            PriceType::PerUnitAfterTax => self.price.checked_mul(self.item_quantity())?,
            PriceType::PerUnitBeforeTax | PriceType::SumBeforeTax => self
                .checked_total_before_tax()?
                .checked_add(self.checked_all_tax_sum(tax_item_rule)?)?,
            PriceType::SumAfterTax => self.price,
        };
        Some(round(total, item_total_rule))
    }

    // =========================================================================
    // Tax Item Hygiene
    // =========================================================================

    /// Copy without tax items that have both a zero value and a blank name.
    pub fn compacted(&self) -> PriceInfo {
        let mut copy = self.clone();
        copy.regular_tax_items.retain(|item| !item.is_blank());
        copy.compound_tax_items.retain(|item| !item.is_blank());
        copy.fixed_amount_tax_items.retain(|item| !item.is_blank());
        copy
    }

    /// First name that appears more than once across the three lists.
    pub fn duplicate_tax_item_name(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.tax_item_names().find(|name| !seen.insert(*name))
    }

    /// True when two tax items share a name. Callers block the edit.
    pub fn contains_tax_items_with_same_name(&self) -> bool {
        self.duplicate_tax_item_name().is_some()
    }

    fn tax_item_names(&self) -> impl Iterator<Item = &str> {
        self.regular_tax_items
            .iter()
            .chain(&self.compound_tax_items)
            .map(|item| item.name.as_str())
            .chain(
                self.fixed_amount_tax_items
                    .iter()
                    .map(|item| item.name.as_str()),
            )
    }
}

/// `numerator / denominator`, or `0` for a zero denominator.
#[inline]
fn divide_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rounding::RoundingMode;
    use rust_decimal_macros::dec;

    const CENTS: RoundingRule = RoundingRule::half_up(2);

    fn gst() -> RateTaxItem {
        RateTaxItem::new("GST", dec!(0.05))
    }

    fn qst() -> RateTaxItem {
        RateTaxItem::new("QST", dec!(0.10))
    }

    #[test]
    fn test_per_unit_before_tax_without_taxes() {
        let info = PriceInfo::new(dec!(10), PriceType::PerUnitBeforeTax, 3);
        assert_eq!(info.total_before_tax(), dec!(30));
        assert_eq!(info.total_after_tax(CENTS, CENTS), dec!(30));
        assert_eq!(info.price_per_unit_before_tax(), dec!(10));
        assert_eq!(info.price_per_unit_after_tax(CENTS, CENTS), dec!(10));
        assert!(!info.can_only_calculate_average_price());
        assert!(!info.can_only_infer_price_before_tax());
    }

    #[test]
    fn test_sum_before_tax_unit_price_is_average() {
        let info = PriceInfo::new(dec!(100), PriceType::SumBeforeTax, 3);
        assert_eq!(info.price_per_unit_before_tax(), dec!(100) / dec!(3));
        assert_eq!(info.total_before_tax(), dec!(100));
        assert!(info.can_only_calculate_average_price());
        assert!(!info.can_only_infer_price_before_tax());
    }

    #[test]
    fn test_compound_stacks_on_rounded_regular() {
        let info = PriceInfo::new(dec!(100), PriceType::SumBeforeTax, 1)
            .with_regular_tax(gst())
            .with_compound_tax(qst());
        assert_eq!(info.regular_tax_sum(CENTS), dec!(5.00));
        assert_eq!(info.total_after_regular_tax(CENTS), dec!(105.00));
        assert_eq!(info.compound_tax_sum(CENTS), dec!(10.50));
        assert_eq!(info.all_tax_sum(CENTS), dec!(15.50));
        assert_eq!(info.total_after_tax(CENTS, CENTS), dec!(115.50));
    }

    #[test]
    fn test_compound_base_uses_rounded_regular_tax() {
        // 33.33 * 0.05 = 1.6665 -> 1.67; compound base is 35.00, not 34.9965
        let info = PriceInfo::new(dec!(33.33), PriceType::SumBeforeTax, 1)
            .with_regular_tax(gst())
            .with_compound_tax(qst());
        assert_eq!(info.regular_tax_sum(CENTS), dec!(1.67));
        assert_eq!(info.total_after_regular_tax(CENTS), dec!(35.00));
        assert_eq!(info.compound_tax_sum(CENTS), dec!(3.50));
    }

    #[test]
    fn test_each_regular_tax_rounded_individually() {
        // 0.825 + 0.825 rounds to 0.83 + 0.83, not round(1.65)
        let info = PriceInfo::new(dec!(10), PriceType::SumBeforeTax, 1)
            .with_regular_tax(RateTaxItem::new("A", dec!(0.0825)))
            .with_regular_tax(RateTaxItem::new("B", dec!(0.0825)));
        assert_eq!(info.regular_tax_sum(CENTS), dec!(1.66));
    }

    #[test]
    fn test_fixed_tax_is_never_rounded() {
        let info = PriceInfo::new(dec!(10), PriceType::PerUnitBeforeTax, 1)
            .with_fixed_tax(FixedAmountItem::new("Eco fee", dec!(10.555)));
        assert_eq!(info.all_tax_sum(CENTS), dec!(10.555));
        assert_eq!(info.fixed_tax_sum(), dec!(10.555));
        // the item total is still rounded as a whole
        assert_eq!(info.total_after_tax(CENTS, CENTS), dec!(20.56));
    }

    #[test]
    fn test_explicit_after_tax_total_wins() {
        for price_type in [
            PriceType::PerUnitBeforeTax,
            PriceType::PerUnitAfterTax,
            PriceType::SumBeforeTax,
            PriceType::SumAfterTax,
        ] {
            let info = PriceInfo::new(dec!(17.123), price_type, 4)
                .with_regular_tax(gst())
                .with_explicit_after_tax_total(dec!(42));
            assert_eq!(info.total_after_tax(CENTS, CENTS), dec!(42));
        }

        let unrounded = PriceInfo::new(dec!(1), PriceType::SumBeforeTax, 1)
            .with_explicit_after_tax_total(dec!(42.4242));
        assert_eq!(
            unrounded.total_after_tax(CENTS, RoundingRule::half_up(0)),
            dec!(42.4242)
        );
    }

    #[test]
    fn test_explicit_after_tax_total_drives_unit_price() {
        for price_type in [
            PriceType::PerUnitBeforeTax,
            PriceType::SumBeforeTax,
            PriceType::SumAfterTax,
        ] {
            let info = PriceInfo::new(dec!(17.123), price_type, 4)
                .with_regular_tax(gst())
                .with_explicit_after_tax_total(dec!(42));
            assert_eq!(info.price_per_unit_after_tax(CENTS, CENTS), dec!(10.50));
        }

        // the entered price already is the per-unit after-tax figure
        let per_unit = PriceInfo::new(dec!(17.123), PriceType::PerUnitAfterTax, 4)
            .with_regular_tax(gst())
            .with_explicit_after_tax_total(dec!(42));
        assert_eq!(per_unit.price_per_unit_after_tax(CENTS, CENTS), dec!(17.123));

        let empty = PriceInfo::new(dec!(17.123), PriceType::SumBeforeTax, 0)
            .with_explicit_after_tax_total(dec!(42));
        assert_eq!(empty.price_per_unit_after_tax(CENTS, CENTS), Decimal::ZERO);
    }

    #[test]
    fn test_checked_figures_match_unchecked() {
        for price_type in [
            PriceType::PerUnitBeforeTax,
            PriceType::PerUnitAfterTax,
            PriceType::SumBeforeTax,
            PriceType::SumAfterTax,
        ] {
            let info = PriceInfo::new(dec!(115.50), price_type, 3)
                .with_regular_tax(gst())
                .with_compound_tax(qst())
                .with_fixed_tax(FixedAmountItem::new("Eco fee", dec!(0.25)));
            assert_eq!(info.checked_combined_tax_rate(), Some(info.combined_tax_rate()));
            assert_eq!(info.checked_total_before_tax(), Some(info.total_before_tax()));
            assert_eq!(info.checked_all_tax_sum(CENTS), Some(info.all_tax_sum(CENTS)));
            assert_eq!(
                info.checked_total_after_tax(CENTS, CENTS),
                Some(info.total_after_tax(CENTS, CENTS))
            );
        }
    }

    #[test]
    fn test_checked_figures_detect_overflow() {
        let price = dec!(100000000000000000000);
        let huge = PriceInfo::new(price, PriceType::PerUnitBeforeTax, 1_000_000_000);
        assert_eq!(huge.checked_total_before_tax(), None);
        assert_eq!(huge.checked_total_after_tax(CENTS, CENTS), None);

        let after_tax = PriceInfo::new(price, PriceType::PerUnitAfterTax, 1_000_000_000);
        assert_eq!(after_tax.checked_total_after_tax(CENTS, CENTS), None);

        let fees = PriceInfo::new(dec!(1), PriceType::SumBeforeTax, 1)
            .with_fixed_tax(FixedAmountItem::new("A", Decimal::MAX))
            .with_fixed_tax(FixedAmountItem::new("B", Decimal::MAX));
        assert_eq!(fees.checked_fixed_tax_sum(), None);
        assert_eq!(fees.checked_all_tax_sum(CENTS), None);

        // an explicit total needs no arithmetic
        let explicit = huge.clone().with_explicit_after_tax_total(dec!(1));
        assert_eq!(explicit.checked_total_after_tax(CENTS, CENTS), Some(dec!(1)));
    }

    #[test]
    fn test_item_total_rule_applied_to_raw_total() {
        let info = PriceInfo::new(dec!(2.345), PriceType::PerUnitAfterTax, 1);
        assert_eq!(info.total_after_tax(CENTS, CENTS), dec!(2.35));
        let bankers = RoundingRule::new(2, RoundingMode::Bankers);
        assert_eq!(info.total_after_tax(CENTS, bankers), dec!(2.34));
        // per unit after tax is the entered price for this type
        assert_eq!(info.price_per_unit_after_tax(CENTS, bankers), dec!(2.345));
    }

    #[test]
    fn test_combined_tax_rate() {
        let none = PriceInfo::fresh();
        assert_eq!(none.combined_tax_rate(), dec!(1));

        let info = PriceInfo::new(dec!(0), PriceType::SumAfterTax, 1)
            .with_regular_tax(gst())
            .with_regular_tax(RateTaxItem::new("PST", dec!(0.07)))
            .with_compound_tax(qst())
            .with_compound_tax(RateTaxItem::new("X", dec!(0.02)));
        // 1.12 + 1.12 * 0.10 + 1.12 * 0.02
        assert_eq!(info.combined_tax_rate(), dec!(1.2544));
    }

    #[test]
    fn test_sum_after_tax_infers_before_tax() {
        let info = PriceInfo::new(dec!(115.50), PriceType::SumAfterTax, 2)
            .with_regular_tax(gst())
            .with_compound_tax(qst());
        assert!(info.can_only_infer_price_before_tax());
        assert!(info.can_only_calculate_average_price());
        assert_eq!(info.combined_tax_rate(), dec!(1.155));
        assert_eq!(info.total_before_tax(), dec!(100));
        assert_eq!(info.price_per_unit_before_tax(), dec!(50));
        assert_eq!(info.total_after_tax(CENTS, CENTS), dec!(115.50));
        assert_eq!(info.price_per_unit_after_tax(CENTS, CENTS), dec!(57.75));
    }

    #[test]
    fn test_per_unit_after_tax_infers_before_tax() {
        let info = PriceInfo::new(dec!(10.50), PriceType::PerUnitAfterTax, 4)
            .with_regular_tax(gst());
        assert_eq!(info.total_before_tax(), dec!(40));
        assert_eq!(info.price_per_unit_before_tax(), dec!(10));
        assert_eq!(info.total_after_tax(CENTS, CENTS), dec!(42.00));
    }

    #[test]
    fn test_fixed_tax_asymmetry_for_after_tax_types() {
        let info = PriceInfo::new(dec!(12), PriceType::SumAfterTax, 1)
            .with_fixed_tax(FixedAmountItem::new("Deposit", dec!(2)));
        // total before tax keeps the fixed amount inside the divided price
        assert_eq!(info.total_before_tax(), dec!(12));
        // per unit before tax strips it first
        assert_eq!(info.price_per_unit_before_tax(), dec!(10));

        let per_unit = PriceInfo::new(dec!(12), PriceType::PerUnitAfterTax, 2)
            .with_fixed_tax(FixedAmountItem::new("Deposit", dec!(2)));
        assert_eq!(per_unit.total_before_tax(), dec!(24));
        assert_eq!(per_unit.price_per_unit_before_tax(), dec!(10));
    }

    #[test]
    fn test_zero_quantity_yields_zero_per_unit() {
        let sum_before = PriceInfo::new(dec!(100), PriceType::SumBeforeTax, 0);
        assert_eq!(sum_before.price_per_unit_before_tax(), Decimal::ZERO);
        assert_eq!(sum_before.price_per_unit_after_tax(CENTS, CENTS), Decimal::ZERO);

        let sum_after = PriceInfo::new(dec!(100), PriceType::SumAfterTax, 0);
        assert_eq!(sum_after.price_per_unit_before_tax(), Decimal::ZERO);
        assert_eq!(sum_after.price_per_unit_after_tax(CENTS, CENTS), Decimal::ZERO);

        let per_unit = PriceInfo::new(dec!(5), PriceType::PerUnitBeforeTax, 0);
        assert_eq!(per_unit.total_before_tax(), Decimal::ZERO);
        assert_eq!(per_unit.price_per_unit_after_tax(CENTS, CENTS), Decimal::ZERO);
    }

    #[test]
    fn test_tax_item_costs_by_name() {
        let info = PriceInfo::new(dec!(100), PriceType::SumBeforeTax, 1)
            .with_regular_tax(gst())
            .with_compound_tax(qst())
            .with_fixed_tax(FixedAmountItem::new("Eco fee", dec!(0.125)));
        let costs = info.tax_item_costs(CENTS);
        assert_eq!(costs.len(), 3);
        assert_eq!(costs["GST"], dec!(5.00));
        assert_eq!(costs["QST"], dec!(10.50));
        assert_eq!(costs["Eco fee"], dec!(0.125));
    }

    #[test]
    fn test_duplicate_names_flagged() {
        let info = PriceInfo::fresh()
            .with_regular_tax(gst())
            .with_regular_tax(RateTaxItem::new("GST", dec!(0.06)));
        assert!(info.contains_tax_items_with_same_name());
        assert_eq!(info.duplicate_tax_item_name(), Some("GST"));

        let across_lists = PriceInfo::fresh()
            .with_compound_tax(qst())
            .with_fixed_tax(FixedAmountItem::new("QST", dec!(1)));
        assert!(across_lists.contains_tax_items_with_same_name());

        let unique = PriceInfo::fresh().with_regular_tax(gst()).with_compound_tax(qst());
        assert!(!unique.contains_tax_items_with_same_name());
    }

    #[test]
    fn test_compacted_drops_blank_items_only() {
        let info = PriceInfo::fresh()
            .with_regular_tax(RateTaxItem::fresh())
            .with_regular_tax(gst())
            .with_compound_tax(RateTaxItem::new("", dec!(0.02)))
            .with_fixed_tax(FixedAmountItem::new(" ", Decimal::ZERO))
            .with_fixed_tax(FixedAmountItem::new("Fee", Decimal::ZERO));
        let compacted = info.compacted();
        assert_eq!(compacted.regular_tax_items, vec![gst()]);
        assert_eq!(compacted.compound_tax_items.len(), 1);
        assert_eq!(compacted.fixed_amount_tax_items.len(), 1);
        assert_eq!(compacted.fixed_amount_tax_items[0].name, "Fee");
    }

    #[test]
    fn test_serde_defaults() {
        let info: PriceInfo =
            serde_json::from_str(r#"{"price": "9.99", "price_type": "sum_after_tax"}"#).unwrap();
        assert_eq!(info.price, dec!(9.99));
        assert_eq!(info.price_type, PriceType::SumAfterTax);
        assert_eq!(info.quantity, 0);
        assert!(info.explicit_after_tax_total.is_none());
        assert!(info.regular_tax_items.is_empty());
    }
}
