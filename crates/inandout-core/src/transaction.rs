//! # Transaction Module
//!
//! A [`Transaction`] is a batch of items moving in or out, each line carrying
//! its own [`PriceInfo`], plus transaction-level fixed costs.
//!
//! ## Grand Total Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  line 1 ── total_after_tax(tax_item, item_total) ──┐                    │
//! │  line 2 ── total_after_tax(tax_item, item_total) ──┤                    │
//! │  line n ── total_after_tax(tax_item, item_total) ──┼── Σ ──┐            │
//! │                                                    │       │            │
//! │  fixed costs (raw amounts) ────────────────────────┘       ▼            │
//! │                                           round(transaction_total)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is cached. Every call recomputes from the current field values,
//! and lists change only by wholesale replacement.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreResult;
use crate::price::PriceInfo;
use crate::rounding::{round, RoundingRule, RoundingRuleSet};
use crate::tax::{fixed_amount_sum, FixedAmountItem, RateTaxItem};
use crate::validation::{validate_transaction, validate_transaction_totals};

// =============================================================================
// Transaction Type
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Stock coming in (purchase, return from customer).
    ItemsIn,
    /// Stock going out (sale, write-off).
    ItemsOut,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionType::ItemsIn => write!(f, "Items In"),
            TransactionType::ItemsOut => write!(f, "Items Out"),
        }
    }
}

// =============================================================================
// Contact
// =============================================================================

/// Supplier of a purchase, customer of a sale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email_address: Option<String>,
    pub location: Option<String>,
}

// =============================================================================
// Item Transaction
// =============================================================================

/// One line of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemTransaction {
    #[ts(as = "String")]
    pub id: Uuid,
    /// Business identifier of the item (SKU, part number), if any.
    #[serde(default)]
    pub item_id: Option<String>,
    pub item_name: String,
    #[serde(default)]
    pub variant: Option<String>,
    pub price_info: PriceInfo,
}

impl ItemTransaction {
    pub fn new(item_name: impl Into<String>, price_info: PriceInfo) -> Self {
        ItemTransaction {
            id: Uuid::new_v4(),
            item_id: None,
            item_name: item_name.into(),
            variant: None,
            price_info,
        }
    }

    /// Unnamed line with a fresh price.
    pub fn fresh() -> Self {
        ItemTransaction::new("", PriceInfo::fresh())
    }

    pub fn with_item_id(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Line total with the document's rules.
    pub fn total_after_tax(&self, rules: &RoundingRuleSet) -> Decimal {
        self.price_info
            .total_after_tax(rules.tax_item, rules.item_total)
    }
}

// =============================================================================
// Shared Tax Info
// =============================================================================

/// Per-tax totals across every line of a transaction.
///
/// Only produced when all lines carry the same tax items, so one summary row
/// per tax can replace the per-line breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SharedTaxInfo {
    pub regular: HashMap<RateTaxItem, Decimal>,
    pub compound: HashMap<RateTaxItem, Decimal>,
    pub fixed: HashMap<FixedAmountItem, Decimal>,
}

impl SharedTaxInfo {
    fn zeroed(
        regular: &HashSet<&RateTaxItem>,
        compound: &HashSet<&RateTaxItem>,
        fixed: &HashSet<&FixedAmountItem>,
    ) -> Self {
        SharedTaxInfo {
            regular: regular.iter().map(|item| ((*item).clone(), Decimal::ZERO)).collect(),
            compound: compound.iter().map(|item| ((*item).clone(), Decimal::ZERO)).collect(),
            fixed: fixed.iter().map(|item| ((*item).clone(), Decimal::ZERO)).collect(),
        }
    }

    /// Σ of every tax in the breakdown.
    pub fn total(&self) -> Decimal {
        self.regular
            .values()
            .chain(self.compound.values())
            .chain(self.fixed.values())
            .sum()
    }
}

// =============================================================================
// Transaction
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Transaction {
    #[ts(as = "String")]
    pub id: Uuid,
    pub transaction_type: TransactionType,
    /// User-facing reference number (invoice, PO, receipt).
    pub transaction_id: String,
    #[serde(default)]
    pub subtransactions: Vec<ItemTransaction>,
    #[serde(default)]
    pub fixed_costs: Vec<FixedAmountItem>,
    #[serde(default)]
    pub comment: String,
    /// Person responsible for bookkeeping this transaction.
    #[serde(default)]
    pub keeper_name: Option<String>,
    #[serde(default)]
    pub contact: Option<ContactInfo>,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
}

impl Transaction {
    pub fn new(
        transaction_type: TransactionType,
        transaction_id: impl Into<String>,
        date: DateTime<Utc>,
    ) -> Self {
        Transaction {
            id: Uuid::new_v4(),
            transaction_type,
            transaction_id: transaction_id.into(),
            subtransactions: Vec::new(),
            fixed_costs: Vec::new(),
            comment: String::new(),
            keeper_name: None,
            contact: None,
            date,
        }
    }

    /// Empty transaction dated now.
    pub fn fresh(transaction_type: TransactionType) -> Self {
        Transaction::new(transaction_type, "", Utc::now())
    }

    /// Replaces every line.
    pub fn with_subtransactions(mut self, subtransactions: Vec<ItemTransaction>) -> Self {
        self.subtransactions = subtransactions;
        self
    }

    /// Replaces every transaction-level fixed cost.
    pub fn with_fixed_costs(mut self, fixed_costs: Vec<FixedAmountItem>) -> Self {
        self.fixed_costs = fixed_costs;
        self
    }

    /// Distinct non-blank item names, trimmed.
    pub fn item_names(&self) -> BTreeSet<String> {
        self.subtransactions
            .iter()
            .map(|line| line.item_name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// `"{name} {variant}"` per line, variant empty when absent.
    pub fn item_and_variant_names(&self) -> BTreeSet<String> {
        self.subtransactions
            .iter()
            .map(|line| {
                format!(
                    "{} {}",
                    line.item_name,
                    line.variant.as_deref().unwrap_or_default()
                )
            })
            .collect()
    }

    /// Σ before-tax totals. Not rounded.
    pub fn subtotal(&self) -> Decimal {
        self.subtransactions
            .iter()
            .map(|line| line.price_info.total_before_tax())
            .sum()
    }

    /// Σ raw fixed cost amounts.
    pub fn fixed_cost_sum(&self) -> Decimal {
        fixed_amount_sum(&self.fixed_costs)
    }

    /// Grand total.
    ///
    /// Each line is rounded with `item_total` first; the sum plus the fixed
    /// costs is rounded once with `transaction_total`.
    pub fn total(&self, rules: &RoundingRuleSet) -> Decimal {
        let lines: Decimal = self
            .subtransactions
            .iter()
            .map(|line| line.total_after_tax(rules))
            .sum();
        round(lines + self.fixed_cost_sum(), rules.transaction_total)
    }

    /// [`Transaction::subtotal`], or `None` on overflow.
    pub fn checked_subtotal(&self) -> Option<Decimal> {
        self.subtransactions.iter().try_fold(Decimal::ZERO, |sum, line| {
            sum.checked_add(line.price_info.checked_total_before_tax()?)
        })
    }

    /// [`Transaction::total`], or `None` on overflow.
    pub fn checked_total(&self, rules: &RoundingRuleSet) -> Option<Decimal> {
        let lines = self.subtransactions.iter().try_fold(Decimal::ZERO, |sum, line| {
            sum.checked_add(
                line.price_info
                    .checked_total_after_tax(rules.tax_item, rules.item_total)?,
            )
        })?;
        let with_costs = self
            .fixed_costs
            .iter()
            .try_fold(lines, |sum, cost| sum.checked_add(cost.amount))?;
        Some(round(with_costs, rules.transaction_total))
    }

    /// Per-tax totals across all lines, or `None` when the transaction is
    /// empty or any line's tax items differ from the first line's.
    ///
    /// Items are compared as unordered sets: same names with different rates
    /// are different taxes.
    pub fn shared_tax_info(&self, tax_item_rule: RoundingRule) -> Option<SharedTaxInfo> {
        let first = &self.subtransactions.first()?.price_info;
        let regular: HashSet<&RateTaxItem> = first.regular_tax_items.iter().collect();
        let compound: HashSet<&RateTaxItem> = first.compound_tax_items.iter().collect();
        let fixed: HashSet<&FixedAmountItem> = first.fixed_amount_tax_items.iter().collect();

        let mut shared = SharedTaxInfo::zeroed(&regular, &compound, &fixed);

        for (line, subtransaction) in self.subtransactions.iter().enumerate() {
            let info = &subtransaction.price_info;
            if !same_items(&regular, &info.regular_tax_items)
                || !same_items(&compound, &info.compound_tax_items)
                || !same_items(&fixed, &info.fixed_amount_tax_items)
            {
                debug!(
                    transaction_id = %self.transaction_id,
                    line,
                    "Tax items differ from first line, no shared tax breakdown"
                );
                return None;
            }

            let regular_base = info.total_before_tax();
            for item in &regular {
                if let Some(total) = shared.regular.get_mut(*item) {
                    *total += item.tax_cost(regular_base, tax_item_rule);
                }
            }

            let compound_base = info.total_after_regular_tax(tax_item_rule);
            for item in &compound {
                if let Some(total) = shared.compound.get_mut(*item) {
                    *total += item.tax_cost(compound_base, tax_item_rule);
                }
            }

            for item in &fixed {
                if let Some(total) = shared.fixed.get_mut(*item) {
                    *total += item.amount;
                }
            }
        }

        Some(shared)
    }

    /// Checks every line; the first failure names its line index.
    pub fn validate(&self, require_item_id: bool) -> CoreResult<()> {
        validate_transaction(self, require_item_id)
    }

    /// Checks that every total fits in a `Decimal` under `rules`.
    pub fn validate_totals(&self, rules: &RoundingRuleSet) -> CoreResult<()> {
        validate_transaction_totals(self, rules)
    }
}

fn same_items<T: Eq + Hash>(expected: &HashSet<&T>, items: &[T]) -> bool {
    items.iter().collect::<HashSet<_>>() == *expected
}

// =============================================================================
// Unit Tests
// =============================================================================
