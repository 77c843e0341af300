//! # Validation Module
//!
//! Checks a caller runs before committing an edited line item or
//! transaction. The pricing functions accept anything and never fail; these
//! are what stop bad data from being saved.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Editor                                                        │
//! │  ├── compacted() drops blank tax rows                                   │
//! │  └── contains_tax_items_with_same_name() disables Save                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── item name present, item ID present if the document forces it      │
//! │  ├── every rate within [0, 1]                                           │
//! │  ├── tax item names unique across regular/compound/fixed                │
//! │  └── every derived amount fits in a Decimal (validate_*_totals)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use inandout_core::price::{PriceInfo, PriceType};
//! use inandout_core::tax::RateTaxItem;
//! use inandout_core::validation::validate_price_info;
//! use rust_decimal::Decimal;
//!
//! let info = PriceInfo::new(Decimal::ONE, PriceType::PerUnitBeforeTax, 1)
//!     .with_regular_tax(RateTaxItem::new("GST", Decimal::new(5, 2)))
//!     .with_compound_tax(RateTaxItem::new("GST", Decimal::new(10, 2)));
//! assert!(validate_price_info(&info).is_err());
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::price::PriceInfo;
use crate::rounding::RoundingRuleSet;
use crate::tax::RateTaxItem;
use crate::transaction::{ItemTransaction, Transaction};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Tax Items
// =============================================================================

/// Rate must lie in the closed interval [0, 1].
pub fn validate_tax_rate(item: &RateTaxItem) -> ValidationResult<()> {
    if item.rate < Decimal::ZERO || item.rate > Decimal::ONE {
        return Err(ValidationError::InvalidRate {
            name: item.name.clone(),
            rate: item.rate,
        });
    }
    Ok(())
}

/// Rates in range, names unique across the three tax lists, and the
/// before-tax figures representable.
pub fn validate_price_info(info: &PriceInfo) -> ValidationResult<()> {
    for item in info
        .regular_tax_items
        .iter()
        .chain(&info.compound_tax_items)
    {
        validate_tax_rate(item)?;
    }

    if let Some(name) = info.duplicate_tax_item_name() {
        return Err(ValidationError::DuplicateTaxItemName {
            name: name.to_string(),
        });
    }

    let fixed = info
        .checked_fixed_tax_sum()
        .ok_or_else(|| overflow("fixed tax sum"))?;
    info.price
        .checked_sub(fixed)
        .ok_or_else(|| overflow("price net of fixed taxes"))?;
    info.checked_total_before_tax()
        .ok_or_else(|| overflow("total before tax"))?;

    Ok(())
}

/// Every figure the line derives under `rules` is representable.
pub fn validate_price_info_totals(
    info: &PriceInfo,
    rules: &RoundingRuleSet,
) -> ValidationResult<()> {
    validate_price_info(info)?;
    info.checked_all_tax_sum(rules.tax_item)
        .ok_or_else(|| overflow("tax sum"))?;
    info.checked_total_after_tax(rules.tax_item, rules.item_total)
        .ok_or_else(|| overflow("total after tax"))?;
    Ok(())
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::AmountOverflow {
        field: field.to_string(),
    }
}

// =============================================================================
// Line Items
// =============================================================================

/// Validates one line.
///
/// ## Rules
/// - Item name must not be blank
/// - Item ID must not be blank when `require_item_id` is set
/// - Price info passes [`validate_price_info`]
pub fn validate_item_transaction(
    item: &ItemTransaction,
    require_item_id: bool,
) -> ValidationResult<()> {
    if item.item_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "item name".to_string(),
        });
    }

    let has_item_id = item
        .item_id
        .as_deref()
        .is_some_and(|id| !id.trim().is_empty());
    if require_item_id && !has_item_id {
        return Err(ValidationError::MissingItemId {
            item_name: item.item_name.clone(),
        });
    }

    validate_price_info(&item.price_info)
}

/// Validates every line of a transaction, stopping at the first failure.
pub fn validate_transaction(transaction: &Transaction, require_item_id: bool) -> CoreResult<()> {
    for (line, item) in transaction.subtransactions.iter().enumerate() {
        if let Err(source) = validate_item_transaction(item, require_item_id) {
            debug!(
                transaction_id = %transaction.transaction_id,
                line,
                error = %source,
                "Line item rejected"
            );
            return Err(CoreError::InvalidLine { line, source });
        }
    }
    Ok(())
}

/// Checks every line and the transaction-wide sums for `Decimal` overflow.
///
/// Run after [`validate_transaction`]: a line failure is reported as
/// [`CoreError::InvalidLine`], a sum over all lines as
/// [`CoreError::Validation`].
pub fn validate_transaction_totals(
    transaction: &Transaction,
    rules: &RoundingRuleSet,
) -> CoreResult<()> {
    for (line, item) in transaction.subtransactions.iter().enumerate() {
        if let Err(source) = validate_price_info_totals(&item.price_info, rules) {
            debug!(
                transaction_id = %transaction.transaction_id,
                line,
                error = %source,
                "Line item amounts out of range"
            );
            return Err(CoreError::InvalidLine { line, source });
        }
    }

    transaction
        .checked_subtotal()
        .ok_or_else(|| overflow("subtotal"))?;
    transaction
        .checked_total(rules)
        .ok_or_else(|| overflow("transaction total"))?;

    // bounds every per-tax total of the shared breakdown
    transaction
        .subtransactions
        .iter()
        .flat_map(|item| item.price_info.tax_item_costs(rules.tax_item).into_values())
        .try_fold(Decimal::ZERO, |sum, cost| sum.checked_add(cost.abs()))
        .ok_or_else(|| overflow("tax totals"))?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
