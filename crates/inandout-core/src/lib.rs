//! # inandout-core: Pricing Engine for Inventory Transactions
//!
//! Computes tax-inclusive and tax-exclusive totals for line items and whole
//! transactions under configurable rounding rules. Pure functions over
//! immutable values; no I/O, no caching, safe to call from any thread.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Editors, CSV export, formatters (collaborators)                        │
//! │              │ validated inputs            ▲ exact decimals             │
//! │              ▼                             │                            │
//! │  ┌─────────────────────────────────────────┴───────────────────────┐   │
//! │  │               ★ inandout-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐  ┌──────────┐  ┌───────────┐  ┌─────────────┐   │   │
//! │  │   │ rounding │─►│   tax    │─►│   price   │─►│ transaction │   │   │
//! │  │   │  Rule    │  │ Rate/    │  │ PriceInfo │  │ total,      │   │   │
//! │  │   │  RuleSet │  │ Fixed    │  │ PriceType │  │ shared tax  │   │   │
//! │  │   └──────────┘  └──────────┘  └───────────┘  └─────────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FORMATTING • NO FLOATS • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │              ▲                                                          │
//! │  inandout-settings: currency → default RoundingRule, settings.toml      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`rounding`] - `RoundingRule`, `RoundingRuleSet`, the single `round` function
//! - [`tax`] - regular/compound `RateTaxItem`, `FixedAmountItem`
//! - [`price`] - `PriceInfo` line item engine
//! - [`transaction`] - `Transaction` totals and shared tax breakdown
//! - [`validation`] - pre-save checks
//! - [`error`] - domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use inandout_core::{
//!     FixedAmountItem, ItemTransaction, PriceInfo, PriceType, RateTaxItem, RoundingRule,
//!     RoundingRuleSet, Transaction, TransactionType,
//! };
//! use rust_decimal::Decimal;
//!
//! let rules = RoundingRuleSet::uniform(RoundingRule::half_up(2));
//! let line = ItemTransaction::new(
//!     "Widget",
//!     PriceInfo::new(Decimal::from(100), PriceType::SumBeforeTax, 4)
//!         .with_regular_tax(RateTaxItem::new("GST", Decimal::new(5, 2)))
//!         .with_compound_tax(RateTaxItem::new("QST", Decimal::new(10, 2))),
//! );
//! let txn = Transaction::fresh(TransactionType::ItemsIn)
//!     .with_subtransactions(vec![line])
//!     .with_fixed_costs(vec![FixedAmountItem::new("Shipping", Decimal::new(250, 2))]);
//!
//! // 100 + 5.00 GST + 10.50 QST + 2.50 shipping
//! assert_eq!(txn.total(&rules), Decimal::new(11800, 2));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod price;
pub mod rounding;
pub mod tax;
pub mod transaction;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use price::{ItemQuantity, PriceInfo, PriceType};
pub use rounding::{round, RoundingMode, RoundingRule, RoundingRuleSet};
pub use tax::{FixedAmountItem, RateTaxItem};
pub use transaction::{ContactInfo, ItemTransaction, SharedTaxInfo, Transaction, TransactionType};

/// Largest scale a `rust_decimal::Decimal` can carry; rules above it are
/// rejected by the settings layer.
pub const MAX_ROUNDING_SCALE: u32 = 28;
