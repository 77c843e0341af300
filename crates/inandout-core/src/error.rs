//! # Error Types
//!
//! Domain-specific error types for inandout-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  inandout-core errors (this file)                                       │
//! │  ├── CoreError        - Line and transaction-level failures             │
//! │  └── ValidationError  - Line item validation failures                   │
//! │                                                                         │
//! │  inandout-settings errors (separate crate)                              │
//! │  └── SettingsError    - Config load/save failures                       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → caller blocks the save/edit flow   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Arithmetic never produces an error. A zero divisor yields `0` and an
//! inferred value is reported through flags on `PriceInfo`, not through
//! this module.

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Transaction-level errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A single line item of a transaction failed validation.
    ///
    /// `line` is the zero-based position in `Transaction::subtransactions`.
    #[error("Line {line} is invalid: {source}")]
    InvalidLine {
        line: usize,
        #[source]
        source: ValidationError,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Returned by the `validation` module so the caller can refuse to commit
/// an edit. The pricing functions themselves never return these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required { field: String },

    /// The document requires an item ID but the line has none.
    #[error("Item '{item_name}' has no item ID")]
    MissingItemId { item_name: String },

    /// Two tax items of one line share a name (across all three lists).
    #[error("Tax item name '{name}' is used more than once")]
    DuplicateTaxItemName { name: String },

    /// Tax rate outside the closed interval [0, 1].
    #[error("Tax item '{name}' has rate {rate}, expected a value between 0 and 1")]
    InvalidRate { name: String, rate: Decimal },

    /// A derived amount does not fit in a `Decimal`.
    #[error("{field} is too large to compute")]
    AmountOverflow { field: String },

    /// Rounding mode name not recognized.
    #[error("Unknown rounding mode: '{0}'. Valid options: plain, bankers, up, down")]
    UnknownRoundingMode(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
