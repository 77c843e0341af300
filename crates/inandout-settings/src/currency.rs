//! # Currency Defaults
//!
//! Number of fractional digits each ISO 4217 currency conventionally uses.
//! The engine never sees a currency code: this is turned into a default
//! [`RoundingRule`] here and handed in.
//!
//! ```text
//!   0 digits   JPY, KRW, VND, CLP, ISK, ...
//!   2 digits   USD, EUR, CAD, GBP, ... (also the fallback)
//!   3 digits   BHD, KWD, JOD, OMR, TND, IQD, LYD
//!   4 digits   CLF, UYW
//! ```

use inandout_core::RoundingRule;
use tracing::debug;

/// Scale used for a code that is not in the table.
pub const FALLBACK_MINOR_UNITS: u32 = 2;

/// Code used when neither settings nor environment name one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Minor units for an ISO 4217 code, matched case-insensitively.
pub fn minor_units(code: &str) -> Option<u32> {
    let units = match code.trim().to_ascii_uppercase().as_str() {
        "BIF" | "CLP" | "DJF" | "GNF" | "ISK" | "JPY" | "KMF" | "KRW" | "PYG" | "RWF" | "UGX"
        | "UYI" | "VND" | "VUV" | "XAF" | "XOF" | "XPF" => 0,

        "AED" | "ARS" | "AUD" | "BGN" | "BRL" | "CAD" | "CHF" | "CNY" | "COP" | "CZK" | "DKK"
        | "EGP" | "EUR" | "GBP" | "HKD" | "HUF" | "IDR" | "ILS" | "INR" | "MAD" | "MXN"
        | "MYR" | "NGN" | "NOK" | "NZD" | "PEN" | "PHP" | "PKR" | "PLN" | "RON" | "RUB"
        | "SAR" | "SEK" | "SGD" | "THB" | "TRY" | "TWD" | "UAH" | "USD" | "ZAR" => 2,

        "BHD" | "IQD" | "JOD" | "KWD" | "LYD" | "OMR" | "TND" => 3,

        "CLF" | "UYW" => 4,

        _ => return None,
    };
    Some(units)
}

/// Half-up at the currency's minor units, or at two digits when unknown.
pub fn default_rounding_rule(code: &str) -> RoundingRule {
    let scale = minor_units(code).unwrap_or_else(|| {
        debug!(currency = %code, "Unknown currency, using {} fractional digits", FALLBACK_MINOR_UNITS);
        FALLBACK_MINOR_UNITS
    });
    RoundingRule::half_up(scale)
}

/// Three ASCII letters.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())
}
