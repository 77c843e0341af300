//! # Settings Error Types

use thiserror::Error;

/// Result type alias for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings parsed but break a rule (bad currency code, scale too large).
    #[error("Invalid settings: {0}")]
    InvalidConfig(String),

    /// No explicit path and no platform config directory.
    #[error("No settings path available")]
    NoSettingsPath,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to write settings: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}
