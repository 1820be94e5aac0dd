//! Error types for the skillgain core library.
//!
//! The gain path itself never fails: a qualifying action that earns nothing is
//! reported through [`crate::engine::Verdict`]. Errors only surface at the
//! edges (configuration, catalogs, registry lookups).

use thiserror::Error;

use crate::types::CharacterId;

/// Top-level error type for all skillgain operations.
#[derive(Error, Debug)]
pub enum ProgressionError {
    /// Configuration could not be parsed or merged.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A tuning value is outside its allowed range.
    #[error("Invalid tuning `{field}`: {reason}")]
    InvalidTuning {
        /// Dotted path of the offending field (e.g. `dance.gate.tau_high`).
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// No character with this id is registered.
    #[error("Character not found: {0}")]
    UnknownCharacter(CharacterId),

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProgressionError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTuning {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, ProgressionError>;
