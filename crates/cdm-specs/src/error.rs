//! Spec validation and manifest loading errors

use thiserror::Error;

/// Errors raised while loading or validating desired-state specs
///
/// Validation happens before any remote call is made.
#[derive(Debug, Error)]
pub enum SpecError {
    /// A field holds a value outside its allowed set or shape
    #[error("Invalid value for {field}: {reason}")]
    Validation {
        /// Dotted path of the offending field (e.g. `cluster.timezone`)
        field: String,
        /// What is wrong with it
        reason: String,
    },

    /// Manifest is not valid YAML or does not match the schema
    #[error("Manifest parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Manifest file could not be read
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),
}

impl SpecError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        SpecError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
