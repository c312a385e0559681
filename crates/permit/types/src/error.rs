//! Validation errors raised while building permission requirements

use thiserror::Error;

/// Errors raised when a permission declaration is malformed.
///
/// These are configuration defects: they surface when a requirement is
/// constructed, never while a decision is being evaluated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A permission code was empty or whitespace only
    #[error("permission code cannot be empty")]
    EmptyCode,

    /// A requirement was declared with no codes at all
    #[error("permission list cannot be empty")]
    EmptyCodeList,

    /// Mode was neither ANY nor ALL
    #[error("invalid mode '{0}': expected ANY or ALL")]
    InvalidMode(String),

    /// A subject parameter was declared with an empty name
    #[error("subject parameter name cannot be empty")]
    EmptySubjectParameter,
}

/// Result type for validation
pub type Result<T> = std::result::Result<T, ValidationError>;
