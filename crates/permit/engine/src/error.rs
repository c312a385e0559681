//! Error types for the permit engine

use permit_types::ValidationError;
use thiserror::Error;

use crate::decision::DenialReason;

/// Errors raised while building the engine or loading its configuration
#[derive(Debug, Error)]
pub enum EngineError {
    /// A declaration or requirement was malformed
    #[error("invalid permission declaration: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid guard for a named operation
    #[error("invalid guard for operation '{operation}': {source}")]
    InvalidGuard {
        operation: String,
        #[source]
        source: ValidationError,
    },

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Raised by the permission gate when access is refused.
///
/// The display form is the configured denial message only; the reason is
/// kept for logging and never shown to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("{message}")]
    Denied {
        operation: String,
        message: String,
        reason: DenialReason,
    },
}

impl GateError {
    pub fn reason(&self) -> &DenialReason {
        match self {
            GateError::Denied { reason, .. } => reason,
        }
    }

    pub fn operation(&self) -> &str {
        match self {
            GateError::Denied { operation, .. } => operation,
        }
    }
}
