//! Decision types
//!
//! A decision is a boolean with a reason attached on denial, and a
//! [`DecisionCard`] is the audit record built around it.

use std::fmt;

use chrono::{DateTime, Utc};
use permit_types::Mode;
use serde::{Deserialize, Serialize};

/// Why access was refused
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    /// No principal could be resolved
    NoPrincipal,

    /// The principal has no resolvable role
    NoRole { principal: String },

    /// A required code is not held
    MissingPermission { code: String },

    /// A contextual checker refused the subject
    ContextualDenial { code: String, checker: String },

    /// ANY mode: no required code was both held and approved
    NoSatisfiedPermission,

    /// A declared subject parameter could not be located
    SubjectNotFound { parameter: String },
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenialReason::NoPrincipal => write!(f, "no principal"),
            DenialReason::NoRole { principal } => write!(f, "principal {} has no role", principal),
            DenialReason::MissingPermission { code } => write!(f, "missing permission {}", code),
            DenialReason::ContextualDenial { code, checker } => {
                write!(f, "checker {} denied {} for subject", checker, code)
            }
            DenialReason::NoSatisfiedPermission => write!(f, "no required permission satisfied"),
            DenialReason::SubjectNotFound { parameter } => {
                write!(f, "subject '{}' not found", parameter)
            }
        }
    }
}

/// Outcome of an evaluation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Granted,
    Denied(DenialReason),
}

impl Decision {
    pub fn granted() -> Self {
        Self::Granted
    }

    pub fn denied(reason: DenialReason) -> Self {
        Self::Denied(reason)
    }

    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied(_))
    }

    pub fn reason(&self) -> Option<&DenialReason> {
        match self {
            Self::Granted => None,
            Self::Denied(reason) => Some(reason),
        }
    }
}

impl From<Decision> for bool {
    fn from(decision: Decision) -> Self {
        decision.is_granted()
    }
}

/// Audit record for a single evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionCard {
    /// Unique identifier for this decision
    pub id: String,

    /// Principal evaluated, if one was resolved
    pub principal_id: Option<String>,

    /// Required codes, in declaration order
    pub required: Vec<String>,

    pub mode: Mode,

    /// Type of the subject, if one was supplied
    pub subject_type: Option<String>,

    pub decision: Decision,

    /// Checkers whose `can` was invoked, in call order
    pub checkers_consulted: Vec<String>,

    pub decided_at: DateTime<Utc>,
}

impl DecisionCard {
    pub fn new(
        principal_id: Option<String>,
        required: Vec<String>,
        mode: Mode,
        subject_type: Option<String>,
        decision: Decision,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            principal_id,
            required,
            mode,
            subject_type,
            decision,
            checkers_consulted: Vec::new(),
            decided_at: Utc::now(),
        }
    }

    pub fn with_checkers(mut self, checkers: Vec<String>) -> Self {
        self.checkers_consulted = checkers;
        self
    }

    pub fn was_granted(&self) -> bool {
        self.decision.is_granted()
    }
}
