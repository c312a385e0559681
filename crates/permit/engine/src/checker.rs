//! Contextual (row-level) checkers
//!
//! A checker adds object-level rules on top of base permission possession,
//! e.g. "only the author may edit this article". Checkers are registered in
//! order and the first one that supports a permission/subject pair decides.

use std::fmt;
use std::sync::Arc;

use permit_types::{PrincipalRecord, Subject};

/// Object-level authorization for a permission and subject.
pub trait ContextualChecker: Send + Sync {
    /// Label used in logs and denial reasons
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Whether this checker has an opinion on the pair.
    ///
    /// Called for every candidate checker on every contextual evaluation, so
    /// it must be cheap and free of side effects.
    fn supports(&self, permission: &str, subject: &Subject) -> bool;

    /// The contextual decision itself
    fn can(&self, principal: &dyn PrincipalRecord, permission: &str, subject: &Subject) -> bool;
}

/// Result of dispatching a permission to the registry
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContextualOutcome {
    /// The first supporting checker approved
    Approved { checker: String },

    /// The first supporting checker refused
    Denied { checker: String },

    /// No checker supports the pair; base possession stands
    Unsupported,
}

impl ContextualOutcome {
    /// Unsupported counts as approval
    pub fn is_approved(&self) -> bool {
        !matches!(self, ContextualOutcome::Denied { .. })
    }

    pub fn checker(&self) -> Option<&str> {
        match self {
            ContextualOutcome::Approved { checker } | ContextualOutcome::Denied { checker } => {
                Some(checker)
            }
            ContextualOutcome::Unsupported => None,
        }
    }
}

/// Ordered collection of contextual checkers
#[derive(Clone, Default)]
pub struct CheckerRegistry {
    checkers: Vec<Arc<dyn ContextualChecker>>,
}

impl CheckerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a checker; earlier registrations take precedence
    pub fn register(mut self, checker: Arc<dyn ContextualChecker>) -> Self {
        self.checkers.push(checker);
        self
    }

    pub fn push(&mut self, checker: Arc<dyn ContextualChecker>) {
        self.checkers.push(checker);
    }

    pub fn len(&self) -> usize {
        self.checkers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.checkers.iter().map(|c| c.name()).collect()
    }

    /// First checker supporting the pair, in registration order
    pub fn first_supporting(
        &self,
        permission: &str,
        subject: &Subject,
    ) -> Option<&Arc<dyn ContextualChecker>> {
        self.checkers
            .iter()
            .find(|checker| checker.supports(permission, subject))
    }

    /// Dispatch to the first supporting checker; later checkers are not consulted.
    pub fn resolve(
        &self,
        principal: &dyn PrincipalRecord,
        permission: &str,
        subject: &Subject,
    ) -> ContextualOutcome {
        match self.first_supporting(permission, subject) {
            Some(checker) => {
                let checker_name = checker.name().to_string();
                if checker.can(principal, permission, subject) {
                    ContextualOutcome::Approved {
                        checker: checker_name,
                    }
                } else {
                    ContextualOutcome::Denied {
                        checker: checker_name,
                    }
                }
            }
            None => ContextualOutcome::Unsupported,
        }
    }
}

impl fmt::Debug for CheckerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckerRegistry")
            .field("checkers", &self.names())
            .finish()
    }
}

impl FromIterator<Arc<dyn ContextualChecker>> for CheckerRegistry {
    fn from_iter<I: IntoIterator<Item = Arc<dyn ContextualChecker>>>(iter: I) -> Self {
        Self {
            checkers: iter.into_iter().collect(),
        }
    }
}

type SupportsFn = dyn Fn(&str, &Subject) -> bool + Send + Sync;
type CanFn = dyn Fn(&dyn PrincipalRecord, &str, &Subject) -> bool + Send + Sync;

/// Checker built from two closures
pub struct FnChecker {
    name: String,
    supports: Box<SupportsFn>,
    can: Box<CanFn>,
}

impl FnChecker {
    pub fn new<S, C>(name: impl Into<String>, supports: S, can: C) -> Self
    where
        S: Fn(&str, &Subject) -> bool + Send + Sync + 'static,
        C: Fn(&dyn PrincipalRecord, &str, &Subject) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            supports: Box::new(supports),
            can: Box::new(can),
        }
    }

    /// Checker for one permission code on subjects of type `T`
    pub fn for_type<T, C>(name: impl Into<String>, permission: impl Into<String>, can: C) -> Self
    where
        T: std::any::Any,
        C: Fn(&dyn PrincipalRecord, &T) -> bool + Send + Sync + 'static,
    {
        let permission = permission.into();
        Self::new(
            name,
            move |code, subject| code == permission && subject.is::<T>(),
            move |principal, _, subject| {
                subject
                    .downcast_ref::<T>()
                    .map(|value| can(principal, value))
                    .unwrap_or(false)
            },
        )
    }
}

impl ContextualChecker for FnChecker {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, permission: &str, subject: &Subject) -> bool {
        (self.supports)(permission, subject)
    }

    fn can(&self, principal: &dyn PrincipalRecord, permission: &str, subject: &Subject) -> bool {
        (self.can)(principal, permission, subject)
    }
}

impl fmt::Debug for FnChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnChecker")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
