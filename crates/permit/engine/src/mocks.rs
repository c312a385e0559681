use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use permit_types::{Principal, PrincipalRecord, Subject};

use crate::checker::ContextualChecker;
use crate::service::PrincipalResolver;

/// Mock principal resolver for testing.
///
/// Always returns the same principal, or none for an anonymous caller.
#[derive(Clone, Default)]
pub struct MockPrincipalResolver {
    principal: Option<Arc<dyn PrincipalRecord>>,
}

impl MockPrincipalResolver {
    /// Resolver with no authenticated principal
    pub fn anonymous() -> Self {
        Self { principal: None }
    }

    pub fn with_principal(principal: Principal) -> Self {
        Self {
            principal: Some(Arc::new(principal)),
        }
    }
}

impl PrincipalResolver for MockPrincipalResolver {
    fn current_principal(&self) -> Option<Arc<dyn PrincipalRecord>> {
        self.principal.clone()
    }
}

/// Checker with a fixed verdict.
///
/// Supports every permission unless narrowed with [`StaticChecker::for_permission`].
#[derive(Debug, Clone)]
pub struct StaticChecker {
    name: String,
    permission: Option<String>,
    verdict: bool,
}

impl StaticChecker {
    pub fn allow(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permission: None,
            verdict: true,
        }
    }

    pub fn deny(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permission: None,
            verdict: false,
        }
    }

    pub fn for_permission(mut self, code: impl Into<String>) -> Self {
        self.permission = Some(code.into());
        self
    }
}

impl ContextualChecker for StaticChecker {
    fn name(&self) -> &str {
        &self.name
    }

    fn supports(&self, permission: &str, _subject: &Subject) -> bool {
        self.permission.as_deref().map_or(true, |p| p == permission)
    }

    fn can(&self, _principal: &dyn PrincipalRecord, _permission: &str, _subject: &Subject) -> bool {
        self.verdict
    }
}

/// Wraps a checker and counts calls to it
#[derive(Debug)]
pub struct CountingChecker<C> {
    inner: C,
    supports_calls: AtomicUsize,
    can_calls: AtomicUsize,
}

impl<C: ContextualChecker> CountingChecker<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            supports_calls: AtomicUsize::new(0),
            can_calls: AtomicUsize::new(0),
        }
    }

    pub fn supports_calls(&self) -> usize {
        self.supports_calls.load(Ordering::SeqCst)
    }

    pub fn can_calls(&self) -> usize {
        self.can_calls.load(Ordering::SeqCst)
    }
}

impl<C: ContextualChecker> ContextualChecker for CountingChecker<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn supports(&self, permission: &str, subject: &Subject) -> bool {
        self.supports_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.supports(permission, subject)
    }

    fn can(&self, principal: &dyn PrincipalRecord, permission: &str, subject: &Subject) -> bool {
        self.can_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.can(principal, permission, subject)
    }
}
