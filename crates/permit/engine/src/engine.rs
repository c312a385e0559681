//! Decision engine
//!
//! Reconciles required permissions against the codes a principal holds,
//! under ANY/ALL semantics, and hands held codes to the contextual checker
//! registry when a subject is supplied.
//!
//! The engine keeps no per-call state. Concurrent calls are safe as long as
//! the extractor and checkers are.

use std::fmt;
use std::sync::Arc;

use permit_types::{Mode, PermissionCode, PrincipalRecord, RequiredPermissions, Subject};
use tracing::debug;

use crate::checker::{CheckerRegistry, ContextualOutcome};
use crate::config::PermitConfig;
use crate::decision::{Decision, DecisionCard, DenialReason};
use crate::extractor::{CachingExtractor, PermissionExtractor, RolePermissionExtractor};

/// Computes access decisions
#[derive(Clone)]
pub struct DecisionEngine {
    extractor: Arc<dyn PermissionExtractor>,
    checkers: CheckerRegistry,
    cache: Option<Arc<CachingExtractor<RolePermissionExtractor>>>,
}

impl DecisionEngine {
    /// Engine reading permissions directly from roles
    pub fn new(checkers: CheckerRegistry) -> Self {
        Self {
            extractor: Arc::new(RolePermissionExtractor),
            checkers,
            cache: None,
        }
    }

    /// Engine with no contextual checkers
    pub fn without_checkers() -> Self {
        Self::new(CheckerRegistry::new())
    }

    /// Build from configuration; `enable_cache` puts a cache in front of extraction.
    ///
    /// The cache stays reachable through [`invalidate_principal`](Self::invalidate_principal)
    /// and [`clear_cache`](Self::clear_cache).
    pub fn from_config(config: &PermitConfig, checkers: CheckerRegistry) -> Self {
        let mut engine = Self::new(checkers);
        if config.enable_cache {
            let cache = Arc::new(CachingExtractor::with_capacity(
                RolePermissionExtractor,
                config.cache_capacity,
            ));
            let extractor: Arc<dyn PermissionExtractor> = cache.clone();
            engine.extractor = extractor;
            engine.cache = Some(cache);
        }
        engine
    }

    /// Replace the extractor. Drops the handle to any configured cache.
    pub fn with_extractor(mut self, extractor: Arc<dyn PermissionExtractor>) -> Self {
        self.extractor = extractor;
        self.cache = None;
        self
    }

    /// The extraction cache, when enabled by configuration
    pub fn cache(&self) -> Option<&CachingExtractor<RolePermissionExtractor>> {
        self.cache.as_deref()
    }

    /// Forget cached permissions for one principal.
    ///
    /// Call when the principal's role, or that role's permissions, change.
    pub fn invalidate_principal(&self, principal_id: &str) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|cache| cache.invalidate(principal_id))
    }

    pub fn clear_cache(&self) {
        if let Some(cache) = &self.cache {
            cache.clear();
        }
    }

    pub fn checkers(&self) -> &CheckerRegistry {
        &self.checkers
    }

    /// Whether the principal satisfies the requirement
    pub fn evaluate(
        &self,
        principal: Option<&dyn PrincipalRecord>,
        required: &RequiredPermissions,
        subject: Option<&Subject>,
    ) -> bool {
        self.decide(principal, required, subject).is_granted()
    }

    /// Like [`evaluate`](Self::evaluate), with the denial reason
    pub fn decide(
        &self,
        principal: Option<&dyn PrincipalRecord>,
        required: &RequiredPermissions,
        subject: Option<&Subject>,
    ) -> Decision {
        self.run(principal, required, subject, &mut Vec::new())
    }

    /// Decide and wrap the outcome in an audit card
    pub fn decide_with_card(
        &self,
        principal: Option<&dyn PrincipalRecord>,
        required: &RequiredPermissions,
        subject: Option<&Subject>,
    ) -> DecisionCard {
        let mut consulted = Vec::new();
        let decision = self.run(principal, required, subject, &mut consulted);

        DecisionCard::new(
            principal.map(|p| p.id().to_string()),
            required.code_strs().into_iter().map(String::from).collect(),
            required.mode(),
            subject.map(|s| s.short_type_name().to_string()),
            decision,
        )
        .with_checkers(consulted)
    }

    fn run(
        &self,
        principal: Option<&dyn PrincipalRecord>,
        required: &RequiredPermissions,
        subject: Option<&Subject>,
        consulted: &mut Vec<String>,
    ) -> Decision {
        let Some(principal) = principal else {
            return Decision::denied(DenialReason::NoPrincipal);
        };
        if principal.role().is_none() {
            return Decision::denied(DenialReason::NoRole {
                principal: principal.id().to_string(),
            });
        }

        let held = self.extractor.extract(Some(principal));

        debug!(
            principal = %principal.id(),
            required = ?required.code_strs(),
            mode = %required.mode(),
            subject = ?subject.map(|s| s.short_type_name()),
            held = held.len(),
            "Evaluating permissions"
        );

        // One code: mode is irrelevant
        if required.is_single() {
            let code = &required.codes()[0];
            if !held.contains(code.as_str()) {
                return missing(code);
            }
            return self.confirm(principal, code, subject, consulted);
        }

        match required.mode() {
            Mode::All => {
                for code in required.codes() {
                    if !held.contains(code.as_str()) {
                        return missing(code);
                    }
                    let decision = self.confirm(principal, code, subject, consulted);
                    if decision.is_denied() {
                        return decision;
                    }
                }
                Decision::granted()
            }
            Mode::Any => {
                let mut contextual_denial = None;
                for code in required.codes() {
                    if !held.contains(code.as_str()) {
                        continue;
                    }
                    match self.confirm(principal, code, subject, consulted) {
                        Decision::Granted => return Decision::granted(),
                        Decision::Denied(reason) => contextual_denial = Some(reason),
                    }
                }
                Decision::denied(contextual_denial.unwrap_or(DenialReason::NoSatisfiedPermission))
            }
        }
    }

    /// Contextual step for a held code. Without a subject nothing is dispatched.
    fn confirm(
        &self,
        principal: &dyn PrincipalRecord,
        code: &PermissionCode,
        subject: Option<&Subject>,
        consulted: &mut Vec<String>,
    ) -> Decision {
        let Some(subject) = subject else {
            return Decision::granted();
        };

        match self.checkers.resolve(principal, code.as_str(), subject) {
            ContextualOutcome::Unsupported => Decision::granted(),
            ContextualOutcome::Approved { checker } => {
                consulted.push(checker);
                Decision::granted()
            }
            ContextualOutcome::Denied { checker } => {
                debug!(
                    principal = %principal.id(),
                    code = %code,
                    checker = %checker,
                    "Contextual checker denied"
                );
                consulted.push(checker.clone());
                Decision::denied(DenialReason::ContextualDenial {
                    code: code.to_string(),
                    checker,
                })
            }
        }
    }
}

fn missing(code: &PermissionCode) -> Decision {
    Decision::denied(DenialReason::MissingPermission {
        code: code.to_string(),
    })
}

impl Default for DecisionEngine {
    fn default() -> Self {
        Self::without_checkers()
    }
}

impl fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("checkers", &self.checkers)
            .field("cached", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}
