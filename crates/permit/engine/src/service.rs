//! Permission service
//!
//! The caller-facing `can` function: resolves the current principal and asks
//! the decision engine.

use std::fmt;
use std::sync::Arc;

use permit_types::{Mode, PrincipalRecord, RequiredPermissions, Subject};

use crate::decision::{Decision, DecisionCard};
use crate::engine::DecisionEngine;

/// Supplies the principal making the current request.
pub trait PrincipalResolver: Send + Sync {
    /// `None` when the caller is not authenticated
    fn current_principal(&self) -> Option<Arc<dyn PrincipalRecord>>;
}

impl<F> PrincipalResolver for F
where
    F: Fn() -> Option<Arc<dyn PrincipalRecord>> + Send + Sync,
{
    fn current_principal(&self) -> Option<Arc<dyn PrincipalRecord>> {
        self()
    }
}

/// Answers "can the current principal do this?"
#[derive(Clone)]
pub struct PermissionService {
    engine: Arc<DecisionEngine>,
    principals: Arc<dyn PrincipalResolver>,
}

impl PermissionService {
    pub fn new(engine: Arc<DecisionEngine>, principals: Arc<dyn PrincipalResolver>) -> Self {
        Self { engine, principals }
    }

    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    pub fn can(&self, required: &RequiredPermissions, subject: Option<&Subject>) -> bool {
        self.decide(required, subject).is_granted()
    }

    /// `can` over raw codes. A missing mode means ANY.
    pub fn can_codes(
        &self,
        codes: &[&str],
        mode: Option<&str>,
        subject: Option<&Subject>,
    ) -> permit_types::Result<bool> {
        let mode = match mode {
            Some(m) => m.parse()?,
            None => Mode::Any,
        };
        let required = RequiredPermissions::new(codes.iter().copied(), mode)?;
        Ok(self.can(&required, subject))
    }

    pub fn decide(&self, required: &RequiredPermissions, subject: Option<&Subject>) -> Decision {
        let principal = self.principals.current_principal();
        self.engine.decide(principal.as_deref(), required, subject)
    }

    pub fn decide_with_card(
        &self,
        required: &RequiredPermissions,
        subject: Option<&Subject>,
    ) -> DecisionCard {
        let principal = self.principals.current_principal();
        self.engine
            .decide_with_card(principal.as_deref(), required, subject)
    }

    /// The principal making the current request
    pub fn current_principal(&self) -> Option<Arc<dyn PrincipalRecord>> {
        self.principals.current_principal()
    }
}

impl fmt::Debug for PermissionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionService")
            .field("engine", &self.engine)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::MockPrincipalResolver;
    use permit_types::{Principal, Role, ValidationError};

    fn service_for(principal: Option<Principal>) -> PermissionService {
        let resolver = match principal {
            Some(p) => MockPrincipalResolver::with_principal(p),
            None => MockPrincipalResolver::anonymous(),
        };
        PermissionService::new(Arc::new(DecisionEngine::default()), Arc::new(resolver))
    }

    fn editor() -> Principal {
        Principal::new("alice")
            .with_role(Role::new("editor").with_permissions(["user_view", "user_edit"]))
    }

    #[test]
    fn can_codes_defaults_to_any() {
        let service = service_for(Some(editor()));
        assert!(service.can_codes(&["user_view", "user_delete"], None, None).unwrap());
        assert!(!service
            .can_codes(&["user_view", "user_delete"], Some("all"), None)
            .unwrap());
    }

    #[test]
    fn can_codes_validates_input() {
        let service = service_for(Some(editor()));
        assert_eq!(
            service.can_codes(&[], None, None),
            Err(ValidationError::EmptyCodeList)
        );
        assert!(matches!(
            service.can_codes(&["user_view"], Some("most"), None),
            Err(ValidationError::InvalidMode(_))
        ));
    }

    #[test]
    fn anonymous_caller_is_denied() {
        let service = service_for(None);
        let required = RequiredPermissions::one("user_view").unwrap();
        assert!(!service.can(&required, None));
        assert!(service.current_principal().is_none());
    }

    #[test]
    fn closure_resolver() {
        let principal: Arc<dyn PrincipalRecord> = Arc::new(editor());
        let resolver = move || Some(principal.clone());
        let service =
            PermissionService::new(Arc::new(DecisionEngine::default()), Arc::new(resolver));
        let card = service.decide_with_card(&RequiredPermissions::one("user_edit").unwrap(), None);
        assert!(card.was_granted());
    }
}
