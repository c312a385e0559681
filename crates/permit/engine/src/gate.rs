//! Permission gate
//!
//! Enforcement point for guarded operations. The gate turns a denial from
//! the decision engine into a [`GateError`] carrying the configured message.

use permit_types::PrincipalRecord;
use tracing::{debug, warn};

use crate::config::{PermitConfig, DEFAULT_DENIAL_MESSAGE};
use crate::decision::{Decision, DenialReason};
use crate::declaration::{GuardedOperation, PermissionDeclaration};
use crate::error::GateError;
use crate::service::PermissionService;
use crate::subject::SubjectResolver;

/// Enforces permission declarations
#[derive(Debug, Clone)]
pub struct PermissionGate {
    service: PermissionService,
    denial_message: String,
}

impl PermissionGate {
    pub fn new(service: PermissionService) -> Self {
        Self {
            service,
            denial_message: DEFAULT_DENIAL_MESSAGE.to_string(),
        }
    }

    pub fn from_config(service: PermissionService, config: &PermitConfig) -> Self {
        Self::new(service).with_denial_message(config.denial_message.clone())
    }

    pub fn with_denial_message(mut self, message: impl Into<String>) -> Self {
        self.denial_message = message.into();
        self
    }

    pub fn denial_message(&self) -> &str {
        &self.denial_message
    }

    pub fn service(&self) -> &PermissionService {
        &self.service
    }

    /// Check a single declaration against the current principal
    pub fn check(
        &self,
        declaration: &PermissionDeclaration,
        subjects: &dyn SubjectResolver,
    ) -> Decision {
        let principal = self.service.current_principal();
        self.check_as(principal.as_deref(), declaration, subjects)
    }

    fn check_as(
        &self,
        principal: Option<&dyn PrincipalRecord>,
        declaration: &PermissionDeclaration,
        subjects: &dyn SubjectResolver,
    ) -> Decision {
        let subject = match declaration.subject_param() {
            Some(param) => match subjects.resolve(param) {
                Some(subject) => Some(subject),
                None => {
                    return Decision::denied(DenialReason::SubjectNotFound {
                        parameter: param.to_string(),
                    })
                }
            },
            None => None,
        };

        self.service
            .engine()
            .decide(principal, declaration.required(), subject.as_ref())
    }

    /// Enforce every declaration on the operation, in order.
    ///
    /// The principal is resolved once and shared by every declaration. The
    /// first denial aborts with [`GateError::Denied`].
    pub fn enforce(
        &self,
        operation: &GuardedOperation,
        subjects: &dyn SubjectResolver,
    ) -> Result<(), GateError> {
        let principal = self.service.current_principal();
        let principal = principal.as_deref();

        for declaration in operation.declarations() {
            if let Decision::Denied(reason) = self.check_as(principal, declaration, subjects) {
                warn!(
                    operation = %operation.name(),
                    principal = ?principal.map(|p| p.id()),
                    required = ?declaration.required().code_strs(),
                    reason = %reason,
                    "Permission denied"
                );
                return Err(GateError::Denied {
                    operation: operation.name().to_string(),
                    message: self.denial_message.clone(),
                    reason,
                });
            }
        }

        debug!(
            operation = %operation.name(),
            declarations = operation.declarations().len(),
            "Permission granted"
        );
        Ok(())
    }

    /// Boolean form of [`enforce`](Self::enforce)
    pub fn allows(&self, operation: &GuardedOperation, subjects: &dyn SubjectResolver) -> bool {
        self.enforce(operation, subjects).is_ok()
    }
}
