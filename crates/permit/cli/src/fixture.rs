//! YAML fixtures describing roles, principals and owned resources

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use permit_engine::{CheckerRegistry, ContextualChecker};
use permit_types::{Principal, PrincipalRecord, Role, Subject};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub roles: Vec<RoleEntry>,
    #[serde(default)]
    pub principals: Vec<PrincipalEntry>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub ownership: Vec<OwnershipRule>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleEntry {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PrincipalEntry {
    pub id: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// A resource with an owner, used as a subject
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Resource {
    pub kind: String,
    pub id: String,
    pub owner: String,
}

/// Permission codes on a resource kind that only the owner may exercise
#[derive(Debug, Clone, Deserialize)]
pub struct OwnershipRule {
    pub permission: String,
    pub kind: String,
}

impl Fixture {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading fixture {}", path.display()))?;
        serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing fixture {}", path.display()))
    }

    /// Snapshot of a principal. A role name with no matching role leaves the
    /// principal without a role.
    pub fn principal(&self, id: &str) -> Option<Principal> {
        let entry = self.principals.iter().find(|p| p.id == id)?;
        let role = entry
            .role
            .as_deref()
            .and_then(|name| self.roles.iter().find(|r| r.name == name))
            .map(|r| Role::new(&r.name).with_permissions(r.permissions.iter().cloned()));

        let principal = Principal::new(&entry.id);
        Some(match role {
            Some(role) => principal.with_role(role),
            None => principal,
        })
    }

    pub fn resource(&self, kind: &str, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.kind == kind && r.id == id)
    }

    /// Parse `kind:id` and look the resource up
    pub fn subject(&self, reference: &str) -> Result<(String, Subject)> {
        let (kind, id) = reference
            .split_once(':')
            .with_context(|| format!("subject '{}' must be written kind:id", reference))?;
        let resource = self
            .resource(kind, id)
            .with_context(|| format!("no {} with id {} in fixture", kind, id))?;
        Ok((kind.to_string(), Subject::new(resource.clone())))
    }

    pub fn checkers(&self) -> CheckerRegistry {
        if self.ownership.is_empty() {
            return CheckerRegistry::new();
        }
        CheckerRegistry::new().register(Arc::new(OwnershipChecker::new(&self.ownership)))
    }
}

/// Only the owner of a resource may exercise the listed permissions on it
#[derive(Debug, Clone)]
pub struct OwnershipChecker {
    rules: HashSet<(String, String)>,
}

impl OwnershipChecker {
    pub fn new(rules: &[OwnershipRule]) -> Self {
        Self {
            rules: rules
                .iter()
                .map(|r| (r.permission.clone(), r.kind.clone()))
                .collect(),
        }
    }
}

impl ContextualChecker for OwnershipChecker {
    fn name(&self) -> &str {
        "ownership"
    }

    fn supports(&self, permission: &str, subject: &Subject) -> bool {
        subject.downcast_ref::<Resource>().is_some_and(|resource| {
            self.rules
                .contains(&(permission.to_string(), resource.kind.clone()))
        })
    }

    fn can(&self, principal: &dyn PrincipalRecord, _permission: &str, subject: &Subject) -> bool {
        subject
            .downcast_ref::<Resource>()
            .is_some_and(|resource| resource.owner == principal.id())
    }
}
