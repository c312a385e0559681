//! Principal, role and permission records
//!
//! The traits describe what the decision engine reads from an identity
//! subsystem. The concrete structs are plain snapshots that can be loaded
//! from fixtures or built in tests.

use serde::{Deserialize, Serialize};

/// A permission as exposed by the identity subsystem.
pub trait PermissionRecord {
    /// The permission code, or `None` when the record is malformed.
    fn code(&self) -> Option<&str>;
}

/// A role holding a collection of permissions.
pub trait RoleRecord {
    fn name(&self) -> &str;

    /// Permissions granted by this role. Order is irrelevant.
    fn permissions(&self) -> Vec<&dyn PermissionRecord>;

    /// Bumped whenever the role's permissions change.
    ///
    /// Extraction caches compare it with the revision they stored.
    fn revision(&self) -> u64 {
        0
    }
}

/// The acting identity whose permissions are checked.
pub trait PrincipalRecord: Send + Sync {
    fn id(&self) -> &str;

    /// The principal's role, if one is assigned and resolvable.
    fn role(&self) -> Option<&dyn RoleRecord>;
}

/// Snapshot of a single permission
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub code: String,
}

impl Permission {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl PermissionRecord for Permission {
    fn code(&self) -> Option<&str> {
        Some(&self.code)
    }
}

/// Snapshot of a role and its permissions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(default)]
    pub revision: u64,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: Vec::new(),
            revision: 0,
        }
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn with_permission(mut self, code: impl Into<String>) -> Self {
        self.permissions.push(Permission::new(code));
        self
    }

    pub fn with_permissions<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permissions.extend(codes.into_iter().map(Permission::new));
        self
    }
}

impl RoleRecord for Role {
    fn name(&self) -> &str {
        &self.name
    }

    fn permissions(&self) -> Vec<&dyn PermissionRecord> {
        self.permissions
            .iter()
            .map(|p| p as &dyn PermissionRecord)
            .collect()
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// Snapshot of a principal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: String,
    #[serde(default)]
    pub role: Option<Role>,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            role: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

impl PrincipalRecord for Principal {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> Option<&dyn RoleRecord> {
        self.role.as_ref().map(|r| r as &dyn RoleRecord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_exposes_permissions() {
        let role = Role::new("editor").with_permissions(["article_view", "article_edit"]);
        let codes: Vec<_> = role.permissions().iter().filter_map(|p| p.code()).collect();
        assert_eq!(codes, vec!["article_view", "article_edit"]);
    }

    #[test]
    fn role_revision_defaults_to_zero() {
        assert_eq!(RoleRecord::revision(&Role::new("viewer")), 0);
        assert_eq!(RoleRecord::revision(&Role::new("viewer").with_revision(3)), 3);

        let role: Role = serde_json::from_str(r#"{"name":"viewer"}"#).unwrap();
        assert_eq!(role.revision, 0);
    }

    #[test]
    fn principal_without_role() {
        let principal = Principal::new("alice");
        assert!(principal.role().is_none());
        assert_eq!(principal.id(), "alice");
    }
}
