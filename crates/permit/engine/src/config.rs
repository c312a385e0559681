//! Permit configuration
//!
//! Loaded from TOML. Holds the denial message shown by the gate, the cache
//! switch for permission extraction, and declarative guards per operation.
//!
//! ```toml
//! denial_message = "Access denied"
//! enable_cache = false
//! cache_capacity = 1024
//!
//! [[guards.edit_article]]
//! permission = "article_edit"
//! subject = "article"
//!
//! [[guards.manage_users]]
//! permission = ["user_view", "user_edit"]
//! mode = "all"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use permit_types::{Mode, RequiredPermissions};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::declaration::{GuardedOperation, PermissionDeclaration};
use crate::error::{EngineError, Result};
use crate::extractor::DEFAULT_CACHE_CAPACITY;

/// Message returned to callers when the gate denies access
pub const DEFAULT_DENIAL_MESSAGE: &str = "Access denied: insufficient permissions.";

/// Environment variable overriding `denial_message`
pub const DENIAL_MESSAGE_ENV: &str = "PERMIT_DENIAL_MESSAGE";

/// Permit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PermitConfig {
    pub denial_message: String,

    /// Cache extracted permissions per principal
    pub enable_cache: bool,

    /// Principals kept in the cache before it starts over
    pub cache_capacity: usize,

    /// Declarations per operation name
    pub guards: BTreeMap<String, Vec<DeclarationSpec>>,
}

impl Default for PermitConfig {
    fn default() -> Self {
        Self {
            denial_message: DEFAULT_DENIAL_MESSAGE.to_string(),
            enable_cache: false,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            guards: BTreeMap::new(),
        }
    }
}

/// A single code or a list of codes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(code) => vec![code],
            OneOrMany::Many(codes) => codes,
        }
    }
}

/// Unvalidated declaration as written in configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclarationSpec {
    pub permission: OneOrMany,

    /// `any` or `all`, any case; ANY when omitted
    #[serde(default)]
    pub mode: Option<String>,

    /// Name of the subject parameter for contextual checks
    #[serde(default)]
    pub subject: Option<String>,
}

impl DeclarationSpec {
    pub fn to_declaration(&self) -> permit_types::Result<PermissionDeclaration> {
        let mode = match &self.mode {
            Some(mode) => mode.parse()?,
            None => Mode::Any,
        };
        let required = RequiredPermissions::new(self.permission.clone().into_vec(), mode)?;
        PermissionDeclaration::new(required, self.subject.clone())
    }
}

impl PermitConfig {
    /// Load from a TOML file; a missing file yields the defaults.
    ///
    /// Guards are validated eagerly, so a malformed declaration fails here.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(path)?;
                let config = Self::from_toml_str(&contents)?;
                info!(
                    path = %path.display(),
                    guards = config.guards.len(),
                    cache = config.enable_cache,
                    "Loaded permit configuration"
                );
                config
            }
            _ => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse and validate TOML
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: PermitConfig =
            toml::from_str(contents).map_err(|e| EngineError::Config(e.to_string()))?;
        config.guarded_operations()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup, typically the environment
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(message) = lookup(DENIAL_MESSAGE_ENV) {
            if !message.trim().is_empty() {
                self.denial_message = message;
            }
        }
    }

    /// Validate every guard and build its operation
    pub fn guarded_operations(&self) -> Result<Vec<GuardedOperation>> {
        self.guards
            .iter()
            .map(|(name, specs)| {
                specs
                    .iter()
                    .try_fold(GuardedOperation::new(name), |op, spec| {
                        spec.to_declaration().map(|decl| op.declare(decl))
                    })
                    .map_err(|source| EngineError::InvalidGuard {
                        operation: name.clone(),
                        source,
                    })
            })
            .collect()
    }

    /// The guard for one operation, if configured
    pub fn guarded_operation(&self, name: &str) -> Result<Option<GuardedOperation>> {
        Ok(self
            .guarded_operations()?
            .into_iter()
            .find(|op| op.name() == name))
    }
}
