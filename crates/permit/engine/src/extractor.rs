//! Held-permission extraction
//!
//! Turns a principal into the set of permission codes its role grants.
//! Extraction never fails: missing principals, roles or codes shrink the
//! set instead of raising.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use permit_types::PrincipalRecord;
use tracing::debug;

/// The set of permission codes a principal holds
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HeldPermissions {
    codes: HashSet<String>,
}

impl HeldPermissions {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes.contains(code)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    /// Codes in sorted order, for stable output
    pub fn sorted(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.iter().collect();
        codes.sort_unstable();
        codes
    }
}

impl<S: Into<String>> FromIterator<S> for HeldPermissions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Derives the permission codes held by a principal.
///
/// Implementations must be side-effect free as far as callers can observe,
/// and must return the empty set for an absent principal.
pub trait PermissionExtractor: Send + Sync {
    fn extract(&self, principal: Option<&dyn PrincipalRecord>) -> HeldPermissions;
}

/// Reads codes straight from the principal's role.
#[derive(Debug, Default, Clone, Copy)]
pub struct RolePermissionExtractor;

impl RolePermissionExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl PermissionExtractor for RolePermissionExtractor {
    fn extract(&self, principal: Option<&dyn PrincipalRecord>) -> HeldPermissions {
        let Some(principal) = principal else {
            return HeldPermissions::empty();
        };
        let Some(role) = principal.role() else {
            return HeldPermissions::empty();
        };

        let mut codes = HashSet::new();
        for record in role.permissions() {
            match record.code() {
                Some(code) if !code.trim().is_empty() => {
                    codes.insert(code.to_string());
                }
                _ => {
                    debug!(
                        principal = %principal.id(),
                        role = %role.name(),
                        "Skipping malformed permission record"
                    );
                }
            }
        }

        HeldPermissions { codes }
    }
}

/// Entries kept by a [`CachingExtractor`] before it starts over
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Role identity at the time an entry was cached
#[derive(Clone, Debug, PartialEq, Eq)]
struct RoleStamp {
    role: String,
    revision: u64,
}

#[derive(Clone, Debug)]
struct CacheEntry {
    stamp: RoleStamp,
    held: HeldPermissions,
}

/// Caches extraction results per principal.
///
/// An entry is reused only while the principal still has the same role name
/// and [`RoleRecord::revision`](permit_types::RoleRecord::revision). Roles whose
/// permissions change without a revision bump must be dropped with
/// [`invalidate`](Self::invalidate) or [`clear`](Self::clear).
///
/// Absent and roleless principals are never cached. A full cache is cleared
/// before the next insert. A poisoned lock falls back to the wrapped extractor.
#[derive(Debug)]
pub struct CachingExtractor<E> {
    inner: E,
    capacity: usize,
    cache: RwLock<HashMap<String, CacheEntry>>,
}

impl<E: PermissionExtractor> CachingExtractor<E> {
    pub fn new(inner: E) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(inner: E, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop the cached entry for one principal
    pub fn invalidate(&self, principal_id: &str) -> bool {
        match self.cache.write() {
            Ok(mut cache) => cache.remove(principal_id).is_some(),
            Err(_) => false,
        }
    }

    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache.write() {
            cache.clear();
        }
    }

    /// Number of cached principals
    pub fn len(&self) -> usize {
        self.cache.read().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: PermissionExtractor> PermissionExtractor for CachingExtractor<E> {
    fn extract(&self, principal: Option<&dyn PrincipalRecord>) -> HeldPermissions {
        let Some(p) = principal else {
            return HeldPermissions::empty();
        };
        let Some(role) = p.role() else {
            return self.inner.extract(principal);
        };
        let stamp = RoleStamp {
            role: role.name().to_string(),
            revision: role.revision(),
        };

        if let Ok(cache) = self.cache.read() {
            if let Some(entry) = cache.get(p.id()) {
                if entry.stamp == stamp {
                    return entry.held.clone();
                }
            }
        }

        let held = self.inner.extract(principal);
        if let Ok(mut cache) = self.cache.write() {
            if cache.len() >= self.capacity && !cache.contains_key(p.id()) {
                debug!(capacity = self.capacity, "Permission cache full, clearing");
                cache.clear();
            }
            cache.insert(
                p.id().to_string(),
                CacheEntry {
                    stamp,
                    held: held.clone(),
                },
            );
        }
        held
    }
}
