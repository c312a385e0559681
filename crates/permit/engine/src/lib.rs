//! # Permit Engine
//!
//! Permission evaluation for role-based access with object-level checks.
//!
//! ## Overview
//!
//! A principal holds permission codes through its role. An operation requires
//! one or more codes, combined with ANY (at least one) or ALL (every one).
//! When a subject is supplied, held codes are additionally confirmed by the
//! first registered [`ContextualChecker`] that supports the pair; codes no
//! checker supports pass on base possession alone.
//!
//! Everything that cannot be resolved (no principal, no role, no subject)
//! denies. Only malformed declarations are errors.
//!
//! ## Key Components
//!
//! - [`PermissionExtractor`]: principal to held codes, with an optional cache
//! - [`ContextualChecker`] / [`CheckerRegistry`]: first-match row-level checks
//! - [`DecisionEngine`]: the ANY/ALL combinator
//! - [`PermissionService`]: `can` for the current principal
//! - [`PermissionGate`]: enforces [`GuardedOperation`]s, raising [`GateError`]
//! - [`PermitConfig`]: denial message, cache switch, declarative guards
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use permit_engine::{
//!     CheckerRegistry, DecisionEngine, FnChecker, MockPrincipalResolver, PermissionService,
//! };
//! use permit_types::{Principal, RequiredPermissions, Role, Subject};
//!
//! struct Article {
//!     author: String,
//! }
//!
//! let checkers = CheckerRegistry::new().register(Arc::new(FnChecker::for_type::<Article, _>(
//!     "article-author",
//!     "article_edit",
//!     |principal, article| principal.id() == article.author,
//! )));
//!
//! let alice = Principal::new("alice")
//!     .with_role(Role::new("editor").with_permissions(["article_edit"]));
//! let service = PermissionService::new(
//!     Arc::new(DecisionEngine::new(checkers)),
//!     Arc::new(MockPrincipalResolver::with_principal(alice)),
//! );
//!
//! let edit = RequiredPermissions::one("article_edit").unwrap();
//! let own = Subject::new(Article { author: "alice".into() });
//! let theirs = Subject::new(Article { author: "bob".into() });
//!
//! assert!(service.can(&edit, None));
//! assert!(service.can(&edit, Some(&own)));
//! assert!(!service.can(&edit, Some(&theirs)));
//! ```

#![deny(unsafe_code)]

pub mod checker;
pub mod config;
pub mod decision;
pub mod declaration;
pub mod engine;
pub mod error;
pub mod extractor;
pub mod gate;
pub mod mocks;
pub mod service;
pub mod subject;

pub use checker::{CheckerRegistry, ContextualChecker, ContextualOutcome, FnChecker};
pub use config::{DeclarationSpec, OneOrMany, PermitConfig, DEFAULT_DENIAL_MESSAGE};
pub use decision::{Decision, DecisionCard, DenialReason};
pub use declaration::{GuardedOperation, PermissionDeclaration};
pub use engine::DecisionEngine;
pub use error::{EngineError, GateError, Result};
pub use extractor::{
    CachingExtractor, HeldPermissions, PermissionExtractor, RolePermissionExtractor,
    DEFAULT_CACHE_CAPACITY,
};
pub use gate::PermissionGate;
pub use mocks::{CountingChecker, MockPrincipalResolver, StaticChecker};
pub use service::{PermissionService, PrincipalResolver};
pub use subject::{NoSubjects, SubjectBag, SubjectResolver};
