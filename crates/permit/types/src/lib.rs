//! # Permit Types
//!
//! Value objects shared by the permit decision engine:
//!
//! - [`PermissionCode`]: a validated, case-sensitive permission code
//! - [`Mode`]: ANY / ALL combination of multiple required codes
//! - [`RequiredPermissions`]: a non-empty list of codes plus a mode
//! - [`Subject`]: an opaque handle on the object being acted upon
//! - [`PrincipalRecord`], [`RoleRecord`], [`PermissionRecord`]: what the engine
//!   reads from an identity subsystem, with plain snapshot implementations
//!
//! Construction is where validation happens. A [`RequiredPermissions`] value
//! that exists is always well formed.

#![deny(unsafe_code)]

pub mod code;
pub mod error;
pub mod mode;
pub mod record;
pub mod required;
pub mod subject;

pub use code::PermissionCode;
pub use error::{Result, ValidationError};
pub use mode::Mode;
pub use record::{Permission, PermissionRecord, Principal, PrincipalRecord, Role, RoleRecord};
pub use required::RequiredPermissions;
pub use subject::Subject;
