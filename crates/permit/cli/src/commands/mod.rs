pub mod check;
pub mod guard;
pub mod validate;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use permit_engine::{DecisionEngine, MockPrincipalResolver, PermissionService, PermitConfig};

use crate::fixture::Fixture;

/// Exit code reported when access is denied
pub const DENIED_EXIT: u8 = 1;

pub fn exit_code(granted: bool) -> ExitCode {
    if granted {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(DENIED_EXIT)
    }
}

/// Build a service acting as `principal_id` from the fixture.
///
/// An id missing from the fixture acts as an anonymous caller.
pub fn fixture_service(
    fixture_path: &Path,
    principal_id: &str,
    config: &PermitConfig,
) -> Result<(Fixture, PermissionService)> {
    let fixture = Fixture::load(fixture_path)?;
    let resolver = match fixture.principal(principal_id) {
        Some(principal) => MockPrincipalResolver::with_principal(principal),
        None => {
            tracing::warn!(
                principal = %principal_id,
                "Principal not in fixture, evaluating anonymously"
            );
            MockPrincipalResolver::anonymous()
        }
    };

    let engine = DecisionEngine::from_config(config, fixture.checkers());
    let service = PermissionService::new(Arc::new(engine), Arc::new(resolver));
    Ok((fixture, service))
}
