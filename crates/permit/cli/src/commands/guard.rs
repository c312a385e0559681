//! `permit guard`: enforce the configured guard of an operation

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::Args;
use permit_engine::{PermissionGate, PermitConfig, SubjectBag};

use super::{exit_code, fixture_service};

#[derive(Args)]
pub struct GuardArgs {
    /// Fixture describing roles, principals and resources
    #[arg(short, long)]
    pub fixture: PathBuf,

    /// Principal id to act as
    #[arg(short = 'u', long)]
    pub principal: String,

    /// Operation name as configured under [guards]
    #[arg(short, long)]
    pub operation: String,

    /// Subject resource as kind:id, bound under its kind (repeatable)
    #[arg(short, long = "subject")]
    pub subjects: Vec<String>,
}

pub fn run(args: GuardArgs, config: &PermitConfig) -> Result<ExitCode> {
    let Some(operation) = config.guarded_operation(&args.operation)? else {
        bail!("operation '{}' has no configured guard", args.operation);
    };

    let (fixture, service) = fixture_service(&args.fixture, &args.principal, config)?;

    let mut bag = SubjectBag::new();
    for reference in &args.subjects {
        let (kind, subject) = fixture.subject(reference)?;
        bag.insert(kind, subject);
    }

    let gate = PermissionGate::from_config(service, config);
    match gate.enforce(&operation, &bag) {
        Ok(()) => {
            println!("GRANTED");
            Ok(exit_code(true))
        }
        Err(err) => {
            println!("DENIED: {}", err);
            tracing::debug!(reason = %err.reason(), "Guard refused operation");
            Ok(exit_code(false))
        }
    }
}
