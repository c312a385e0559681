//! `permit check`: evaluate required permissions for one principal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use permit_engine::{Decision, PermitConfig};
use permit_types::RequiredPermissions;

use super::{exit_code, fixture_service};

#[derive(Args)]
pub struct CheckArgs {
    /// Fixture describing roles, principals and resources
    #[arg(short, long)]
    pub fixture: PathBuf,

    /// Principal id to act as
    #[arg(short = 'u', long)]
    pub principal: String,

    /// Required permission code (repeatable)
    #[arg(short, long = "permission", required = true)]
    pub permissions: Vec<String>,

    /// Combination mode: any or all
    #[arg(short, long, default_value = "any")]
    pub mode: String,

    /// Subject resource as kind:id
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Print the full decision card as JSON
    #[arg(long)]
    pub card: bool,
}

pub fn run(args: CheckArgs, config: &PermitConfig) -> Result<ExitCode> {
    let required = RequiredPermissions::parse(&args.permissions, &args.mode)?;
    let (fixture, service) = fixture_service(&args.fixture, &args.principal, config)?;

    let subject = match args.subject.as_deref() {
        Some(reference) => Some(fixture.subject(reference)?.1),
        None => None,
    };

    let card = service.decide_with_card(&required, subject.as_ref());
    let granted = card.was_granted();

    if args.card {
        println!("{}", serde_json::to_string_pretty(&card)?);
    } else {
        match &card.decision {
            Decision::Granted => println!("GRANTED"),
            Decision::Denied(reason) => println!("DENIED: {}", reason),
        }
    }

    Ok(exit_code(granted))
}
