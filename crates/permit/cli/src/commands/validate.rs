//! `permit validate`: parse guards and list them

use std::process::ExitCode;

use anyhow::Result;
use permit_engine::PermitConfig;

pub fn run(config: &PermitConfig) -> Result<ExitCode> {
    let operations = config.guarded_operations()?;

    println!("Denial message: {}", config.denial_message);
    println!("Cache enabled:  {}", config.enable_cache);
    println!("Guarded operations: {}", operations.len());

    for operation in &operations {
        println!();
        println!("{}", operation.name());
        for declaration in operation.declarations() {
            let required = declaration.required();
            let subject = declaration
                .subject_param()
                .map(|p| format!(" on {}", p))
                .unwrap_or_default();
            println!(
                "  - {} [{}]{}",
                required.code_strs().join(", "),
                required.mode(),
                subject
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
