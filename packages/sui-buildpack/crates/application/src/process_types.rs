use domain::config::DeployConfig;
use domain::entities::{ProcessDescriptor, PLAN_ENTRY_SUI, TOOL_SUI};
use domain::error::Result;

/// Launch processes to register.
///
/// Nothing is registered unless deployment is enabled, in which case a
/// private key is mandatory and the default process publishes the package.
/// An unset gas budget is passed through as an empty argument.
pub fn build_process_types(config: &DeployConfig) -> Result<Vec<ProcessDescriptor>> {
    let mut processes = Vec::new();

    if config.enabled {
        config.require_private_key()?;

        processes.push(ProcessDescriptor {
            r#type: PLAN_ENTRY_SUI.to_string(),
            command: TOOL_SUI.to_string(),
            args: vec![
                "client".to_string(),
                "publish".to_string(),
                "--skip-fetch-latest-git-deps".to_string(),
                "--gas-budget".to_string(),
                config.gas_budget.clone(),
            ],
            default: true,
        });
    }

    Ok(processes)
}
