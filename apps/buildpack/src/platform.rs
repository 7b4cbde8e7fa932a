//! Conversions between the buildpack's own types and the lifecycle's.

use std::ffi::{OsStr, OsString};

use libcnb::data::build_plan::{BuildPlan as LifecyclePlan, BuildPlanBuilder};
use libcnb::data::launch::{Launch, LaunchBuilder, ProcessBuilder, ProcessType};
use libcnb::layer_env::{LayerEnv, ModificationBehavior, Scope};
use libcnb::Env;

use sui_buildpack::domain::config::ConfigurationResolver;
use sui_buildpack::domain::entities::{
    BuildPlan, BuildpackMetadata, EnvBehavior, LaunchEnvironment, ProcessDescriptor,
};
use sui_buildpack::domain::error::BuildpackError;

/// Resolver over `buildpack.toml` defaults, the build process environment
/// and the platform environment, later sources winning.
pub fn configuration_resolver(metadata: &BuildpackMetadata, platform: &Env) -> ConfigurationResolver {
    ConfigurationResolver::new(
        metadata.configurations.clone(),
        merge_env(std::env::vars_os(), platform),
    )
}

pub fn merge_env(
    process: impl IntoIterator<Item = (OsString, OsString)>,
    platform: &Env,
) -> Vec<(String, String)> {
    let lossy = |k: &OsStr, v: &OsStr| {
        (
            k.to_string_lossy().into_owned(),
            v.to_string_lossy().into_owned(),
        )
    };

    process
        .into_iter()
        .map(|(k, v)| lossy(&k, &v))
        .chain(platform.iter().map(|(k, v)| lossy(k, v)))
        .collect()
}

pub fn build_plan(plan: &BuildPlan) -> LifecyclePlan {
    let mut builder = BuildPlanBuilder::new();
    for name in &plan.provides {
        builder = builder.provides(name.as_str());
    }
    for name in &plan.requires {
        builder = builder.requires(name.as_str());
    }
    builder.build()
}

/// Launch-scoped layer variables
pub fn layer_env(launch: &LaunchEnvironment) -> LayerEnv {
    launch
        .modifications
        .iter()
        .fold(LayerEnv::new(), |env, m| match &m.behavior {
            EnvBehavior::Append { delimiter } => env
                .chainable_insert(Scope::Launch, ModificationBehavior::Append, &m.name, &m.value)
                .chainable_insert(
                    Scope::Launch,
                    ModificationBehavior::Delimiter,
                    &m.name,
                    delimiter,
                ),
            EnvBehavior::Default => {
                env.chainable_insert(Scope::Launch, ModificationBehavior::Default, &m.name, &m.value)
            }
        })
}

pub fn launch(processes: &[ProcessDescriptor]) -> anyhow::Result<Launch> {
    let mut launch = LaunchBuilder::new();
    for descriptor in processes {
        let process_type = descriptor
            .r#type
            .parse::<ProcessType>()
            .map_err(|e| BuildpackError::parse(format!("process type '{}'", descriptor.r#type), e))?;

        launch.process(
            ProcessBuilder::new(process_type, [descriptor.command.as_str()])
                .args(descriptor.args.iter().map(String::as_str))
                .default(descriptor.default)
                .build(),
        );
    }
    Ok(launch.build())
}
