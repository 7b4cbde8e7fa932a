mod layers;
mod logging;
mod platform;

use libcnb::build::{BuildContext, BuildResult, BuildResultBuilder};
use libcnb::data::layer_name;
use libcnb::detect::{DetectContext, DetectResult, DetectResultBuilder};
use libcnb::generic::GenericPlatform;
use libcnb::{buildpack_main, Buildpack, Platform};

use sui_buildpack::application::{ProjectDetector, Provisioner, SuiDetector};
use sui_buildpack::domain::config::{DeployConfig, BP_SUI_VERSION};
use sui_buildpack::domain::entities::{
    BuildpackMetadata, Detection, DependencyResolver, ToolchainLayout, ENV_PATH, TOOL_SUI,
};
use sui_buildpack::domain::system::PlatformDetector;
use sui_buildpack::infrastructure::SystemCommandRunner;

use crate::layers::{DownloadsLayer, SuiLayer};

pub struct SuiBuildpack;

impl Buildpack for SuiBuildpack {
    type Platform = GenericPlatform;
    type Metadata = BuildpackMetadata;
    type Error = anyhow::Error;

    fn detect(&self, context: DetectContext<Self>) -> libcnb::Result<DetectResult, Self::Error> {
        logging::init();

        match SuiDetector
            .detect(&context.app_dir)
            .map_err(libcnb::Error::BuildpackError)?
        {
            Detection::Matched(plan) => DetectResultBuilder::pass()
                .build_plan(platform::build_plan(&plan))
                .build(),
            Detection::NotMatched(reason) => {
                tracing::info!("SKIPPED: {}", reason);
                DetectResultBuilder::fail().build()
            }
        }
    }

    fn build(&self, context: BuildContext<Self>) -> libcnb::Result<BuildResult, Self::Error> {
        logging::init();
        logging::header(&context.buildpack_descriptor.buildpack);

        let metadata = &context.buildpack_descriptor.metadata;
        let resolver = platform::configuration_resolver(metadata, context.platform.env());
        logging::configuration(&resolver.describe());
        let config = DeployConfig::from_resolver(&resolver);

        let arch = PlatformDetector::architecture();
        let dependency = DependencyResolver::new(&metadata.dependencies, arch)
            .resolve(TOOL_SUI, &resolver.resolve_or_empty(BP_SUI_VERSION))
            .map_err(|e| libcnb::Error::BuildpackError(e.into()))?
            .clone();

        let downloads = context.handle_layer(layer_name!("downloads"), DownloadsLayer)?;
        let layer = context.handle_layer(
            layer_name!("sui"),
            SuiLayer::new(dependency, arch, downloads.path),
        )?;

        let runner = SystemCommandRunner::new();
        let provisioner = Provisioner::new(&runner, &config);
        let contribution = provisioner
            .contribute(
                &ToolchainLayout::new(layer.path.clone()),
                &context.app_dir,
                std::env::var_os(ENV_PATH),
            )
            .map_err(libcnb::Error::BuildpackError)?;
        if let Some(wallet) = &contribution.wallet {
            tracing::info!("Deploy wallet {} ({})", wallet.address, wallet.key_scheme);
        }

        let processes = provisioner
            .process_types()
            .map_err(libcnb::Error::BuildpackError)?;
        let launch = platform::launch(&processes).map_err(libcnb::Error::BuildpackError)?;

        BuildResultBuilder::new().launch(launch).build()
    }

    fn on_error(&self, error: libcnb::Error<Self::Error>) {
        logging::error(&error);
    }
}

buildpack_main!(SuiBuildpack);
