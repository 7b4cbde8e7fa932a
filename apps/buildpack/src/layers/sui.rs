use std::path::{Path, PathBuf};

use libcnb::build::BuildContext;
use libcnb::data::layer_content_metadata::LayerTypes;
use libcnb::layer::{ExistingLayerStrategy, Layer, LayerData, LayerResult, LayerResultBuilder};
use anyhow::Context;
use serde::{Deserialize, Serialize};

use sui_buildpack::application::Provisioner;
use sui_buildpack::domain::config::DeployConfig;
use sui_buildpack::domain::entities::{BuildpackDependency, ToolchainLayout};
use sui_buildpack::domain::system::Architecture;
use sui_buildpack::infrastructure::{DependencyCache, SystemCommandRunner};

use crate::platform::layer_env;
use crate::SuiBuildpack;

/// Identifies the toolchain installed in the layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiLayerMetadata {
    pub version: String,
    pub uri: String,
    #[serde(default)]
    pub sha256: Option<String>,
}

impl From<&BuildpackDependency> for SuiLayerMetadata {
    fn from(dependency: &BuildpackDependency) -> Self {
        Self {
            version: dependency.version.to_string(),
            uri: dependency.uri.clone(),
            sha256: dependency.sha256.clone(),
        }
    }
}

/// Holds the `sui` binary, `MOVE_HOME` and `SUI_CONFIG_DIR`.
///
/// Release archives are fetched through a [`DependencyCache`] rooted in
/// the cache-only downloads layer.
pub struct SuiLayer {
    dependency: BuildpackDependency,
    arch: Architecture,
    downloads: PathBuf,
}

impl SuiLayer {
    pub fn new(dependency: BuildpackDependency, arch: Architecture, downloads: PathBuf) -> Self {
        Self {
            dependency,
            arch,
            downloads,
        }
    }

    fn metadata(&self) -> SuiLayerMetadata {
        SuiLayerMetadata::from(&self.dependency)
    }
}

impl Layer for SuiLayer {
    type Buildpack = SuiBuildpack;
    type Metadata = SuiLayerMetadata;

    fn types(&self) -> LayerTypes {
        LayerTypes {
            build: true,
            launch: true,
            cache: true,
        }
    }

    fn create(
        &self,
        _context: &BuildContext<Self::Buildpack>,
        layer_path: &Path,
    ) -> Result<LayerResult<Self::Metadata>, anyhow::Error> {
        tracing::info!(
            "Contributing {} {}",
            self.dependency.display_name(),
            self.dependency.version
        );

        let archive = DependencyCache::new(&self.downloads)
            .artifact(&self.dependency)
            .with_context(|| format!("unable to download {}", self.dependency.uri))?;

        let runner = SystemCommandRunner::new();
        let config = DeployConfig::default();
        let layout = ToolchainLayout::new(layer_path);
        Provisioner::new(&runner, &config).install(&archive, &layout, self.arch)?;

        LayerResultBuilder::new(self.metadata())
            .env(layer_env(&layout.launch_environment()))
            .build()
    }

    fn existing_layer_strategy(
        &self,
        _context: &BuildContext<Self::Buildpack>,
        layer_data: &LayerData<Self::Metadata>,
    ) -> Result<ExistingLayerStrategy, anyhow::Error> {
        if layer_data.content_metadata.metadata == self.metadata() {
            tracing::info!(
                "Reusing cached {} {}",
                self.dependency.display_name(),
                self.dependency.version
            );
            Ok(ExistingLayerStrategy::Keep)
        } else {
            Ok(ExistingLayerStrategy::Recreate)
        }
    }
}
