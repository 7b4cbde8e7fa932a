use std::path::Path;

use libcnb::build::BuildContext;
use libcnb::data::layer_content_metadata::LayerTypes;
use libcnb::layer::{ExistingLayerStrategy, Layer, LayerData, LayerResult, LayerResultBuilder};
use serde::{Deserialize, Serialize};

use crate::SuiBuildpack;

/// Bumped when the on-disk layout of the download cache changes
const CACHE_LAYOUT: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadsLayerMetadata {
    pub layout: u32,
}

/// Cache-only layer holding downloaded release archives between builds.
/// Never exported to the build or launch image.
#[derive(Debug, Default)]
pub struct DownloadsLayer;

impl DownloadsLayer {
    fn metadata(&self) -> DownloadsLayerMetadata {
        DownloadsLayerMetadata {
            layout: CACHE_LAYOUT,
        }
    }
}

impl Layer for DownloadsLayer {
    type Buildpack = SuiBuildpack;
    type Metadata = DownloadsLayerMetadata;

    fn types(&self) -> LayerTypes {
        LayerTypes {
            build: false,
            launch: false,
            cache: true,
        }
    }

    fn create(
        &self,
        _context: &BuildContext<Self::Buildpack>,
        _layer_path: &Path,
    ) -> Result<LayerResult<Self::Metadata>, anyhow::Error> {
        LayerResultBuilder::new(self.metadata()).build()
    }

    fn existing_layer_strategy(
        &self,
        _context: &BuildContext<Self::Buildpack>,
        layer_data: &LayerData<Self::Metadata>,
    ) -> Result<ExistingLayerStrategy, anyhow::Error> {
        if layer_data.content_metadata.metadata == self.metadata() {
            Ok(ExistingLayerStrategy::Keep)
        } else {
            Ok(ExistingLayerStrategy::Recreate)
        }
    }
}
