pub mod types;
pub use types::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// File name of the Move package manifest
pub const MANIFEST_FILE: &str = "Move.toml";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl ManifestError {
    /// True when the manifest file simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, ManifestError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// A parsed `Move.toml`.
///
/// Only `[dependencies]` is decoded strictly, and every dependency entry
/// accepts any value. `[package]`, `[dev-dependencies]` and `[addresses]`
/// are kept as raw TOML; other tables are ignored. A manifest is only
/// rejected when it is not valid TOML or `dependencies` is not a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MoveManifest {
    /// Raw `[package]` table, see [`MoveManifest::package`]
    #[serde(default)]
    pub package: Option<toml::Value>,

    /// Production dependencies, keyed by package name
    #[serde(default)]
    pub dependencies: BTreeMap<String, DependencySpec>,

    #[serde(default, rename = "dev-dependencies")]
    pub dev_dependencies: Option<toml::Value>,

    #[serde(default)]
    pub addresses: Option<toml::Value>,
}

impl MoveManifest {
    /// Parse a manifest from its TOML source
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Read and parse the manifest at `path`
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&content).map_err(|source| ManifestError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Read `Move.toml` from a package root
    pub fn from_dir(dir: &Path) -> Result<Self, ManifestError> {
        Self::from_file(&dir.join(MANIFEST_FILE))
    }

    /// `[package]` metadata, if present and well-formed
    pub fn package(&self) -> Option<PackageMetadata> {
        self.package.clone()?.try_into().ok()
    }

    /// A named address from `[addresses]`
    pub fn address(&self, name: &str) -> Option<&str> {
        self.addresses.as_ref()?.get(name)?.as_str()
    }

    /// Look up a production dependency by its exact name
    pub fn dependency(&self, name: &str) -> Option<&DependencySpec> {
        self.dependencies.get(name)
    }

    pub fn has_dependency(&self, name: &str) -> bool {
        self.dependencies.contains_key(name)
    }
}
