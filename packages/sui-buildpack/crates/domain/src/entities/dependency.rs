use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

use crate::config::BuildpackConfiguration;
use crate::error::{BuildpackError, Result};
use crate::system::platform::Architecture;

/// The `[metadata]` table of `buildpack.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildpackMetadata {
    #[serde(default)]
    pub configurations: Vec<BuildpackConfiguration>,

    #[serde(default)]
    pub dependencies: Vec<BuildpackDependency>,
}

/// A downloadable artifact declared in `[[metadata.dependencies]]`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuildpackDependency {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    pub version: Version,

    pub uri: String,

    /// Hex-encoded SHA-256 of the artifact
    #[serde(default)]
    pub sha256: Option<String>,

    /// Restricts the artifact to one CPU architecture
    #[serde(default)]
    pub arch: Option<Architecture>,
}

impl BuildpackDependency {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Artifact file name, taken from the last URI path segment
    pub fn file_name(&self) -> String {
        self.uri
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}-{}", self.id, self.version))
    }
}

/// Picks a dependency out of the buildpack metadata
pub struct DependencyResolver<'a> {
    dependencies: &'a [BuildpackDependency],
    arch: Architecture,
}

impl<'a> DependencyResolver<'a> {
    pub fn new(dependencies: &'a [BuildpackDependency], arch: Architecture) -> Self {
        Self { dependencies, arch }
    }

    /// Highest version of `id` that matches `version` (a semver requirement,
    /// empty meaning any) and the current architecture
    pub fn resolve(&self, id: &str, version: &str) -> Result<&'a BuildpackDependency> {
        let requirement = if version.trim().is_empty() {
            VersionReq::STAR
        } else {
            VersionReq::parse(version.trim())
                .map_err(|e| BuildpackError::parse(format!("version requirement '{}'", version), e))?
        };

        self.dependencies
            .iter()
            .filter(|d| d.id == id)
            .filter(|d| requirement.matches(&d.version))
            .filter(|d| d.arch.map_or(true, |arch| arch == self.arch))
            .max_by(|a, b| a.version.cmp(&b.version))
            .ok_or_else(|| {
                BuildpackError::NotFound(format!(
                    "dependency '{}' matching '{}' for {}",
                    id, requirement, self.arch
                ))
            })
    }
}
