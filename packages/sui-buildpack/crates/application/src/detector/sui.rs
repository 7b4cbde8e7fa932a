use anyhow::{Context, Result};
use domain::entities::{BuildPlan, Detection, NotMatchedReason};
use domain::error::BuildpackError;
use move_manifest::{ManifestError, MoveManifest};
use std::path::Path;
use walkdir::WalkDir;

use super::ProjectDetector;

/// Dependency a Sui package must declare in `Move.toml`
pub const SUI_DEPENDENCY: &str = "Sui";

/// Extension of Move source files
pub const MOVE_EXTENSION: &str = "move";

/// Detects Move packages built against the Sui framework
#[derive(Debug, Default)]
pub struct SuiDetector;

impl ProjectDetector for SuiDetector {
    fn detect(&self, app_dir: &Path) -> Result<Detection> {
        self.detect_project(app_dir)
            .context("unable to detect Sui requirements")
    }
}

impl SuiDetector {
    fn detect_project(&self, app_dir: &Path) -> Result<Detection> {
        // 1. Manifest
        let manifest = match MoveManifest::from_dir(app_dir) {
            Ok(manifest) => manifest,
            Err(e) if e.is_not_found() => {
                return Ok(Detection::NotMatched(NotMatchedReason::MissingManifest))
            }
            Err(ManifestError::Io { path, source }) => {
                return Err(BuildpackError::io(format!("unable to read {}", path), source).into())
            }
            Err(ManifestError::Parse { path, source }) => {
                return Err(BuildpackError::parse(path, source).into())
            }
        };

        // 2. Sui dependency
        let Some(sui) = manifest.dependency(SUI_DEPENDENCY) else {
            return Ok(Detection::NotMatched(
                NotMatchedReason::MissingSuiDependency,
            ));
        };
        tracing::debug!("Found {} dependency at {}", SUI_DEPENDENCY, sui.source());

        // 3. Move sources
        if !has_files_with_extension(app_dir, MOVE_EXTENSION)? {
            return Ok(Detection::NotMatched(NotMatchedReason::NoMoveSources));
        }

        Ok(Detection::Matched(BuildPlan::sui()))
    }
}

/// True if any regular file below `dir` has the given extension
pub fn has_files_with_extension(dir: &Path, extension: &str) -> Result<bool> {
    for entry in WalkDir::new(dir) {
        let entry = entry.map_err(|e| {
            BuildpackError::io(format!("unable to walk {}", dir.display()), e.into())
        })?;

        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == extension)
        {
            return Ok(true);
        }
    }
    Ok(false)
}
