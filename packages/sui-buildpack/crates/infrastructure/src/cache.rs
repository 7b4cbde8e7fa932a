use anyhow::{Context, Result};
use domain::entities::BuildpackDependency;
use domain::error::BuildpackError;
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use url::Url;

/// Downloads buildpack dependencies into a cache directory, keyed by
/// checksum (or id/version when no checksum is declared).
pub struct DependencyCache {
    root: PathBuf,
}

impl DependencyCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory a dependency's artifact is stored under
    pub fn entry_dir(&self, dependency: &BuildpackDependency) -> PathBuf {
        match &dependency.sha256 {
            Some(sha) => self.root.join(sha.to_lowercase()),
            None => self
                .root
                .join(format!("{}-{}", dependency.id, dependency.version)),
        }
    }

    /// Return a local path to the dependency's artifact, downloading it
    /// if it is not already cached
    pub fn artifact(&self, dependency: &BuildpackDependency) -> Result<PathBuf> {
        let dir = self.entry_dir(dependency);
        let path = dir.join(dependency.file_name());

        if path.is_file() && verify(&path, dependency).is_ok() {
            tracing::info!("Reusing cached download {}", path.display());
            return Ok(path);
        }

        fs::create_dir_all(&dir).with_context(|| format!("unable to create {}", dir.display()))?;

        tracing::info!(
            "Downloading {} {} from {}",
            dependency.display_name(),
            dependency.version,
            dependency.uri
        );
        let partial = dir.join(format!("{}.partial", dependency.file_name()));
        download(&dependency.uri, &partial)?;

        verify(&partial, dependency)?;
        fs::rename(&partial, &path)
            .with_context(|| format!("unable to move {}", partial.display()))?;

        Ok(path)
    }
}

fn download(uri: &str, destination: &Path) -> Result<()> {
    let url = Url::parse(uri).map_err(|e| BuildpackError::parse(format!("uri '{}'", uri), e))?;
    if !matches!(url.scheme(), "file" | "http" | "https") {
        return Err(BuildpackError::parse(
            format!("uri '{}'", uri),
            format!("unsupported scheme '{}'", url.scheme()),
        )
        .into());
    }

    let mut out = File::create(destination)
        .with_context(|| format!("unable to create {}", destination.display()))?;

    if url.scheme() == "file" {
        let source = url
            .to_file_path()
            .map_err(|_| BuildpackError::parse(format!("uri '{}'", uri), "not a local file path"))?;
        let mut input =
            File::open(&source).with_context(|| format!("unable to open {}", source.display()))?;
        io::copy(&mut input, &mut out).with_context(|| format!("unable to copy {}", uri))?;
    } else {
        let mut response = reqwest::blocking::get(url)
            .and_then(|r| r.error_for_status())
            .map_err(|e| BuildpackError::Network(format!("unable to download {}: {}", uri, e)))?;
        response
            .copy_to(&mut out)
            .map_err(|e| BuildpackError::Network(format!("unable to download {}: {}", uri, e)))?;
    }

    out.flush()
        .with_context(|| format!("unable to write {}", destination.display()))
}

/// Check the artifact against the declared SHA-256, if any
fn verify(path: &Path, dependency: &BuildpackDependency) -> Result<()> {
    let Some(expected) = &dependency.sha256 else {
        tracing::warn!(
            "No checksum declared for {} {}, skipping verification",
            dependency.display_name(),
            dependency.version
        );
        return Ok(());
    };

    let actual = sha256_file(path)?;
    if !actual.eq_ignore_ascii_case(expected) {
        return Err(BuildpackError::Verification {
            what: format!("checksum of {}", path.display()),
            expected: expected.clone(),
            actual,
        }
        .into());
    }
    Ok(())
}

pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("unable to open {}", path.display()))?;

    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).with_context(|| format!("unable to read {}", path.display()))?;

    Ok(hex::encode(hasher.finalize()))
}
