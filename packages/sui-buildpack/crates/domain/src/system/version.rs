use semver::Version;
use std::fmt;

use crate::error::{BuildpackError, Result};

/// Toolchain version as reported by `sui --version`.
///
/// Expected output: `sui <major>.<minor>.<patch>[-<commit>]`, for example
/// `sui 1.22.0-0362997459`. The commit suffix is not valid semver (leading
/// zeros), so it is split off and kept separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolVersion {
    pub version: Version,
    pub commit: Option<String>,
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)?;
        if let Some(commit) = &self.commit {
            write!(f, "-{}", commit)?;
        }
        Ok(())
    }
}

impl ToolVersion {
    /// Parse `--version` output. The first whitespace-delimited token
    /// (optionally prefixed with `v`) whose numeric core is semver wins.
    pub fn parse(output: &str) -> Result<Self> {
        for word in output.split_whitespace() {
            let clean = word.trim_start_matches('v').trim_matches(',');

            let (core, commit) = match clean.split_once(|c: char| c == '-' || c == '+') {
                Some((core, rest)) if !rest.is_empty() => (core, Some(rest.to_string())),
                _ => (clean, None),
            };

            if let Ok(version) = Version::parse(core) {
                return Ok(Self { version, commit });
            }

            // Only major.minor, add .0
            if core.matches('.').count() == 1 {
                if let Ok(version) = Version::parse(&format!("{}.0", core)) {
                    return Ok(Self { version, commit });
                }
            }
        }

        Err(BuildpackError::parse(
            "version output",
            format!("no version found in '{}'", output.trim()),
        ))
    }
}
