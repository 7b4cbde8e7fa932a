use serde::{Deserialize, Serialize};

/// The `[package]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackageMetadata {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub version: Option<String>,

    /// Move language edition (e.g. `2024.beta`)
    #[serde(default)]
    pub edition: Option<String>,

    /// On-chain address of an already published package
    #[serde(default, rename = "published-at")]
    pub published_at: Option<String>,
}
