use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{BuildpackError, Result};

pub const BP_ENABLE_SUI_DEPLOY: &str = "BP_ENABLE_SUI_DEPLOY";
pub const BP_SUI_DEPLOY_PRIVATE_KEY: &str = "BP_SUI_DEPLOY_PRIVATE_KEY";
pub const BP_SUI_DEPLOY_KEY_SCHEME: &str = "BP_SUI_DEPLOY_KEY_SCHEME";
pub const BP_SUI_DEPLOY_NETWORK: &str = "BP_SUI_DEPLOY_NETWORK";
pub const BP_SUI_DEPLOY_GAS: &str = "BP_SUI_DEPLOY_GAS";
pub const BP_SUI_VERSION: &str = "BP_SUI_VERSION";

/// Every option this buildpack reads, in display order
pub const CONFIGURATION_KEYS: [&str; 6] = [
    BP_SUI_VERSION,
    BP_ENABLE_SUI_DEPLOY,
    BP_SUI_DEPLOY_PRIVATE_KEY,
    BP_SUI_DEPLOY_KEY_SCHEME,
    BP_SUI_DEPLOY_NETWORK,
    BP_SUI_DEPLOY_GAS,
];

/// A `[[metadata.configurations]]` entry from `buildpack.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BuildpackConfiguration {
    pub name: String,

    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Read at build time
    #[serde(default)]
    pub build: bool,

    /// Read at launch time
    #[serde(default)]
    pub launch: bool,
}

/// Where a resolved configuration value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Environment,
    Default,
    Unset,
}

/// Resolves configuration values: the platform environment wins over
/// `buildpack.toml` defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationResolver {
    configurations: Vec<BuildpackConfiguration>,
    env: BTreeMap<String, String>,
}

impl ConfigurationResolver {
    pub fn new(
        configurations: Vec<BuildpackConfiguration>,
        env: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        Self {
            configurations,
            env: env.into_iter().collect(),
        }
    }

    /// Resolve a value and report where it came from
    pub fn lookup(&self, name: &str) -> (Option<String>, ValueSource) {
        if let Some(value) = self.env.get(name) {
            return (Some(value.clone()), ValueSource::Environment);
        }

        match self
            .configurations
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.default.clone())
        {
            Some(default) => (Some(default), ValueSource::Default),
            None => (None, ValueSource::Unset),
        }
    }

    pub fn resolve(&self, name: &str) -> Option<String> {
        self.lookup(name).0
    }

    /// Resolve a value, treating unset as the empty string
    pub fn resolve_or_empty(&self, name: &str) -> String {
        self.resolve(name).unwrap_or_default()
    }

    /// Resolve a boolean. Unparseable values are logged and treated as `false`.
    pub fn resolve_bool(&self, name: &str) -> bool {
        let Some(value) = self.resolve(name) else {
            return false;
        };

        match parse_bool(&value) {
            Some(b) => b,
            None => {
                tracing::warn!("invalid value '{}' for key '{}', expected a boolean", value, name);
                false
            }
        }
    }

    /// Rows for the configuration table printed at the start of a build.
    /// Values of secret options are masked.
    pub fn describe(&self) -> Vec<ConfigurationRow> {
        let mut names: Vec<&str> = self.configurations.iter().map(|c| c.name.as_str()).collect();
        for key in CONFIGURATION_KEYS {
            if !names.contains(&key) {
                names.push(key);
            }
        }

        names
            .into_iter()
            .map(|name| {
                let (value, source) = self.lookup(name);
                let value = value.unwrap_or_default();
                let value = if is_secret(name) && !value.is_empty() {
                    Secret::new(value).to_string()
                } else {
                    value
                };

                ConfigurationRow {
                    name: name.to_string(),
                    value,
                    source,
                    description: self
                        .configurations
                        .iter()
                        .find(|c| c.name == name)
                        .and_then(|c| c.description.clone())
                        .unwrap_or_default(),
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationRow {
    pub name: String,
    pub value: String,
    pub source: ValueSource,
    pub description: String,
}

fn is_secret(name: &str) -> bool {
    name.contains("PRIVATE_KEY")
}

/// Boolean spellings accepted by Go's `strconv.ParseBool`, which the
/// `BP_*` conventions follow.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// A string that never prints its contents
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({})", self)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            Ok(())
        } else {
            write!(f, "********")
        }
    }
}

/// Deployment options, resolved once per build
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeployConfig {
    pub enabled: bool,
    pub private_key: Secret,
    pub key_scheme: String,
    pub network: String,
    pub gas_budget: String,
}

impl DeployConfig {
    pub fn from_resolver(resolver: &ConfigurationResolver) -> Self {
        Self {
            enabled: resolver.resolve_bool(BP_ENABLE_SUI_DEPLOY),
            private_key: Secret::new(resolver.resolve_or_empty(BP_SUI_DEPLOY_PRIVATE_KEY)),
            key_scheme: resolver.resolve_or_empty(BP_SUI_DEPLOY_KEY_SCHEME),
            network: resolver.resolve_or_empty(BP_SUI_DEPLOY_NETWORK),
            gas_budget: resolver.resolve_or_empty(BP_SUI_DEPLOY_GAS),
        }
    }

    /// Fails when deployment is enabled without a private key
    pub fn require_private_key(&self) -> Result<&Secret> {
        if self.private_key.is_empty() {
            return Err(BuildpackError::Configuration(format!(
                "{} must be specified",
                BP_SUI_DEPLOY_PRIVATE_KEY
            )));
        }
        Ok(&self.private_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn defaults() -> Vec<BuildpackConfiguration> {
        vec![
            BuildpackConfiguration {
                name: BP_ENABLE_SUI_DEPLOY.into(),
                default: Some("false".into()),
                build: true,
                ..Default::default()
            },
            BuildpackConfiguration {
                name: BP_SUI_DEPLOY_NETWORK.into(),
                default: Some("devnet".into()),
                build: true,
                ..Default::default()
            },
            BuildpackConfiguration {
                name: BP_SUI_DEPLOY_KEY_SCHEME.into(),
                default: Some("ed25519".into()),
                build: true,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_environment_overrides_default() {
        let resolver = ConfigurationResolver::new(
            defaults(),
            [(BP_SUI_DEPLOY_NETWORK.to_string(), "testnet".to_string())],
        );

        assert_eq!(
            resolver.lookup(BP_SUI_DEPLOY_NETWORK),
            (Some("testnet".to_string()), ValueSource::Environment)
        );
        assert_eq!(
            resolver.lookup(BP_SUI_DEPLOY_KEY_SCHEME),
            (Some("ed25519".to_string()), ValueSource::Default)
        );
        assert_eq!(resolver.lookup(BP_SUI_DEPLOY_GAS), (None, ValueSource::Unset));
    }

    #[test]
    fn test_resolve_bool() {
        let resolver = ConfigurationResolver::new(
            defaults(),
            [
                ("A".to_string(), "True".to_string()),
                ("B".to_string(), "0".to_string()),
                ("C".to_string(), "yes".to_string()),
            ],
        );

        assert!(resolver.resolve_bool("A"));
        assert!(!resolver.resolve_bool("B"));
        assert!(!resolver.resolve_bool("C"));
        assert!(!resolver.resolve_bool(BP_ENABLE_SUI_DEPLOY));
        assert!(!resolver.resolve_bool("MISSING"));
    }

    #[test]
    fn test_describe_masks_private_key() {
        let resolver = ConfigurationResolver::new(
            defaults(),
            [(
                BP_SUI_DEPLOY_PRIVATE_KEY.to_string(),
                "suiprivkey1qqq".to_string(),
            )],
        );

        let rows = resolver.describe();
        let key_row = rows
            .iter()
            .find(|r| r.name == BP_SUI_DEPLOY_PRIVATE_KEY)
            .unwrap();
        assert_eq!(key_row.value, "********");
        assert_eq!(rows.len(), CONFIGURATION_KEYS.len());
    }

    #[test]
    fn test_deploy_config_requires_private_key() {
        let resolver = ConfigurationResolver::new(
            defaults(),
            [(BP_ENABLE_SUI_DEPLOY.to_string(), "true".to_string())],
        );
        let config = DeployConfig::from_resolver(&resolver);

        assert!(config.enabled);
        assert_eq!(config.network, "devnet");
        assert_eq!(config.gas_budget, "");
        assert_eq!(
            config.require_private_key().unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_secret_debug_is_masked() {
        let secret = Secret::new("suiprivkey1abc");
        assert_eq!(format!("{:?}", secret), "Secret(********)");
        assert_eq!(secret.expose(), "suiprivkey1abc");
    }
}
