use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A dependency entry in `[dependencies]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DependencySpec {
    /// Package fetched from a git repository.
    Git(GitDependency),

    /// Package on the local filesystem.
    Local(LocalDependency),

    /// Any other form (external resolvers, on-chain ids, bare strings).
    /// Kept raw.
    Other(toml::Value),
}

/// `{ git = "...", rev = "...", subdir = "..." }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitDependency {
    /// Source location of the repository
    pub git: String,

    /// Branch, tag or commit
    #[serde(default)]
    pub rev: Option<String>,

    /// Package directory inside the repository
    #[serde(default)]
    pub subdir: Option<String>,
}

/// `{ local = "../path" }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalDependency {
    pub local: PathBuf,
}

impl DependencySpec {
    /// Where the dependency comes from, for log output
    pub fn source(&self) -> String {
        match self {
            DependencySpec::Git(git) => match &git.rev {
                Some(rev) => format!("{}@{}", git.git, rev),
                None => git.git.clone(),
            },
            DependencySpec::Local(local) => local.local.display().to_string(),
            DependencySpec::Other(_) => "<external>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_dependency_spec_git_without_rev() {
        let spec: DependencySpec = toml::from_str::<BTreeMap<String, DependencySpec>>(
            r#"Sui = { git = "https://github.com/MystenLabs/sui.git" }"#,
        )
        .unwrap()
        .remove("Sui")
        .unwrap();

        match spec {
            DependencySpec::Git(git) => {
                assert_eq!(git.git, "https://github.com/MystenLabs/sui.git");
                assert!(git.rev.is_none());
                assert!(git.subdir.is_none());
            }
            _ => panic!("Expected Git"),
        }
    }

    #[test]
    fn test_dependency_spec_local() {
        let deps: BTreeMap<String, DependencySpec> =
            toml::from_str(r#"MoveStdlib = { local = "../move-stdlib" }"#).unwrap();

        assert_eq!(deps["MoveStdlib"].source(), "../move-stdlib");
    }

    #[test]
    fn test_dependency_spec_other() {
        let deps: BTreeMap<String, DependencySpec> =
            toml::from_str(r#"Ext = { r.mvr = "@pkg/name" }"#).unwrap();

        assert!(matches!(deps["Ext"], DependencySpec::Other(_)));
        assert_eq!(deps["Ext"].source(), "<external>");
    }
}
