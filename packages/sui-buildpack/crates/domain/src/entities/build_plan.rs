use serde::{Deserialize, Serialize};
use std::fmt;

/// Build-plan entry name provided and required by this buildpack
pub const PLAN_ENTRY_SUI: &str = "sui";

/// A provide/require pair handed to the lifecycle's build-plan resolution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    pub provides: Vec<String>,
    pub requires: Vec<String>,
}

impl BuildPlan {
    /// The plan emitted for a Sui project
    pub fn sui() -> Self {
        Self {
            provides: vec![PLAN_ENTRY_SUI.to_string()],
            requires: vec![PLAN_ENTRY_SUI.to_string()],
        }
    }
}

/// Why an application directory is not a Sui project
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotMatchedReason {
    MissingManifest,
    MissingSuiDependency,
    NoMoveSources,
}

impl fmt::Display for NotMatchedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotMatchedReason::MissingManifest => write!(f, "no Move.toml found"),
            NotMatchedReason::MissingSuiDependency => {
                write!(f, "Move.toml does not declare a `Sui` dependency")
            }
            NotMatchedReason::NoMoveSources => write!(f, "no files with extension '.move' found"),
        }
    }
}

/// Outcome of a detection pass that did not error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Matched(BuildPlan),
    NotMatched(NotMatchedReason),
}

impl Detection {
    pub fn is_match(&self) -> bool {
        matches!(self, Detection::Matched(_))
    }

    /// The plans to report; empty unless matched
    pub fn plans(&self) -> Vec<BuildPlan> {
        match self {
            Detection::Matched(plan) => vec![plan.clone()],
            Detection::NotMatched(_) => Vec::new(),
        }
    }
}
