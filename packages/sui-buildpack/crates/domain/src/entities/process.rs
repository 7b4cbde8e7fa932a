use serde::{Deserialize, Serialize};

/// A launchable process registered with the lifecycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    /// Process type name (`sui`)
    pub r#type: String,
    pub command: String,
    pub args: Vec<String>,
    /// Started when no process type is given at launch
    pub default: bool,
}
