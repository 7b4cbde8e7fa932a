use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const TOOL_SUI: &str = "sui";
pub const ENV_PATH: &str = "PATH";
pub const ENV_MOVE_HOME: &str = "MOVE_HOME";
pub const ENV_SUI_CONFIG_DIR: &str = "SUI_CONFIG_DIR";

/// Fixed sub-paths of the toolchain layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainLayout {
    root: PathBuf,
}

impl ToolchainLayout {
    pub fn new(layer_path: impl Into<PathBuf>) -> Self {
        Self {
            root: layer_path.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// Installed `sui` executable
    pub fn binary(&self) -> PathBuf {
        self.bin_dir().join(TOOL_SUI)
    }

    /// Toolchain local state (`MOVE_HOME`)
    pub fn move_home(&self) -> PathBuf {
        self.root.join("move")
    }

    /// Client configuration and keystore (`SUI_CONFIG_DIR`)
    pub fn sui_config_dir(&self) -> PathBuf {
        self.root.join("sui-config")
    }

    /// Launch-time environment the layer declares
    pub fn launch_environment(&self) -> LaunchEnvironment {
        LaunchEnvironment::default()
            .append(ENV_PATH, self.bin_dir(), ":")
            .default_value(ENV_MOVE_HOME, self.move_home())
            .default_value(ENV_SUI_CONFIG_DIR, self.sui_config_dir())
    }
}

/// Build-scoped environment handed to every subprocess.
///
/// Installation steps record their variables here instead of mutating the
/// process environment, so concurrent builds in one process cannot see each
/// other's toolchain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainEnv {
    vars: BTreeMap<String, OsString>,
}

impl ToolchainEnv {
    /// Start from the given `PATH` (usually the build process's own)
    pub fn new(base_path: Option<OsString>) -> Self {
        let mut vars = BTreeMap::new();
        if let Some(path) = base_path {
            vars.insert(ENV_PATH.to_string(), path);
        }
        Self { vars }
    }

    pub fn from_current_path() -> Self {
        Self::new(std::env::var_os(ENV_PATH))
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<OsString>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&OsString> {
        self.vars.get(name)
    }

    /// Put `dir` in front of `PATH`
    pub fn prepend_path(&mut self, dir: &Path) -> &mut Self {
        let mut paths = vec![dir.to_path_buf()];
        if let Some(existing) = self.vars.get(ENV_PATH) {
            paths.extend(std::env::split_paths(existing).filter(|p| p != dir));
        }

        // split_paths/join_paths round-trip; only fails on a ':' inside a path
        let joined = std::env::join_paths(&paths)
            .unwrap_or_else(|_| dir.as_os_str().to_os_string());
        self.vars.insert(ENV_PATH.to_string(), joined);
        self
    }

    /// The search path subprocesses resolve programs against
    pub fn path(&self) -> Option<&OsString> {
        self.vars.get(ENV_PATH)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &OsString)> {
        self.vars.iter()
    }

    /// Environment for subprocesses run against an installed toolchain
    pub fn for_layout(layout: &ToolchainLayout, base_path: Option<OsString>) -> Self {
        let mut env = Self::new(base_path);
        env.prepend_path(&layout.bin_dir())
            .set(ENV_MOVE_HOME, layout.move_home())
            .set(ENV_SUI_CONFIG_DIR, layout.sui_config_dir());
        env
    }
}

/// How a launch-time variable is modified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvBehavior {
    Append { delimiter: String },
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvModification {
    pub name: String,
    pub value: PathBuf,
    pub behavior: EnvBehavior,
}

/// Launch-time environment declared on a layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchEnvironment {
    pub modifications: Vec<EnvModification>,
}

impl LaunchEnvironment {
    pub fn append(mut self, name: &str, value: PathBuf, delimiter: &str) -> Self {
        self.modifications.push(EnvModification {
            name: name.to_string(),
            value,
            behavior: EnvBehavior::Append {
                delimiter: delimiter.to_string(),
            },
        });
        self
    }

    pub fn default_value(mut self, name: &str, value: PathBuf) -> Self {
        self.modifications.push(EnvModification {
            name: name.to_string(),
            value,
            behavior: EnvBehavior::Default,
        });
        self
    }
}
