use std::ffi::OsString;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use domain::config::DeployConfig;
use domain::entities::{
    DeployWallet, LaunchEnvironment, ProcessDescriptor, ToolchainEnv, ToolchainLayout, TOOL_SUI,
};
use domain::error::BuildpackError;
use domain::ports::{CommandRunner, Invocation};
use domain::system::{find_executable, Architecture, ToolVersion};
use infrastructure::archive;

use crate::process_types::build_process_types;
use crate::wallet_service::WalletService;

/// Leading path components dropped when expanding a release archive
const STRIP_COMPONENTS: usize = 1;

/// What a build contributed, for the adapter to hand to the lifecycle
#[derive(Debug, Clone)]
pub struct Contribution {
    pub version: ToolVersion,
    pub env: ToolchainEnv,
    pub launch: LaunchEnvironment,
    pub wallet: Option<DeployWallet>,
}

/// Installs the toolchain into a layer, compiles the contract and prepares
/// the deploy wallet
pub struct Provisioner<'a, R: CommandRunner> {
    runner: &'a R,
    config: &'a DeployConfig,
}

impl<'a, R: CommandRunner> Provisioner<'a, R> {
    pub fn new(runner: &'a R, config: &'a DeployConfig) -> Self {
        Self { runner, config }
    }

    /// Expand `archive` and install its `sui` binary into the layer
    pub fn install(
        &self,
        archive_path: &Path,
        layout: &ToolchainLayout,
        arch: Architecture,
    ) -> Result<()> {
        let scratch = tempfile::tempdir().context("unable to create a scratch directory")?;

        tracing::info!(
            "Expanding {} to {}",
            archive_path.display(),
            scratch.path().display()
        );
        archive::extract(archive_path, scratch.path(), STRIP_COMPONENTS)?;

        let origin = find_executable(scratch.path(), TOOL_SUI, arch).ok_or_else(|| {
            BuildpackError::NotFound(format!(
                "{} binary for {} in {}",
                TOOL_SUI,
                arch,
                archive_path.display()
            ))
        })?;

        let bin_file = layout.binary();
        tracing::info!("Copying {} to {}", origin.display(), bin_file.display());
        fs::create_dir_all(layout.bin_dir())
            .with_context(|| format!("unable to create {}", layout.bin_dir().display()))?;
        fs::copy(&origin, &bin_file).with_context(|| {
            format!("unable to copy {} to {}", origin.display(), bin_file.display())
        })?;

        tracing::info!("Setting {} as executable", bin_file.display());
        set_executable(&bin_file)?;

        Ok(())
    }

    /// Run the installed toolchain against the application: version check,
    /// compile, and wallet setup when deployment is enabled.
    ///
    /// `base_path` is the `PATH` the subprocesses start from; the layer's
    /// `bin` directory is put in front of it.
    pub fn contribute(
        &self,
        layout: &ToolchainLayout,
        app_dir: &Path,
        base_path: Option<OsString>,
    ) -> Result<Contribution> {
        let env = ToolchainEnv::for_layout(layout, base_path);
        tracing::info!("Setting {} in PATH", layout.bin_dir().display());

        let version = self
            .version(&env)
            .with_context(|| format!("unable to get {} version", TOOL_SUI))?;
        tracing::info!("Checking {} version: {}", TOOL_SUI, version);

        for dir in [layout.move_home(), layout.sui_config_dir()] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("unable to create {}", dir.display()))?;
        }
        tracing::info!("Setting MOVE_HOME={}", layout.move_home().display());
        tracing::info!("Setting SUI_CONFIG_DIR={}", layout.sui_config_dir().display());

        tracing::info!("Compiling contracts");
        self.compile(&env, app_dir)
            .context("unable to compile contract")?;

        let wallet = WalletService::new(self.runner, &env)
            .initialize_deploy_wallet(self.config)
            .context("unable to initialize deploy wallet")?;

        Ok(Contribution {
            version,
            launch: layout.launch_environment(),
            env,
            wallet,
        })
    }

    /// `sui --version`
    pub fn version(&self, env: &ToolchainEnv) -> Result<ToolVersion> {
        let output = self
            .runner
            .execute(&Invocation::new(TOOL_SUI, ["--version"], env))?;
        Ok(ToolVersion::parse(&output.text())?)
    }

    /// `sui move build` in the application directory
    pub fn compile(&self, env: &ToolchainEnv, app_dir: &Path) -> Result<()> {
        let output = self
            .runner
            .execute(&Invocation::new(TOOL_SUI, ["move", "build"], env).in_dir(app_dir))?;

        for line in output.text().lines() {
            tracing::info!("  {}", line);
        }
        Ok(())
    }

    /// Launch processes for this build
    pub fn process_types(&self) -> Result<Vec<ProcessDescriptor>> {
        Ok(build_process_types(self.config)?)
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .with_context(|| format!("unable to chmod {}", path.display()))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
