use std::fmt;

use domain::config::{DeployConfig, Secret};
use domain::entities::{DeployWallet, ToolchainEnv, TOOL_SUI};
use anyhow::{Context, Result};
use domain::error::{BuildpackError, ErrorKind};
use domain::ports::{CommandOutput, CommandRunner, Invocation};

/// The only network the faucet is requested for
pub const FAUCET_NETWORK: &str = "devnet";

/// Faucet endpoint for a network.
///
/// See <https://docs.sui.io/guides/developer/getting-started/get-coins>
pub fn faucet_url(network: &str) -> String {
    format!("https://faucet.{}.sui.io/gas", network)
}

/// Progress of wallet initialization. Steps only move forward; a failure
/// leaves earlier side effects (such as an imported key) in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WalletStage {
    Idle,
    EnvInitialized,
    KeyImported,
    KeyVerified,
    WalletSwitched,
    Done,
}

impl fmt::Display for WalletStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WalletStage::Idle => "idle",
            WalletStage::EnvInitialized => "env initialized",
            WalletStage::KeyImported => "key imported",
            WalletStage::KeyVerified => "key verified",
            WalletStage::WalletSwitched => "wallet switched",
            WalletStage::Done => "done",
        };
        write!(f, "{}", name)
    }
}

/// Result of the faucet step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaucetOutcome {
    Requested,
    /// Network has no faucet; treated as already funded
    Skipped,
}

/// Sets up the wallet used to publish the compiled package
pub struct WalletService<'a, R: CommandRunner> {
    runner: &'a R,
    env: &'a ToolchainEnv,
}

impl<'a, R: CommandRunner> WalletService<'a, R> {
    pub fn new(runner: &'a R, env: &'a ToolchainEnv) -> Self {
        Self { runner, env }
    }

    /// Initialize the wallet if deployment is enabled
    pub fn initialize_deploy_wallet(&self, config: &DeployConfig) -> Result<Option<DeployWallet>> {
        if !config.enabled {
            return Ok(None);
        }

        let private_key = config.require_private_key()?;
        self.initialize_wallet(private_key, &config.key_scheme, &config.network)
            .with_context(|| format!("unable to initialize {} wallet", TOOL_SUI))
            .map(Some)
    }

    /// Run every step in order; the first failure aborts the chain and
    /// reports the last stage reached.
    pub fn initialize_wallet(
        &self,
        private_key: &Secret,
        key_scheme: &str,
        network: &str,
    ) -> Result<DeployWallet> {
        let mut stage = WalletStage::Idle;
        let reached = |stage: WalletStage| format!("wallet stopped at stage: {}", stage);

        self.initialize_env()
            .context("unable to initialize sui env")
            .with_context(|| reached(stage))?;
        stage = WalletStage::EnvInitialized;

        let output = self
            .import_deploy_key(private_key, key_scheme)
            .context("unable to import sui deploy key")
            .with_context(|| reached(stage))?;
        stage = WalletStage::KeyImported;

        let wallet = self
            .verify_deploy_key(&output.output, key_scheme)
            .context("unable to verify sui deploy key")
            .with_context(|| reached(stage))?;
        stage = WalletStage::KeyVerified;

        self.switch_deploy_wallet(&wallet, network)
            .context("unable to switch sui deploy wallet")
            .with_context(|| reached(stage))?;
        stage = WalletStage::WalletSwitched;

        self.request_faucet(&wallet.address, network)
            .context("unable to get sui faucet")
            .with_context(|| reached(stage))?;

        tracing::debug!("Wallet {}", WalletStage::Done);
        Ok(wallet)
    }

    /// `sui client --yes envs` creates the client config on first use
    pub fn initialize_env(&self) -> Result<CommandOutput> {
        tracing::info!("Initializing sui env");
        Ok(self
            .runner
            .execute(&Invocation::new(TOOL_SUI, ["client", "--yes", "envs"], self.env))?)
    }

    pub fn import_deploy_key(&self, private_key: &Secret, key_scheme: &str) -> Result<CommandOutput> {
        tracing::info!("Importing sui deploy key {}", private_key);
        let invocation = Invocation::new(
            TOOL_SUI,
            ["keytool", "import", "--json", private_key.expose(), key_scheme],
            self.env,
        )
        .with_secret(private_key);

        Ok(self.runner.execute(&invocation)?)
    }

    /// Decode the import output and check the key scheme
    pub fn verify_deploy_key(&self, output: &[u8], key_scheme: &str) -> Result<DeployWallet> {
        tracing::info!("Verifying sui deploy key");
        let wallet = DeployWallet::from_import_output(output)?;
        wallet.verify_scheme(key_scheme)?;
        Ok(wallet)
    }

    pub fn switch_deploy_wallet(&self, wallet: &DeployWallet, network: &str) -> Result<()> {
        tracing::info!(
            "Switching sui deploy wallet {} for {} as default",
            wallet.address,
            network
        );
        self.runner.execute(&Invocation::new(
            TOOL_SUI,
            [
                "client",
                "switch",
                "--address",
                wallet.address.as_str(),
                "--env",
                network,
            ],
            self.env,
        ))?;
        Ok(())
    }

    /// Ask the network faucet for gas. Only `devnet` is funded; any other
    /// network is a successful no-op.
    pub fn request_faucet(&self, recipient: &str, network: &str) -> Result<FaucetOutcome> {
        if network != FAUCET_NETWORK {
            tracing::info!("Skipping sui faucet for {}", network);
            return Ok(FaucetOutcome::Skipped);
        }

        tracing::info!("Getting sui faucet for {}", recipient);
        let body = serde_json::json!({ "FixedAmountRequest": { "recipient": recipient } });
        let url = faucet_url(network);
        let invocation = Invocation::new(
            "curl",
            [
                "--location".to_string(),
                "--request".to_string(),
                "POST".to_string(),
                url,
                "--header".to_string(),
                "Content-Type: application/json".to_string(),
                "--data-raw".to_string(),
                body.to_string(),
            ],
            self.env,
        );

        match self.runner.execute(&invocation) {
            Ok(_) => Ok(FaucetOutcome::Requested),
            Err(e) if e.kind() == ErrorKind::ExternalTool => Err(BuildpackError::Network(
                format!("unable to get sui faucet for {}: {}", recipient, e),
            )
            .into()),
            Err(e) => Err(e.into()),
        }
    }
}
