#![allow(dead_code)]

use std::cell::RefCell;

use domain::config::{DeployConfig, Secret};
use domain::error::Result;
use domain::ports::{CommandOutput, CommandRunner, Invocation};

pub const ADDRESS: &str = "0xabc";
pub const PRIVATE_KEY: &str = "suiprivkey1qqexample";

/// Records every invocation and replies with scripted output.
///
/// Scripts are matched by prefix against `Invocation::display()`; anything
/// unscripted succeeds with empty output.
#[derive(Default)]
pub struct RecordingRunner {
    scripts: Vec<(String, CommandOutput)>,
    calls: RefCell<Vec<Invocation>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, prefix: &str, status: i32, output: &str) -> Self {
        self.scripts.push((
            prefix.to_string(),
            CommandOutput {
                status: Some(status),
                output: output.as_bytes().to_vec(),
            },
        ));
        self
    }

    /// A runner that behaves like a working `sui` with a deploy key
    pub fn sui(scheme: &str) -> Self {
        Self::new()
            .reply("sui --version", 0, "sui 1.14.0-c2a1e4f\n")
            .reply(
                "sui keytool import",
                0,
                &format!(
                    "warning: keystore created\n{{\"suiAddress\":\"{}\",\"keyScheme\":\"{}\"}}\n",
                    ADDRESS, scheme
                ),
            )
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    /// Calls rendered with secrets masked
    pub fn commands(&self) -> Vec<String> {
        self.calls.borrow().iter().map(Invocation::display).collect()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(invocation.clone());

        let display = invocation.display();
        let output = self
            .scripts
            .iter()
            .find(|(prefix, _)| display.starts_with(prefix.as_str()))
            .map(|(_, output)| output.clone())
            .unwrap_or(CommandOutput {
                status: Some(0),
                output: Vec::new(),
            });
        Ok(output)
    }
}

pub fn deploy_config(enabled: bool, network: &str) -> DeployConfig {
    DeployConfig {
        enabled,
        private_key: Secret::new(PRIVATE_KEY),
        key_scheme: "ed25519".to_string(),
        network: network.to_string(),
        gas_budget: "100000000".to_string(),
    }
}
