use std::path::PathBuf;

use crate::config::Secret;
use crate::entities::toolchain::ToolchainEnv;
use crate::error::{BuildpackError, Result};

/// A single external program execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub env: ToolchainEnv,
    /// Arguments hidden from logs and error messages
    pub secrets: Vec<Secret>,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I, env: &ToolchainEnv) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            working_dir: None,
            env: env.clone(),
            secrets: Vec::new(),
        }
    }

    /// Mark an argument value as secret
    pub fn with_secret(mut self, secret: &Secret) -> Self {
        if !secret.is_empty() {
            self.secrets.push(secret.clone());
        }
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// `program arg1 arg2` for messages, with secrets masked
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().map(|arg| {
            match self.secrets.iter().find(|s| s.expose() == arg) {
                Some(secret) => secret.to_string(),
                None => arg.clone(),
            }
        }));
        parts.join(" ")
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: Option<i32>,
    /// stdout followed by stderr
    pub output: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}

/// Runs external programs
pub trait CommandRunner {
    /// Run to completion and capture output. Failing to start the program
    /// is an error; a non-zero exit is reported in the returned status.
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;

    /// Like [`CommandRunner::run`] but a non-zero exit is an
    /// `ExternalTool` error carrying the captured output
    fn execute(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let output = self.run(invocation)?;
        if output.success() {
            return Ok(output);
        }

        Err(BuildpackError::ExternalTool {
            command: invocation.display(),
            reason: match output.status {
                Some(code) => format!("exit status {}: {}", code, output.text().trim()),
                None => format!("terminated by signal: {}", output.text().trim()),
            },
        })
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        (**self).run(invocation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_redacts_secret() {
        let invocation = Invocation::new(
            "sui",
            ["keytool", "import", "--json", "suiprivkey1abc", "ed25519"],
            &ToolchainEnv::default(),
        )
        .with_secret(&Secret::new("suiprivkey1abc"));

        assert_eq!(
            invocation.display(),
            "sui keytool import --json ******** ed25519"
        );
    }
}
