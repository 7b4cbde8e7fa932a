use domain::error::{BuildpackError, Result};
use domain::ports::{CommandOutput, CommandRunner, Invocation};
use std::path::PathBuf;
use std::process::Command;

/// Runs programs as child processes of the buildpack.
///
/// The program is resolved against the invocation's own `PATH`, and the
/// invocation's variables are layered over the inherited environment for
/// that child only.
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }

    fn resolve_program(&self, invocation: &Invocation) -> Result<PathBuf> {
        let cwd = match &invocation.working_dir {
            Some(dir) => dir.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        };

        which::which_in(&invocation.program, invocation.env.path(), cwd).map_err(|e| {
            BuildpackError::NotFound(format!("executable '{}' ({})", invocation.program, e))
        })
    }
}

impl Default for SystemCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        let program = self.resolve_program(invocation)?;
        tracing::debug!("Running {}", invocation.display());

        let mut command = Command::new(&program);
        command.args(&invocation.args).envs(invocation.env.iter());
        if let Some(dir) = &invocation.working_dir {
            command.current_dir(dir);
        }

        let output = command.output().map_err(|e| {
            BuildpackError::io(format!("unable to run {}", invocation.display()), e)
        })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);

        Ok(CommandOutput {
            status: output.status.code(),
            output: combined,
        })
    }
}
