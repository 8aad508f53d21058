//! Shell-backed command runner.

use crate::{HardwareError, Result, traits::CommandRunner, types::CommandOutcome};
use std::path::PathBuf;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Runs commands through `sh -c`, blocking the loop until they exit.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
    working_dir: Option<PathBuf>,
}

impl ShellRunner {
    /// Runner using `/bin/sh` in the daemon's current directory.
    pub fn new() -> Self {
        Self {
            shell: PathBuf::from("/bin/sh"),
            working_dir: None,
        }
    }

    /// Use a different shell binary.
    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Run commands inside `dir`.
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for ShellRunner {
    async fn run(&mut self, command: &str) -> Result<CommandOutcome> {
        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(command);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        debug!(command, shell = %self.shell.display(), "Spawning command");
        let status = cmd
            .status()
            .await
            .map_err(|e| HardwareError::command_failed(command, e.to_string()))?;

        let outcome = CommandOutcome {
            exit_code: status.code(),
        };
        match outcome.exit_code {
            Some(0) => info!(command, "Command finished"),
            Some(code) => warn!(command, code, "Command exited with non-zero status"),
            None => warn!(command, "Command terminated by signal"),
        }
        Ok(outcome)
    }
}
