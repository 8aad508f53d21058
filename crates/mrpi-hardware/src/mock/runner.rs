//! Mock command runner that records instead of spawning.

use crate::{HardwareError, Result, traits::CommandRunner, types::CommandOutcome};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug)]
struct RunLog {
    executed: Vec<String>,
    exit_code: i32,
    spawn_fails: bool,
}

fn lock(log: &Mutex<RunLog>) -> MutexGuard<'_, RunLog> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock command runner for testing.
///
/// Every command passed to [`CommandRunner::run`] is recorded, including
/// ones made to fail through the handle.
///
/// # Examples
///
/// ```
/// use mrpi_hardware::mock::MockRunner;
/// use mrpi_hardware::traits::CommandRunner;
///
/// #[tokio::main]
/// async fn main() -> mrpi_hardware::Result<()> {
///     let (mut runner, handle) = MockRunner::new();
///
///     let outcome = runner.run("button.sh").await?;
///     assert!(outcome.success());
///     assert_eq!(handle.executed(), vec!["button.sh"]);
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockRunner {
    log: Arc<Mutex<RunLog>>,
}

impl MockRunner {
    /// Create a new mock runner whose commands all exit 0.
    pub fn new() -> (Self, MockRunnerHandle) {
        let log = Arc::new(Mutex::new(RunLog {
            executed: Vec::new(),
            exit_code: 0,
            spawn_fails: false,
        }));

        (
            Self {
                log: Arc::clone(&log),
            },
            MockRunnerHandle { log },
        )
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new().0
    }
}

impl CommandRunner for MockRunner {
    async fn run(&mut self, command: &str) -> Result<CommandOutcome> {
        let mut log = lock(&self.log);
        log.executed.push(command.to_owned());

        if log.spawn_fails {
            return Err(HardwareError::command_failed(command, "Simulated spawn failure"));
        }
        Ok(CommandOutcome::exited(log.exit_code))
    }
}

/// Handle for inspecting and steering a mock runner.
#[derive(Debug, Clone)]
pub struct MockRunnerHandle {
    log: Arc<Mutex<RunLog>>,
}

impl MockRunnerHandle {
    /// Commands run so far, in order.
    pub fn executed(&self) -> Vec<String> {
        lock(&self.log).executed.clone()
    }

    /// Exit code reported for subsequent commands.
    pub fn set_exit_code(&self, code: i32) {
        lock(&self.log).exit_code = code;
    }

    /// Make subsequent commands fail to spawn.
    pub fn set_spawn_failure(&self, fails: bool) {
        lock(&self.log).spawn_fails = fails;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_runner_records_commands() {
        let (mut runner, handle) = MockRunner::new();

        runner.run("a.sh").await.unwrap();
        runner.run("b.sh --flag").await.unwrap();

        assert_eq!(handle.executed(), vec!["a.sh", "b.sh --flag"]);
    }

    #[tokio::test]
    async fn test_mock_runner_exit_code() {
        let (mut runner, handle) = MockRunner::new();
        handle.set_exit_code(2);

        let outcome = runner.run("a.sh").await.unwrap();
        assert_eq!(outcome.exit_code, Some(2));
        assert!(!outcome.success());
    }

    #[tokio::test]
    async fn test_mock_runner_spawn_failure() {
        let (mut runner, handle) = MockRunner::new();
        handle.set_spawn_failure(true);

        assert!(runner.run("a.sh").await.is_err());
        assert_eq!(handle.executed(), vec!["a.sh"]);
    }
}
