//! Subprocess execution behind a trait.
//!
//! Every external tool the containers depend on (`dpkg`, `ln`, `dsmcert`,
//! `dsmc`) is reached through [`CommandExecutor`], so pipelines can be
//! exercised in tests without touching the host.

use log::debug;
use std::io;
use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use tsm_container_common::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor;
    /// let output = executor.run("dpkg", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), std::io::Error>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> io::Result<Output> {
        debug!("running {cmd} with {} arguments", args.len());
        Command::new(cmd).args(args).output()
    }
}

/// Returns the exit code of a finished command.
///
/// A process killed by a signal has no exit code; it is reported as `-1` so
/// that callers folding statuses together still see a failure.
///
/// # Examples
///
/// ```no_run
/// use tsm_container_common::{CommandExecutor, SystemCommandExecutor, exit_code};
///
/// let output = SystemCommandExecutor.run("true", &[])?;
/// assert_eq!(exit_code(&output), 0);
/// # Ok::<(), std::io::Error>(())
/// ```
#[must_use]
pub fn exit_code(output: &Output) -> i32 {
    output.status.code().unwrap_or(-1)
}
