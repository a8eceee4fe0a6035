//! Shared plumbing for the TSM client container tools.
//!
//! Both the installer and the provisioner shell out to system tools and talk
//! to their callers through plain stderr/stdout lines. This crate keeps that
//! surface in one place so each binary can inject fakes in tests.
//!
//! # Modules
//!
//! - [`command`] - Subprocess abstraction and the host implementation
//! - [`output`] - Best-effort line writers for user-facing output
//! - [`test_utils`] - Stub executor for tests (`test-support` feature)

pub mod command;
pub mod output;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

pub use command::{CommandExecutor, SystemCommandExecutor, exit_code};
pub use output::{write_stderr_line, write_stdout_line};
