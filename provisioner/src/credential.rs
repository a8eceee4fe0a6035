//! Bootstrapping the client password so later `dsmc` calls run unattended.

use crate::error::{ProvisionError, Result};
use log::{debug, warn};
use std::io::Write;
use tsm_container_common::{CommandExecutor, exit_code, write_stderr_line};

/// The backup-archive command-line client.
pub const DSMC_PATH: &str = "/opt/tivoli/tsm/client/ba/bin/dsmc";

/// Result of the password step when it does not abort provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialOutcome {
    /// `dsmc` accepted the password.
    Set,
    /// `dsmc` failed; provisioning continued with a warning.
    Unverified {
        /// Description of the failure.
        reason: String,
    },
}

/// Store `password` with `dsmc set password`, using it as both the old and
/// the new password.
///
/// A failure is reported as a warning and provisioning carries on, unless
/// `strict` is set.
///
/// # Errors
///
/// Returns [`ProvisionError::CredentialRejected`] when `dsmc` fails and
/// `strict` is set.
pub fn set_credential(
    executor: &dyn CommandExecutor,
    password: &str,
    strict: bool,
    stderr: &mut dyn Write,
) -> Result<CredentialOutcome> {
    let failure = match executor.run(DSMC_PATH, &["set", "password", password, password]) {
        Ok(output) if output.status.success() => None,
        Ok(output) => Some(describe_failure(exit_code(&output), &output.stdout, &output.stderr)),
        Err(err) => Some(format!("could not run {DSMC_PATH}: {err}")),
    };

    let Some(reason) = failure else {
        debug!("client password set");
        return Ok(CredentialOutcome::Set);
    };

    if strict {
        return Err(ProvisionError::CredentialRejected { reason });
    }

    warn!("client password may not be set: {reason}");
    write_stderr_line(
        stderr,
        format_args!(
            "Warning: could not set the client password ({reason}); \
             later client commands may prompt or fail."
        ),
    );
    Ok(CredentialOutcome::Unverified { reason })
}

// dsmc prints its ANS message to stdout, so fall back to it when stderr is
// empty.
fn describe_failure(code: i32, stdout: &[u8], stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let stdout = String::from_utf8_lossy(stdout);
    let detail = [stderr.trim(), stdout.trim()]
        .into_iter()
        .find(|text| !text.is_empty())
        .and_then(|text| text.lines().last())
        .unwrap_or("no output");
    format!("dsmc exited with status {code}: {detail}")
}
