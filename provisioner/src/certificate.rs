//! Optional import of the server's CA certificate into the client trust store.

use crate::params::ProvisioningParameters;
use crate::paths::ProvisionPaths;
use log::{debug, warn};
use std::io::Write;
use tsm_container_common::{CommandExecutor, exit_code, write_stderr_line};

/// Certificate management tool shipped with the client.
pub const DSMCERT_PATH: &str = "/usr/bin/dsmcert";

/// What the certificate step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CertificateOutcome {
    /// TLS is disabled; nothing was attempted.
    TlsDisabled,
    /// No certificate file was supplied; the client's built-in trust applies.
    NotProvided,
    /// The certificate was handed to `dsmcert` successfully.
    Imported,
    /// `dsmcert` could not be run or reported failure.
    ImportFailed {
        /// Description of the failure.
        reason: String,
    },
}

impl CertificateOutcome {
    /// Whether a certificate ended up in the trust store.
    #[must_use]
    pub fn is_imported(&self) -> bool {
        matches!(self, Self::Imported)
    }
}

/// Import `<config-dir>/ca.crt` when TLS is enabled and the file exists.
///
/// Never fails. A missing certificate produces a notice and a failed import
/// produces a warning, both on `stderr`.
pub fn import_certificate(
    paths: &ProvisionPaths,
    params: &ProvisioningParameters,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> CertificateOutcome {
    if !params.tls_enabled {
        debug!("TLS disabled, not importing a CA certificate");
        return CertificateOutcome::TlsDisabled;
    }

    let ca_path = paths.ca_certificate();
    if !ca_path.is_file() {
        write_stderr_line(
            stderr,
            format_args!(
                "No CA certificate has been provided at path '{ca_path}'. \
                 The client will use pre-defined CA certificates."
            ),
        );
        return CertificateOutcome::NotProvided;
    }

    let args = [
        "-add",
        "-server",
        params.server_name.as_str(),
        "-file",
        ca_path.as_str(),
    ];
    let failure = match executor.run(DSMCERT_PATH, &args) {
        Ok(output) if output.status.success() => None,
        Ok(output) => Some(format!(
            "dsmcert exited with status {}: {}",
            exit_code(&output),
            String::from_utf8_lossy(&output.stderr).trim()
        )),
        Err(err) => Some(format!("could not run {DSMCERT_PATH}: {err}")),
    };

    match failure {
        None => {
            write_stderr_line(stderr, "Certificate imported.");
            CertificateOutcome::Imported
        }
        Some(reason) => {
            warn!("CA certificate import failed: {reason}");
            write_stderr_line(
                stderr,
                format_args!("Warning: could not import the CA certificate at '{ca_path}': {reason}"),
            );
            CertificateOutcome::ImportFailed { reason }
        }
    }
}
