//! The provisioning run, from environment to readiness.
//!
//! A run moves through a fixed sequence of states and never goes back:
//!
//! ```text
//! Init -> MtabLinked -> CertImported | CertSkipped -> ConfigWritten
//!      -> CredentialSet -> Ready -> Waiting
//! ```
//!
//! Every transition is logged at debug level and recorded in a trace that
//! tests can inspect. Once ready, the process parks forever; a supervisor
//! watching stdout for [`READINESS_SENTINEL`] decides when it ends.

use crate::certificate::{CertificateOutcome, import_certificate};
use crate::config_files::emit_config;
use crate::credential::{CredentialOutcome, set_credential};
use crate::error::{ProvisionError, Result};
use crate::params::ProvisioningParameters;
use crate::paths::ProvisionPaths;
use crate::template::TemplateCache;
use camino::Utf8PathBuf;
use log::{debug, info};
use std::fmt;
use std::io::Write;
use std::sync::{Condvar, Mutex, PoisonError};
use tsm_container_common::{CommandExecutor, exit_code, write_stdout_line};

/// Line written to stdout once the client is ready for use.
pub const READINESS_SENTINEL: &str = "ISSASSIST_TSM_CLIENT_CONTAINER_UP";

const MTAB_LINK_ARGS: [&str; 3] = ["-sf", "/proc/mounts", "/etc/mtab"];

/// A step of the provisioning run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Parameters have been read.
    Init,
    /// The mount table link was attempted.
    MtabLinked,
    /// The CA certificate was imported.
    CertImported,
    /// No certificate was imported.
    CertSkipped,
    /// All configuration files are on disk.
    ConfigWritten,
    /// The password step finished.
    CredentialSet,
    /// The readiness line was written.
    Ready,
    /// Parked until the process is terminated.
    Waiting,
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "INIT",
            Self::MtabLinked => "MTAB_LINKED",
            Self::CertImported => "CERT_IMPORTED",
            Self::CertSkipped => "CERT_SKIPPED",
            Self::ConfigWritten => "CONFIG_WRITTEN",
            Self::CredentialSet => "CREDENTIAL_SET",
            Self::Ready => "READY",
            Self::Waiting => "WAITING",
        };
        f.write_str(name)
    }
}

/// Switches that change how strictly a run treats failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProvisionOptions {
    /// Abort when the client password cannot be set.
    pub strict_credential: bool,
}

/// What a successful preparation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preparation {
    /// Result of the certificate step.
    pub certificate: CertificateOutcome,
    /// Configuration files written, in order.
    pub config_files: Vec<Utf8PathBuf>,
    /// Result of the password step.
    pub credential: CredentialOutcome,
}

/// Drives one provisioning run.
pub struct Provisioner<'a> {
    paths: ProvisionPaths,
    executor: &'a dyn CommandExecutor,
    options: ProvisionOptions,
    cache: TemplateCache,
    trace: Vec<LifecycleState>,
}

impl<'a> Provisioner<'a> {
    /// Start a run in the [`LifecycleState::Init`] state.
    #[must_use]
    pub fn new(
        paths: ProvisionPaths,
        executor: &'a dyn CommandExecutor,
        options: ProvisionOptions,
    ) -> Self {
        debug!("provisioning state {}", LifecycleState::Init);
        Self {
            paths,
            executor,
            options,
            cache: TemplateCache::new(),
            trace: vec![LifecycleState::Init],
        }
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.trace.last().copied().unwrap_or(LifecycleState::Init)
    }

    /// Every state entered so far, oldest first.
    #[must_use]
    pub fn trace(&self) -> &[LifecycleState] {
        &self.trace
    }

    fn enter(&mut self, state: LifecycleState) {
        debug!("provisioning state {state}");
        self.trace.push(state);
    }

    /// Link the mount table, import the certificate, write configuration
    /// and set the password.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be rendered or written, or
    /// if the password step fails in strict mode.
    pub fn prepare(
        &mut self,
        params: &ProvisioningParameters,
        stderr: &mut dyn Write,
    ) -> Result<Preparation> {
        self.link_mtab();
        self.enter(LifecycleState::MtabLinked);

        let certificate = import_certificate(&self.paths, params, self.executor, stderr);
        self.enter(if certificate.is_imported() {
            LifecycleState::CertImported
        } else {
            LifecycleState::CertSkipped
        });

        let config_files = emit_config(&mut self.cache, &self.paths, params)?;
        self.enter(LifecycleState::ConfigWritten);

        let credential = set_credential(
            self.executor,
            &params.proxy_password,
            self.options.strict_credential,
            stderr,
        )?;
        self.enter(LifecycleState::CredentialSet);

        Ok(Preparation {
            certificate,
            config_files,
            credential,
        })
    }

    /// Prepare the client and write the readiness line to `stdout`.
    ///
    /// The line is written only after every preparation step succeeded.
    ///
    /// # Errors
    ///
    /// Returns any preparation error, or [`ProvisionError::Readiness`] if
    /// `stdout` cannot be written.
    pub fn provision(
        &mut self,
        params: &ProvisioningParameters,
        stdout: &mut dyn Write,
        stderr: &mut dyn Write,
    ) -> Result<Preparation> {
        let preparation = self.prepare(params, stderr)?;
        write_stdout_line(stdout, READINESS_SENTINEL).map_err(ProvisionError::Readiness)?;
        self.enter(LifecycleState::Ready);
        Ok(preparation)
    }

    /// Park the calling thread until the process is terminated.
    pub fn wait(mut self) -> ! {
        self.enter(LifecycleState::Waiting);
        let gate = Mutex::new(());
        let never_notified = Condvar::new();
        let mut guard = gate.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            guard = never_notified
                .wait(guard)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    // Some sandboxes lack /etc/mtab, which the client needs. Failure only
    // matters there, so it is logged and ignored.
    fn link_mtab(&self) {
        match self.executor.run("ln", &MTAB_LINK_ARGS) {
            Ok(output) if output.status.success() => {}
            Ok(output) => info!(
                "linking /etc/mtab failed with status {}",
                exit_code(&output)
            ),
            Err(err) => info!("could not run ln to link /etc/mtab: {err}"),
        }
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
