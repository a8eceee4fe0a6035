//! Acquisition and installation pipeline.
//!
//! Runs acquisition to completion, selects the package set, and hands it to
//! the package manager. Steps run strictly in sequence and the first error
//! ends the run.

use std::io::Write;
use tsm_container_common::{CommandExecutor, SystemCommandExecutor, write_stderr_line};

use crate::acquisition::{AcquisitionConfig, acquire_client_with};
use crate::artefact::download::{ArtefactDownloader, HttpDownloader};
use crate::artefact::extraction::{ArchiveExtractor, TarExtractor};
use crate::error::Result;
use crate::packages::{InstallReport, PackageSet, install_packages};

/// External collaborators used by the pipeline.
pub struct PipelineServices<'a> {
    /// Fetches the manifest and archive.
    pub downloader: &'a dyn ArtefactDownloader,
    /// Unpacks the archive.
    pub extractor: &'a dyn ArchiveExtractor,
    /// Runs the package manager.
    pub executor: &'a dyn CommandExecutor,
}

/// Download, verify, extract, and install the client on the host.
///
/// # Errors
///
/// Returns the first download or installation error encountered.
pub fn install_client(
    config: &AcquisitionConfig<'_>,
    stderr: &mut dyn Write,
) -> Result<InstallReport> {
    let services = PipelineServices {
        downloader: &HttpDownloader,
        extractor: &TarExtractor,
        executor: &SystemCommandExecutor,
    };
    install_client_with(config, &services, stderr)
}

/// Testable inner function with injected collaborators.
///
/// # Errors
///
/// Returns the first download or installation error encountered.
pub fn install_client_with(
    config: &AcquisitionConfig<'_>,
    services: &PipelineServices<'_>,
    stderr: &mut dyn Write,
) -> Result<InstallReport> {
    let package_dir =
        acquire_client_with(config, services.downloader, services.extractor, stderr)?;
    let packages = PackageSet::collect(&package_dir)?;

    if !config.quiet {
        write_stderr_line(
            stderr,
            format!("Installing {} TSM client packages", packages.len()),
        );
    }
    let report = install_packages(&packages, services.executor, stderr)?;

    if !config.quiet {
        write_stderr_line(stderr, "TSM client installed successfully.");
    }
    Ok(report)
}
