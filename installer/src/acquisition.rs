//! Client acquisition orchestrator.
//!
//! Resolves the release, fetches and parses its checksum manifest, downloads
//! the archive when it is not already on disk, verifies the archive digest,
//! and extracts it. An existing installer marker short-circuits the whole
//! pipeline so re-running acquisition after a successful run is a no-op.

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::io::Write;
use tsm_container_common::write_stderr_line;

use crate::artefact::checksum_manifest::ChecksumManifest;
use crate::artefact::download::{ArtefactDownloader, HttpDownloader};
use crate::artefact::error::{DownloadError, Result};
use crate::artefact::extraction::{ArchiveExtractor, TarExtractor};
use crate::artefact::release::{Artifact, ResolutionStrategy};
use crate::artefact::verification::verify_archive;

/// Directory, relative to the work directory, that receives the packages.
pub const EXTRACTION_DIR_NAME: &str = "tsm_client";

/// Package whose presence marks a completed extraction.
pub const INSTALLER_MARKER: &str = "tivsm-ba.amd64.deb";

/// Configuration for an acquisition run.
#[derive(Debug)]
pub struct AcquisitionConfig<'a> {
    /// Directory holding the downloaded archive and the extraction directory.
    pub work_dir: &'a Utf8Path,
    /// How the release is chosen.
    pub strategy: ResolutionStrategy,
    /// When true, suppress progress output.
    pub quiet: bool,
}

impl AcquisitionConfig<'_> {
    /// Where the archive is extracted.
    #[must_use]
    pub fn extraction_dir(&self) -> Utf8PathBuf {
        self.work_dir.join(EXTRACTION_DIR_NAME)
    }
}

/// Acquire the client using production HTTP and extraction implementations.
///
/// # Errors
///
/// Returns a [`DownloadError`] when any step fails.
pub fn acquire_client(
    config: &AcquisitionConfig<'_>,
    stderr: &mut dyn Write,
) -> Result<Utf8PathBuf> {
    acquire_client_with(config, &HttpDownloader, &TarExtractor, stderr)
}

/// Testable inner function with injected dependencies.
///
/// Returns the extraction directory.
///
/// # Errors
///
/// Returns a [`DownloadError`] when any step fails.
pub fn acquire_client_with(
    config: &AcquisitionConfig<'_>,
    downloader: &dyn ArtefactDownloader,
    extractor: &dyn ArchiveExtractor,
    stderr: &mut dyn Write,
) -> Result<Utf8PathBuf> {
    if !config.quiet {
        write_stderr_line(stderr, "Downloading TSM client");
    }

    let extraction_dir = config.extraction_dir();
    if extraction_dir.join(INSTALLER_MARKER).exists() {
        debug!("{INSTALLER_MARKER} already present in {extraction_dir}; skipping download");
        return Ok(extraction_dir);
    }

    let artifact = config.strategy.resolve();
    let manifest = fetch_manifest(downloader, &artifact)?;
    let archive_path = config.work_dir.join(manifest.filename());

    if archive_path.exists() {
        debug!("reusing existing archive {archive_path}");
    } else {
        download_archive(downloader, &artifact, &archive_path)?;
    }

    verify_archive(manifest.expected_checksum(), &archive_path)?;

    if !config.quiet {
        write_stderr_line(stderr, format!("Extracting {archive_path}"));
    }
    extract_archive(extractor, &archive_path, &extraction_dir)?;

    Ok(extraction_dir)
}

/// Fetch and parse the checksum manifest, checking it names our archive.
fn fetch_manifest(
    downloader: &dyn ArtefactDownloader,
    artifact: &Artifact,
) -> Result<ChecksumManifest> {
    let body = downloader
        .fetch_text(artifact.checksum_url())
        .map_err(|source| DownloadError::ChecksumUnavailable { source })?;
    let manifest = ChecksumManifest::parse(&body)?;

    let expected = artifact.archive_filename();
    if manifest.filename() != expected {
        return Err(DownloadError::ArchiveNameMismatch {
            manifest: manifest.filename().to_owned(),
            expected,
        });
    }
    Ok(manifest)
}

/// Download the archive, removing any partial file on failure.
fn download_archive(
    downloader: &dyn ArtefactDownloader,
    artifact: &Artifact,
    archive_path: &Utf8Path,
) -> Result<()> {
    let url = artifact.client_url();
    debug!("fetching {url} into {archive_path}");
    if let Err(source) = downloader.fetch_to_file(url, archive_path.as_std_path()) {
        if let Err(cleanup) = std::fs::remove_file(archive_path) {
            debug!("no partial archive removed at {archive_path}: {cleanup}");
        }
        return Err(DownloadError::ClientUnavailable {
            url: url.to_owned(),
            source,
        });
    }
    Ok(())
}

/// Extract into the extraction directory.
///
/// On failure the directory is removed only when this call created it.
fn extract_archive(
    extractor: &dyn ArchiveExtractor,
    archive_path: &Utf8Path,
    extraction_dir: &Utf8Path,
) -> Result<()> {
    let created = !extraction_dir.exists();
    std::fs::create_dir_all(extraction_dir).map_err(|source| DownloadError::CreateDirectory {
        path: extraction_dir.to_owned(),
        source,
    })?;

    match extractor.extract(archive_path.as_std_path(), extraction_dir.as_std_path()) {
        Ok(files) => {
            debug!("extracted {} files into {extraction_dir}", files.len());
            Ok(())
        }
        Err(source) => {
            if created {
                if let Err(cleanup) = std::fs::remove_dir_all(extraction_dir) {
                    debug!("could not remove {extraction_dir}: {cleanup}");
                }
            } else {
                debug!("leaving pre-existing {extraction_dir} in place");
            }
            Err(DownloadError::Extraction { source })
        }
    }
}

#[cfg(test)]
#[path = "acquisition_tests.rs"]
mod tests;
