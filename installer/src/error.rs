//! Error types for the installer CLI.
//!
//! Acquisition failures are [`DownloadError`]s and package failures are
//! [`InstallationError`]s. Both are terminal: the binary prints the message
//! and exits with status 1.

use crate::artefact::error::DownloadError;
use crate::packages::PackageCategory;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising while selecting or installing client packages.
#[derive(Debug, Error)]
pub enum InstallationError {
    /// One or more required package categories had no matching file.
    #[error("could not find all necessary package files; missing: {}", describe_categories(.missing))]
    MissingPackages {
        /// Categories with no matching `.deb` file.
        missing: Vec<PackageCategory>,
    },

    /// The package manager reported failure for at least one package.
    #[error("some packages could not be installed: {}", describe_paths(.failed))]
    PackagesFailed {
        /// Packages whose installation failed.
        failed: Vec<Utf8PathBuf>,
        /// Bitwise OR of every package manager exit status.
        status: i32,
    },

    /// The extraction directory could not be listed.
    #[error("could not read package directory {path}: {source}")]
    Scan {
        /// The directory being scanned.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

fn describe_categories(categories: &[PackageCategory]) -> String {
    categories
        .iter()
        .map(|category| format!("{} ({}*)", category, category.prefix()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_paths(paths: &[Utf8PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.file_name().unwrap_or(path.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Errors that can occur during an installer run.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// Acquisition failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Package installation failed.
    #[error(transparent)]
    Installation(#[from] InstallationError),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
