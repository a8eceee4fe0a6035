//! Error types for client acquisition.
//!
//! Every failure between resolving the release and extracting the archive is
//! a [`DownloadError`]. None of them are retried; the caller reports the
//! message and exits.

use super::download::FetchError;
use super::extraction::ExtractionError;
use super::sha256_digest::InvalidDigest;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors arising while downloading, verifying, or extracting the client.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The checksum manifest could not be fetched.
    #[error("could not download the client checksum: {source}")]
    ChecksumUnavailable {
        /// The underlying HTTP failure.
        #[source]
        source: FetchError,
    },

    /// The checksum manifest did not contain exactly a digest and a filename.
    #[error("could not download the client checksum: expected 2 fields, found {fields}")]
    MalformedChecksumManifest {
        /// Number of whitespace-separated fields in the manifest body.
        fields: usize,
    },

    /// The checksum manifest carried something other than a SHA-256 digest.
    #[error("could not download the client checksum: {source}")]
    InvalidChecksum {
        /// Why the digest was rejected.
        #[source]
        source: InvalidDigest,
    },

    /// The manifest describes a different archive than the one requested.
    #[error("checksum manifest names {manifest}, expected {expected}")]
    ArchiveNameMismatch {
        /// Filename recorded in the manifest.
        manifest: String,
        /// Filename of the resolved release archive.
        expected: String,
    },

    /// The client archive could not be fetched.
    #[error("could not download the client from {url}: {source}")]
    ClientUnavailable {
        /// The archive URL that was requested.
        url: String,
        /// The underlying HTTP failure.
        #[source]
        source: FetchError,
    },

    /// The archive on disk could not be hashed.
    #[error("could not compute the checksum of {path}: {source}")]
    ChecksumCompute {
        /// The archive that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive digest differs from the manifest.
    #[error("checksum does not match the downloaded file: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Digest recorded in the manifest.
        expected: String,
        /// Digest computed from the archive bytes.
        actual: String,
    },

    /// The extraction directory could not be created.
    #[error("could not create {path}: {source}")]
    CreateDirectory {
        /// The directory that could not be created.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The archive could not be unpacked.
    #[error("could not extract the client: {source}")]
    Extraction {
        /// The underlying extraction failure.
        #[source]
        source: ExtractionError,
    },
}

/// Result type alias using [`DownloadError`].
pub type Result<T> = std::result::Result<T, DownloadError>;
