//! Checksum manifest parsing.
//!
//! The vendor publishes a `<archive>.sha256sum.txt` next to each release
//! archive. Its body is the `sha256sum` format: a digest and a filename
//! separated by whitespace, and nothing else.

use super::error::{DownloadError, Result};
use super::sha256_digest::Sha256Digest;

/// Expected digest and archive filename from a checksum manifest.
///
/// # Examples
///
/// ```
/// use tsm_client_installer::artefact::checksum_manifest::ChecksumManifest;
///
/// let body = format!("{}  client.tar\n", "a".repeat(64));
/// let manifest = ChecksumManifest::parse(&body).unwrap();
/// assert_eq!(manifest.filename(), "client.tar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumManifest {
    expected_checksum: Sha256Digest,
    filename: String,
}

impl ChecksumManifest {
    /// Parse a manifest body of exactly two whitespace-separated fields.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::MalformedChecksumManifest`] for any other
    /// field count and [`DownloadError::InvalidChecksum`] when the first field
    /// is not a SHA-256 digest.
    pub fn parse(body: &str) -> Result<Self> {
        let fields: Vec<&str> = body.split_whitespace().collect();
        let [checksum, filename] = fields.as_slice() else {
            return Err(DownloadError::MalformedChecksumManifest {
                fields: fields.len(),
            });
        };
        let expected_checksum = Sha256Digest::try_from(*checksum)
            .map_err(|source| DownloadError::InvalidChecksum { source })?;
        Ok(Self {
            expected_checksum,
            filename: (*filename).to_owned(),
        })
    }

    /// The digest the archive must hash to.
    #[must_use]
    pub fn expected_checksum(&self) -> &Sha256Digest {
        &self.expected_checksum
    }

    /// The archive filename the digest belongs to.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }
}
