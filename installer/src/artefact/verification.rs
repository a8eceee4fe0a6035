//! Integrity verification for the downloaded client archive.
//!
//! The archive digest is always compared against the checksum manifest
//! before extraction. There is no switch to skip the check.

use super::error::{DownloadError, Result};
use super::sha256_digest::Sha256Digest;
use camino::Utf8Path;
use log::debug;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};

/// Compute the SHA-256 digest of a file.
///
/// Reads the file at `path` in chunks and returns the lowercase hex
/// digest.
///
/// # Errors
///
/// Returns the I/O error if the file cannot be read.
pub fn compute_sha256(path: &Utf8Path) -> io::Result<Sha256Digest> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = file.read(&mut buffer)?;
        let Some(chunk) = buffer.get(..bytes_read) else {
            break;
        };
        if chunk.is_empty() {
            break;
        }
        hasher.update(chunk);
    }
    Ok(Sha256Digest::from_hash(&hasher.finalize()))
}

/// Verify the archive at `path` against the expected digest.
///
/// # Errors
///
/// Returns [`DownloadError::ChecksumCompute`] if the archive cannot be read
/// and [`DownloadError::ChecksumMismatch`] if the digests differ.
pub fn verify_archive(expected: &Sha256Digest, path: &Utf8Path) -> Result<()> {
    let actual = compute_sha256(path).map_err(|source| DownloadError::ChecksumCompute {
        path: path.to_owned(),
        source,
    })?;
    if actual != *expected {
        return Err(DownloadError::ChecksumMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        });
    }
    debug!("checksum verified for {path}");
    Ok(())
}
