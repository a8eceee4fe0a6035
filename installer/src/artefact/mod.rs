//! Client release resolution, download, verification, and extraction.
//!
//! # Sub-modules
//!
//! - [`checksum_manifest`] - `sha256sum`-style manifest parsing.
//! - [`download`] - HTTP fetch trait and `ureq` implementation.
//! - [`error`] - [`DownloadError`](error::DownloadError) taxonomy.
//! - [`extraction`] - Tar extraction with path traversal protection.
//! - [`release`] - Release identity, URLs, and resolution strategy.
//! - [`sha256_digest`] - SHA-256 digest newtype.
//! - [`verification`] - Archive digest computation and comparison.

pub mod checksum_manifest;
pub mod download;
pub mod error;
pub mod extraction;
pub mod release;
pub mod sha256_digest;
pub mod verification;
