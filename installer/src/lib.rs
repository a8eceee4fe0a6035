//! TSM client installer library.
//!
//! This crate downloads the pinned IBM Storage Protect (TSM) backup-archive
//! client release, verifies it against the vendor's SHA-256 checksum,
//! extracts it, and installs the packages the client needs. It backs the
//! `tsm-client-installer` binary and can be driven programmatically with
//! injected collaborators for testing.
//!
//! # Modules
//!
//! - [`acquisition`] - Download, verification, and extraction orchestration
//! - [`artefact`] - Release identity, HTTP fetch, checksum, and tar handling
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Installer error taxonomy
//! - [`packages`] - Package selection and `dpkg` installation
//! - [`pipeline`] - End-to-end install pipeline

pub mod acquisition;
pub mod artefact;
pub mod cli;
pub mod error;
pub mod packages;
pub mod pipeline;
