//! TSM client provisioner library.
//!
//! Turns the container's environment into a working IBM Storage Protect
//! (TSM) client setup: optional CA import, four rendered configuration
//! files and a stored password. It then tells the supervisor the container
//! is ready. The `tsm-client-provisioner` binary is a thin wrapper; every
//! external effect goes through injectable collaborators so the whole run
//! can be tested in a temporary directory.
//!
//! # Modules
//!
//! - [`certificate`] - CA certificate import
//! - [`cli`] - Command-line argument definitions
//! - [`config_files`] - The rendered configuration files and their values
//! - [`credential`] - Client password bootstrap
//! - [`error`] - Provisioner error taxonomy
//! - [`lifecycle`] - State machine from start-up to readiness
//! - [`params`] - Environment parameters
//! - [`paths`] - Template and configuration locations
//! - [`template`] - Placeholder substitution and the template cache

pub mod certificate;
pub mod cli;
pub mod config_files;
pub mod credential;
pub mod error;
pub mod lifecycle;
pub mod params;
pub mod paths;
pub mod template;
