//! Selection and installation of the client `.deb` packages.
//!
//! The release bundle ships more packages than the backup-archive client
//! needs. Only four categories are installed, and all four must be present
//! before `dpkg` is invoked at all.

use camino::{Utf8Path, Utf8PathBuf};
use log::{debug, warn};
use std::fmt;
use std::io::Write;
use tsm_container_common::{CommandExecutor, exit_code, write_stderr_line};

use crate::error::InstallationError;

/// Extension of installable package files.
const PACKAGE_EXTENSION: &str = "deb";

/// Package categories required by the backup-archive client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackageCategory {
    /// GSKit cryptographic library.
    CryptoLibrary,
    /// GSKit SSL library.
    SslLibrary,
    /// 64-bit client API runtime.
    ApiRuntime,
    /// Backup-archive base client.
    BackupClient,
}

impl PackageCategory {
    /// Every required category, in installation order.
    pub const ALL: [Self; 4] = [
        Self::CryptoLibrary,
        Self::SslLibrary,
        Self::ApiRuntime,
        Self::BackupClient,
    ];

    /// Filename prefix identifying the category.
    ///
    /// The base client prefix keeps its trailing dot so that sibling packages
    /// such as `tivsm-bacit` are not mistaken for it.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::CryptoLibrary => "gskcrypt",
            Self::SslLibrary => "gskssl",
            Self::ApiRuntime => "tivsm-api64",
            Self::BackupClient => "tivsm-ba.",
        }
    }

    /// Classify a package filename.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsm_client_installer::packages::PackageCategory;
    ///
    /// assert_eq!(
    ///     PackageCategory::classify("gskssl64_8.0-55.31.linux.x86_64.deb"),
    ///     Some(PackageCategory::SslLibrary)
    /// );
    /// assert_eq!(PackageCategory::classify("tivsm-bacit.amd64.deb"), None);
    /// ```
    #[must_use]
    pub fn classify(filename: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| filename.starts_with(category.prefix()))
    }
}

impl fmt::Display for PackageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CryptoLibrary => "cryptographic library",
            Self::SslLibrary => "SSL library",
            Self::ApiRuntime => "API runtime",
            Self::BackupClient => "backup-archive client",
        };
        f.write_str(label)
    }
}

/// The packages selected for installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSet {
    packages: Vec<(PackageCategory, Utf8PathBuf)>,
}

impl PackageSet {
    /// Select the required packages directly inside `dir`.
    ///
    /// Subdirectories are not searched. Files matching no category are
    /// ignored. Packages are ordered by filename.
    ///
    /// # Errors
    ///
    /// Returns [`InstallationError::Scan`] if `dir` cannot be listed and
    /// [`InstallationError::MissingPackages`] if any category is unmatched.
    pub fn collect(dir: &Utf8Path) -> Result<Self, InstallationError> {
        let scan_error = |source| InstallationError::Scan {
            path: dir.to_owned(),
            source,
        };

        let mut packages = Vec::new();
        for entry in dir.read_dir_utf8().map_err(scan_error)? {
            let entry = entry.map_err(scan_error)?;
            let path = entry.path();
            if !path.is_file() || path.extension() != Some(PACKAGE_EXTENSION) {
                continue;
            }
            match PackageCategory::classify(entry.file_name()) {
                Some(category) => packages.push((category, path.to_owned())),
                None => debug!("ignoring {}", entry.file_name()),
            }
        }
        packages.sort_by(|(_, left), (_, right)| left.file_name().cmp(&right.file_name()));

        let missing: Vec<PackageCategory> = PackageCategory::ALL
            .into_iter()
            .filter(|category| !packages.iter().any(|(found, _)| found == category))
            .collect();
        if !missing.is_empty() {
            return Err(InstallationError::MissingPackages { missing });
        }

        Ok(Self { packages })
    }

    /// Paths of the selected packages.
    pub fn paths(&self) -> impl Iterator<Item = &Utf8Path> {
        self.packages.iter().map(|(_, path)| path.as_path())
    }

    /// Number of selected packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether no packages were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Result of installing one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageOutcome {
    /// The package file.
    pub path: Utf8PathBuf,
    /// Exit code of `dpkg`; `-1` if it could not be run or was signalled.
    pub exit_code: i32,
}

impl PackageOutcome {
    /// Whether the package installed cleanly.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }
}

/// Per-package outcomes of an installation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    outcomes: Vec<PackageOutcome>,
}

impl InstallReport {
    /// Outcomes in installation order.
    #[must_use]
    pub fn outcomes(&self) -> &[PackageOutcome] {
        &self.outcomes
    }

    /// Bitwise OR of every exit code; zero only if every package succeeded.
    #[must_use]
    pub fn aggregate_status(&self) -> i32 {
        self.outcomes
            .iter()
            .fold(0, |status, outcome| status | outcome.exit_code)
    }

    /// Packages that failed to install.
    #[must_use]
    pub fn failed(&self) -> Vec<Utf8PathBuf> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.succeeded())
            .map(|outcome| outcome.path.clone())
            .collect()
    }
}

/// Install every package in `set` with `dpkg -i`, one call per file.
///
/// Every package is attempted even after a failure. Nothing is rolled back.
///
/// # Errors
///
/// Returns [`InstallationError::PackagesFailed`] if any package failed.
pub fn install_packages(
    set: &PackageSet,
    executor: &dyn CommandExecutor,
    stderr: &mut dyn Write,
) -> Result<InstallReport, InstallationError> {
    let mut report = InstallReport::default();

    for path in set.paths() {
        let exit_code = match executor.run("dpkg", &["-i", path.as_str()]) {
            Ok(output) => {
                let code = exit_code(&output);
                if code != 0 {
                    let detail = String::from_utf8_lossy(&output.stderr);
                    write_stderr_line(
                        stderr,
                        format!("dpkg failed for {path} (exit {code}): {}", detail.trim()),
                    );
                }
                code
            }
            Err(err) => {
                warn!("could not run dpkg for {path}: {err}");
                write_stderr_line(stderr, format!("could not run dpkg for {path}: {err}"));
                -1
            }
        };
        report.outcomes.push(PackageOutcome {
            path: path.to_owned(),
            exit_code,
        });
    }

    let status = report.aggregate_status();
    if status != 0 {
        return Err(InstallationError::PackagesFailed {
            failed: report.failed(),
            status,
        });
    }
    Ok(report)
}

#[cfg(test)]
#[path = "packages_tests.rs"]
mod tests;
