//! Client release identity and download location resolution.
//!
//! The installer targets one pinned client release. [`ResolutionStrategy`]
//! leaves room for discovering a newer release from the vendor index, but
//! that lookup is not implemented: `DiscoveredLatest` currently resolves to
//! the pinned fallback.

use log::debug;
use std::fmt;

/// The pinned backup-archive client release.
pub const FALLBACK_CLIENT_VERSION: &str = "8.1.25.0";

/// Vendor directory holding the Debian builds of the backup-archive client.
const RELEASE_ROOT_URL: &str = concat!(
    "https://public.dhe.ibm.com/storage",
    "/tivoli-storage-management/maintenance/client/v8r1/Linux",
    "/LinuxX86_DEB/BA"
);

/// A dotted client version such as `8.1.25.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientVersion(String);

impl ClientVersion {
    /// Return the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the vendor release directory for this version.
    ///
    /// The vendor drops the last component and the dots, so `8.1.25.0`
    /// lives under `v8125`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsm_client_installer::artefact::release::ClientVersion;
    ///
    /// assert_eq!(ClientVersion::from("8.1.25.0").release_dir(), "v8125");
    /// ```
    #[must_use]
    pub fn release_dir(&self) -> String {
        let components: Vec<&str> = self.0.split('.').collect();
        let leading = components
            .split_last()
            .map_or_else(String::new, |(_, rest)| rest.concat());
        format!("v{leading}")
    }
}

impl From<&str> for ClientVersion {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Display for ClientVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A resolved client release: version plus archive and manifest URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    version: ClientVersion,
    client_url: String,
    checksum_url: String,
}

impl Artifact {
    /// Resolve the vendor URLs for `version`.
    #[must_use]
    pub fn for_version(version: ClientVersion) -> Self {
        let archive = archive_filename(&version);
        let base = format!("{RELEASE_ROOT_URL}/{}", version.release_dir());
        Self {
            client_url: format!("{base}/{archive}"),
            checksum_url: format!("{base}/{archive}.sha256sum.txt"),
            version,
        }
    }

    /// The pinned fallback release.
    #[must_use]
    pub fn fallback() -> Self {
        Self::for_version(ClientVersion::from(FALLBACK_CLIENT_VERSION))
    }

    /// The release version.
    #[must_use]
    pub fn version(&self) -> &ClientVersion {
        &self.version
    }

    /// URL of the release archive.
    #[must_use]
    pub fn client_url(&self) -> &str {
        &self.client_url
    }

    /// URL of the archive's checksum manifest.
    #[must_use]
    pub fn checksum_url(&self) -> &str {
        &self.checksum_url
    }

    /// Filename of the release archive.
    #[must_use]
    pub fn archive_filename(&self) -> String {
        archive_filename(&self.version)
    }
}

fn archive_filename(version: &ClientVersion) -> String {
    format!("{version}-TIV-TSMBAC-LinuxX86_DEB.tar")
}

/// How the installer decides which release to fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Ask the vendor for the newest release, falling back to the pinned one.
    DiscoveredLatest,
    /// Use the pinned release.
    #[default]
    Fallback,
}

impl ResolutionStrategy {
    /// Resolve the release to install.
    ///
    /// No network lookup takes place for either variant.
    #[must_use]
    pub fn resolve(self) -> Artifact {
        match self {
            Self::DiscoveredLatest => {
                debug!(
                    "latest client discovery is unavailable; using {FALLBACK_CLIENT_VERSION}"
                );
                Artifact::fallback()
            }
            Self::Fallback => Artifact::fallback(),
        }
    }
}
