//! Fixed filesystem locations the provisioner reads and writes.

use camino::{Utf8Path, Utf8PathBuf};

/// Default directory holding the configuration templates.
pub const DEFAULT_TEMPLATE_DIR: &str = "/__issassist";
/// Default directory holding the CA certificate and rendered configuration.
pub const DEFAULT_CONFIG_DIR: &str = "/__issassist/data";

/// Template and configuration roots for one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionPaths {
    template_dir: Utf8PathBuf,
    config_dir: Utf8PathBuf,
}

impl ProvisionPaths {
    /// Create paths rooted at the given directories.
    #[must_use]
    pub fn new(template_dir: impl Into<Utf8PathBuf>, config_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            template_dir: template_dir.into(),
            config_dir: config_dir.into(),
        }
    }

    /// Directory holding the templates.
    #[must_use]
    pub fn template_dir(&self) -> &Utf8Path {
        &self.template_dir
    }

    /// Directory holding the rendered configuration.
    #[must_use]
    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }

    /// The client options template.
    #[must_use]
    pub fn options_template(&self) -> Utf8PathBuf {
        self.template_dir.join("dsm.opt.template")
    }

    /// The client system template.
    #[must_use]
    pub fn system_template(&self) -> Utf8PathBuf {
        self.template_dir.join("dsm.sys.template")
    }

    /// Optional CA certificate for the server.
    #[must_use]
    pub fn ca_certificate(&self) -> Utf8PathBuf {
        self.config_dir.join("ca.crt")
    }

    /// Resolve a file name inside the configuration directory.
    #[must_use]
    pub fn config_file(&self, file_name: &str) -> Utf8PathBuf {
        self.config_dir.join(file_name)
    }
}

impl Default for ProvisionPaths {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE_DIR, DEFAULT_CONFIG_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_matches_container_image() {
        let paths = ProvisionPaths::default();
        assert_eq!(paths.options_template(), "/__issassist/dsm.opt.template");
        assert_eq!(paths.system_template(), "/__issassist/dsm.sys.template");
        assert_eq!(paths.ca_certificate(), "/__issassist/data/ca.crt");
        assert_eq!(paths.config_file("dsm.sys"), "/__issassist/data/dsm.sys");
    }

    #[test]
    fn custom_roots_are_honoured() {
        let paths = ProvisionPaths::new("/tmp/templates", "/tmp/config");
        assert_eq!(paths.template_dir(), "/tmp/templates");
        assert_eq!(paths.config_dir(), "/tmp/config");
        assert_eq!(paths.ca_certificate(), "/tmp/config/ca.crt");
    }
}
