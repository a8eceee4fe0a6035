//! CLI argument definitions for the TSM client provisioner.

use crate::lifecycle::ProvisionOptions;
use crate::paths::{DEFAULT_CONFIG_DIR, DEFAULT_TEMPLATE_DIR, ProvisionPaths};
use camino::Utf8PathBuf;
use clap::Parser;

/// Configure the TSM client from the environment and wait for termination.
#[derive(Parser, Debug, Clone)]
#[command(name = "tsm-client-provisioner")]
#[command(version, about)]
#[command(long_about = concat!(
    "Configure the TSM client from the environment and wait for termination.\n\n",
    "Reads TSM_SERVER_NAME, TSM_SERVER_HOST, TSM_SERVER_PORT, TSM_NODE_NAME, ",
    "TSM_PROXY_NAME and TSM_PROXY_PASSWORD, plus the optional USE_IPV6, ",
    "TLS_ENABLED and TLS_FORCE_V12 flags (set to 1 to enable). Renders dsm.opt, ",
    "dsm_wc.opt, dsm_no_wc.opt and dsm.sys, sets the client password, prints ",
    "ISSASSIST_TSM_CLIENT_CONTAINER_UP and then blocks until killed.",
))]
pub struct Cli {
    /// Directory containing dsm.opt.template and dsm.sys.template.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_TEMPLATE_DIR)]
    pub template_dir: Utf8PathBuf,

    /// Directory for ca.crt and the rendered configuration files.
    #[arg(long, value_name = "DIR", default_value = DEFAULT_CONFIG_DIR)]
    pub config_dir: Utf8PathBuf,

    /// Fail instead of warning when the client password cannot be set.
    #[arg(long)]
    pub strict_credential: bool,
}

impl Cli {
    /// Filesystem roots selected on the command line.
    #[must_use]
    pub fn paths(&self) -> ProvisionPaths {
        ProvisionPaths::new(self.template_dir.clone(), self.config_dir.clone())
    }

    /// Run options selected on the command line.
    #[must_use]
    pub fn options(&self) -> ProvisionOptions {
        ProvisionOptions {
            strict_credential: self.strict_credential,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_container_layout() {
        let cli = Cli::parse_from(["tsm-client-provisioner"]);
        assert_eq!(cli.paths(), ProvisionPaths::default());
        assert!(!cli.options().strict_credential);
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "tsm-client-provisioner",
            "--template-dir",
            "/srv/templates",
            "--config-dir",
            "/srv/data",
            "--strict-credential",
        ]);
        assert_eq!(cli.paths().options_template(), "/srv/templates/dsm.opt.template");
        assert_eq!(cli.paths().ca_certificate(), "/srv/data/ca.crt");
        assert!(cli.options().strict_credential);
    }
}
