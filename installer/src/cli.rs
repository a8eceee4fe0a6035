//! CLI argument definitions for the TSM client installer.

use camino::Utf8PathBuf;
use clap::Parser;

/// Download, verify, and install the TSM backup-archive client packages.
#[derive(Parser, Debug, Clone)]
#[command(name = "tsm-client-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Download, verify, and install the TSM backup-archive client packages.\n\n",
    "The pinned client release is fetched from the vendor download server, ",
    "checked against its published SHA-256 checksum, extracted into ",
    "<work-dir>/tsm_client, and the required .deb packages are installed with ",
    "dpkg. Re-running after a successful extraction skips the download.",
))]
pub struct Cli {
    /// Directory for the downloaded archive and extracted packages.
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub work_dir: Utf8PathBuf,

    /// Suppress progress output (errors still shown).
    #[arg(short, long)]
    pub quiet: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            work_dir: Utf8PathBuf::from("."),
            quiet: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_uses_current_directory() {
        let cli = Cli::parse_from(["tsm-client-installer"]);
        assert_eq!(cli.work_dir, Utf8PathBuf::from("."));
        assert!(!cli.quiet);
    }

    #[test]
    fn work_dir_and_quiet_are_parsed() {
        let cli = Cli::parse_from(["tsm-client-installer", "--work-dir", "/build", "-q"]);
        assert_eq!(cli.work_dir, Utf8PathBuf::from("/build"));
        assert!(cli.quiet);
    }
}
