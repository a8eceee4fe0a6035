//! The four client configuration files and the values rendered into them.
//!
//! Three option files come from the options template and differ only in
//! whether wildcards are literal. The system file carries the connection
//! stanza. All four are rendered before any is written, so a template
//! problem leaves existing configuration untouched.

use crate::error::{ProvisionError, Result};
use crate::params::ProvisioningParameters;
use crate::paths::ProvisionPaths;
use crate::template::{TemplateCache, TemplateValues};
use camino::Utf8PathBuf;
use log::debug;
use std::fmt;

/// Line that caps the client at TLS 1.2.
pub const DISABLE_TLS13_FLAG: &str = "TESTFLAG disable_tls13";

/// A configuration file produced by the provisioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFile {
    /// Default options file.
    Options,
    /// Options with wildcard expansion.
    WildcardOptions,
    /// Options treating wildcards as literal characters.
    NoWildcardOptions,
    /// Server connection stanza.
    System,
}

impl ConfigFile {
    /// Every file, in render order.
    pub const ALL: [Self; 4] = [
        Self::Options,
        Self::WildcardOptions,
        Self::NoWildcardOptions,
        Self::System,
    ];

    /// File name inside the configuration directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Options => "dsm.opt",
            Self::WildcardOptions => "dsm_wc.opt",
            Self::NoWildcardOptions => "dsm_no_wc.opt",
            Self::System => "dsm.sys",
        }
    }

    /// Template this file is rendered from.
    #[must_use]
    pub fn template_path(self, paths: &ProvisionPaths) -> Utf8PathBuf {
        match self {
            Self::System => paths.system_template(),
            _ => paths.options_template(),
        }
    }

    /// Destination of this file.
    #[must_use]
    pub fn destination(self, paths: &ProvisionPaths) -> Utf8PathBuf {
        paths.config_file(self.file_name())
    }

    /// Values substituted into this file's template.
    #[must_use]
    pub fn values(self, params: &ProvisioningParameters) -> TemplateValues {
        match self {
            Self::Options | Self::WildcardOptions => options_values(params, false),
            Self::NoWildcardOptions => options_values(params, true),
            Self::System => system_values(params),
        }
    }
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn options_values(params: &ProvisioningParameters, wildcards_are_literal: bool) -> TemplateValues {
    TemplateValues::new()
        .with("tsm_server_name", params.server_name.as_str())
        .with("wildcards_are_literal", yes_no(wildcards_are_literal))
}

fn system_values(params: &ProvisioningParameters) -> TemplateValues {
    let ip_version = if params.use_ipv6 { "V6TCPIP" } else { "TCPIP" };
    let disable_tls13 = if params.disables_tls13() {
        DISABLE_TLS13_FLAG
    } else {
        ""
    };
    TemplateValues::new()
        .with("tsm_server_name", params.server_name.as_str())
        .with("tsm_server_host", params.server_host.as_str())
        .with("tsm_server_port", params.server_port.as_str())
        .with("ip_version", ip_version)
        .with("tsm_node_name", params.node_name.as_str())
        .with("tsm_proxy_name", params.proxy_name.as_str())
        .with("tls_enabled", yes_no(params.tls_enabled))
        .with("disable_tls13", disable_tls13)
}

/// A rendered file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedConfigFile {
    /// Which file this is.
    pub file: ConfigFile,
    /// Where it will be written.
    pub destination: Utf8PathBuf,
    /// Rendered text.
    pub contents: String,
}

/// Render every configuration file without writing any of them.
///
/// # Errors
///
/// Returns the first template read or substitution error.
pub fn render_all(
    cache: &mut TemplateCache,
    paths: &ProvisionPaths,
    params: &ProvisioningParameters,
) -> Result<Vec<RenderedConfigFile>> {
    ConfigFile::ALL
        .into_iter()
        .map(|file| {
            let contents = cache.render(&file.template_path(paths), &file.values(params))?;
            Ok(RenderedConfigFile {
                file,
                destination: file.destination(paths),
                contents,
            })
        })
        .collect()
}

/// Write rendered files, replacing any previous content.
///
/// # Errors
///
/// Returns [`ProvisionError::ConfigWrite`] for the first file that cannot
/// be written. Files before it have already been replaced.
pub fn write_all(rendered: &[RenderedConfigFile]) -> Result<()> {
    for file in rendered {
        std::fs::write(&file.destination, &file.contents).map_err(|source| {
            ProvisionError::ConfigWrite {
                path: file.destination.clone(),
                source,
            }
        })?;
        debug!("wrote {}", file.destination);
    }
    Ok(())
}

/// Render then write every configuration file.
///
/// # Errors
///
/// See [`render_all`] and [`write_all`].
pub fn emit_config(
    cache: &mut TemplateCache,
    paths: &ProvisionPaths,
    params: &ProvisioningParameters,
) -> Result<Vec<Utf8PathBuf>> {
    let rendered = render_all(cache, paths, params)?;
    write_all(&rendered)?;
    Ok(rendered.into_iter().map(|file| file.destination).collect())
}

#[cfg(test)]
#[path = "config_files_tests.rs"]
mod tests;
