//! Provisioning parameters read from the container environment.

use crate::error::ContractViolation;

/// Variable naming the server stanza.
pub const SERVER_NAME_VAR: &str = "TSM_SERVER_NAME";
/// Variable holding the server host name or address.
pub const SERVER_HOST_VAR: &str = "TSM_SERVER_HOST";
/// Variable holding the server TCP port.
pub const SERVER_PORT_VAR: &str = "TSM_SERVER_PORT";
/// Variable holding the node name.
pub const NODE_NAME_VAR: &str = "TSM_NODE_NAME";
/// Variable holding the proxy node name used for authentication.
pub const PROXY_NAME_VAR: &str = "TSM_PROXY_NAME";
/// Variable holding the proxy node password.
pub const PROXY_PASSWORD_VAR: &str = "TSM_PROXY_PASSWORD";
/// Set to `1` to connect over IPv6.
pub const USE_IPV6_VAR: &str = "USE_IPV6";
/// Set to `1` to enable TLS.
pub const TLS_ENABLED_VAR: &str = "TLS_ENABLED";
/// Set to `1` to cap TLS at version 1.2.
pub const TLS_FORCE_V12_VAR: &str = "TLS_FORCE_V12";

/// Everything the provisioner needs to know about the target server.
///
/// String fields are mandatory. Flags are only set by the literal value
/// `1`; anything else, including absence, leaves them off.
#[derive(Clone, PartialEq, Eq)]
pub struct ProvisioningParameters {
    /// Server stanza name.
    pub server_name: String,
    /// Server host name or address.
    pub server_host: String,
    /// Server TCP port, passed through verbatim.
    pub server_port: String,
    /// Node name.
    pub node_name: String,
    /// Proxy node name.
    pub proxy_name: String,
    /// Proxy node password.
    pub proxy_password: String,
    /// Connect over IPv6.
    pub use_ipv6: bool,
    /// Enable TLS.
    pub tls_enabled: bool,
    /// Cap TLS at version 1.2. Has no effect unless TLS is enabled.
    pub tls_force_v12: bool,
}

impl ProvisioningParameters {
    /// Read parameters from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::MissingParameter`] for the first
    /// mandatory variable that is unset.
    pub fn from_env() -> Result<Self, ContractViolation> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read parameters through an arbitrary lookup function.
    ///
    /// # Errors
    ///
    /// Returns [`ContractViolation::MissingParameter`] for the first
    /// mandatory variable the lookup cannot resolve.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use tsm_client_provisioner::params::ProvisioningParameters;
    ///
    /// let env: HashMap<&str, &str> = HashMap::from([
    ///     ("TSM_SERVER_NAME", "backup"),
    ///     ("TSM_SERVER_HOST", "tsm.example.org"),
    ///     ("TSM_SERVER_PORT", "1500"),
    ///     ("TSM_NODE_NAME", "node1"),
    ///     ("TSM_PROXY_NAME", "proxy1"),
    ///     ("TSM_PROXY_PASSWORD", "secret"),
    ///     ("TLS_ENABLED", "1"),
    /// ]);
    /// let params = ProvisioningParameters::from_lookup(|name| {
    ///     env.get(name).map(|value| (*value).to_owned())
    /// })?;
    /// assert!(params.tls_enabled);
    /// assert!(!params.use_ipv6);
    /// # Ok::<(), tsm_client_provisioner::error::ContractViolation>(())
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ContractViolation> {
        let required = |name: &'static str| {
            lookup(name).ok_or(ContractViolation::MissingParameter { name })
        };
        let flag = |name: &str| lookup(name).as_deref() == Some("1");

        Ok(Self {
            server_name: required(SERVER_NAME_VAR)?,
            server_host: required(SERVER_HOST_VAR)?,
            server_port: required(SERVER_PORT_VAR)?,
            node_name: required(NODE_NAME_VAR)?,
            proxy_name: required(PROXY_NAME_VAR)?,
            proxy_password: required(PROXY_PASSWORD_VAR)?,
            use_ipv6: flag(USE_IPV6_VAR),
            tls_enabled: flag(TLS_ENABLED_VAR),
            tls_force_v12: flag(TLS_FORCE_V12_VAR),
        })
    }

    /// Whether TLS 1.3 should be disabled in the client configuration.
    #[must_use]
    pub fn disables_tls13(&self) -> bool {
        self.tls_enabled && self.tls_force_v12
    }
}

// The password must never reach logs through `{:?}`.
impl std::fmt::Debug for ProvisioningParameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvisioningParameters")
            .field("server_name", &self.server_name)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("node_name", &self.node_name)
            .field("proxy_name", &self.proxy_name)
            .field("proxy_password", &"<redacted>")
            .field("use_ipv6", &self.use_ipv6)
            .field("tls_enabled", &self.tls_enabled)
            .field("tls_force_v12", &self.tls_force_v12)
            .finish()
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod tests;
