//! Error types for provisioning.
//!
//! [`ContractViolation`] covers operator or packaging mistakes: a variable
//! the container must be started with is absent, or a template refers to a
//! value the provisioner does not supply. The remaining [`ProvisionError`]
//! variants are runtime I/O failures. All of them end the run with exit
//! status 1.

use camino::Utf8PathBuf;
use thiserror::Error;

/// The provisioner was started or packaged incorrectly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// A mandatory environment variable is unset.
    #[error("required environment variable {name} is not set")]
    MissingParameter {
        /// Name of the variable.
        name: &'static str,
    },

    /// A template placeholder has no value.
    #[error("template {template} uses placeholder {{{placeholder}}} which has no value")]
    MissingPlaceholder {
        /// The template being rendered.
        template: String,
        /// The unmatched placeholder name.
        placeholder: String,
    },

    /// A placeholder carries a conversion or format spec, which is not supported.
    #[error("template {template} applies '{spec}' to placeholder {{{placeholder}}}; format specs are not supported")]
    UnsupportedFormatSpec {
        /// The template being rendered.
        template: String,
        /// The placeholder name before the spec.
        placeholder: String,
        /// The spec, including its leading `:` or `!`.
        spec: String,
    },

    /// A template contains an unpaired brace.
    #[error("template {template} has an unmatched '{brace}' at byte {offset}")]
    MalformedTemplate {
        /// The template being rendered.
        template: String,
        /// The offending brace.
        brace: char,
        /// Byte offset of the brace in the template text.
        offset: usize,
    },
}

/// Errors that can occur while provisioning the client.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Parameters or templates break the provisioning contract.
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    /// A template file could not be read.
    #[error("could not read template {path}: {source}")]
    TemplateRead {
        /// The template path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A rendered configuration file could not be written.
    #[error("could not write {path}: {source}")]
    ConfigWrite {
        /// The destination path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Setting the client password failed and strict mode is on.
    #[error("could not set the client password: {reason}")]
    CredentialRejected {
        /// What `dsmc` reported.
        reason: String,
    },

    /// The readiness line could not be written.
    #[error("could not signal readiness: {0}")]
    Readiness(#[source] std::io::Error),
}

/// Result type alias using [`ProvisionError`].
pub type Result<T> = std::result::Result<T, ProvisionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_parameter_names_variable() {
        let err = ContractViolation::MissingParameter {
            name: "TSM_SERVER_NAME",
        };
        assert_eq!(
            err.to_string(),
            "required environment variable TSM_SERVER_NAME is not set"
        );
    }

    #[test]
    fn missing_placeholder_shows_braces() {
        let err = ContractViolation::MissingPlaceholder {
            template: "dsm.sys.template".to_owned(),
            placeholder: "tsm_node_name".to_owned(),
        };
        assert!(err.to_string().contains("{tsm_node_name}"));
    }

    #[test]
    fn contract_violations_are_transparent() {
        let violation = ContractViolation::MissingParameter {
            name: "TSM_PROXY_PASSWORD",
        };
        let err = ProvisionError::from(violation.clone());
        assert_eq!(err.to_string(), violation.to_string());
    }

    #[test]
    fn config_write_preserves_source() {
        let err = ProvisionError::ConfigWrite {
            path: Utf8PathBuf::from("/__issassist/data/dsm.sys"),
            source: std::io::Error::other("read-only file system"),
        };
        assert!(err.to_string().contains("dsm.sys"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
