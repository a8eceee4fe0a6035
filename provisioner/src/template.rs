//! Placeholder substitution for the client configuration templates.
//!
//! Templates are plain text with `{name}` placeholders. A doubled brace
//! (`{{` or `}}`) stands for a literal brace. Placeholders take no format
//! spec or conversion, so `{name:>5}` and `{name!r}` are rejected.
//! Everything else is copied through untouched; the provisioner knows
//! nothing about the client's configuration syntax.

use crate::error::{ContractViolation, ProvisionError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

/// Named values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateValues(BTreeMap<&'static str, String>);

impl TemplateValues {
    /// Create an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a value, returning the mapping for chaining.
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.0.insert(name, value.into());
        self
    }

    /// Look up a value by placeholder name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Iterate over placeholder names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }
}

/// Substitute `values` into `text`.
///
/// `template` only labels errors.
///
/// # Errors
///
/// Returns [`ContractViolation::MissingPlaceholder`] when the text names a
/// placeholder with no value, [`ContractViolation::UnsupportedFormatSpec`]
/// when a placeholder carries a `:` format spec or `!` conversion, and
/// [`ContractViolation::MalformedTemplate`] for an unpaired brace.
///
/// # Examples
///
/// ```
/// use tsm_client_provisioner::template::{TemplateValues, render};
///
/// let values = TemplateValues::new().with("tsm_server_name", "backup");
/// let text = render("dsm.opt", "SErvername {tsm_server_name} {{x}}", &values)?;
/// assert_eq!(text, "SErvername backup {x}");
/// # Ok::<(), tsm_client_provisioner::error::ContractViolation>(())
/// ```
pub fn render(
    template: &str,
    text: &str,
    values: &TemplateValues,
) -> std::result::Result<String, ContractViolation> {
    let malformed = |brace, offset| ContractViolation::MalformedTemplate {
        template: template.to_owned(),
        brace,
        offset,
    };

    let mut rendered = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();
    while let Some((offset, ch)) = chars.next() {
        match ch {
            '{' if chars.next_if(|&(_, next)| next == '{').is_some() => rendered.push('{'),
            '}' if chars.next_if(|&(_, next)| next == '}').is_some() => rendered.push('}'),
            '}' => return Err(malformed('}', offset)),
            '{' => {
                let start = offset + 1;
                let mut end = None;
                for (index, inner) in chars.by_ref() {
                    match inner {
                        '}' => {
                            end = Some(index);
                            break;
                        }
                        '{' => return Err(malformed('{', offset)),
                        _ => {}
                    }
                }
                let Some(end) = end else {
                    return Err(malformed('{', offset));
                };
                let name = text.get(start..end).unwrap_or_default();
                if let Some((placeholder, spec)) = name
                    .find([':', '!'])
                    .and_then(|split| name.split_at_checked(split))
                {
                    return Err(ContractViolation::UnsupportedFormatSpec {
                        template: template.to_owned(),
                        placeholder: placeholder.to_owned(),
                        spec: spec.to_owned(),
                    });
                }
                let value = values
                    .get(name)
                    .ok_or_else(|| ContractViolation::MissingPlaceholder {
                        template: template.to_owned(),
                        placeholder: name.to_owned(),
                    })?;
                rendered.push_str(value);
            }
            other => rendered.push(other),
        }
    }
    Ok(rendered)
}

/// Template text loaded from disk, kept for the lifetime of the run.
///
/// Each path is read at most once. Entries are never invalidated, so edits
/// to a template after its first use are not picked up.
#[derive(Debug, Default)]
pub struct TemplateCache {
    loaded: HashMap<Utf8PathBuf, String>,
}

impl TemplateCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the text of the template at `path`, reading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::TemplateRead`] if the file cannot be read.
    pub fn load(&mut self, path: &Utf8Path) -> Result<&str> {
        let text = match self.loaded.entry(path.to_path_buf()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                debug!("loading template {path}");
                let text =
                    std::fs::read_to_string(path).map_err(|source| ProvisionError::TemplateRead {
                        path: path.to_path_buf(),
                        source,
                    })?;
                entry.insert(text)
            }
        };
        Ok(text)
    }

    /// Render the template at `path` with `values`.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::TemplateRead`] if the template cannot be
    /// read, or a [`ContractViolation`] if substitution fails.
    pub fn render(&mut self, path: &Utf8Path, values: &TemplateValues) -> Result<String> {
        let label = path.file_name().unwrap_or(path.as_str()).to_owned();
        let text = self.load(path)?;
        Ok(render(&label, text, values)?)
    }

    /// Number of templates read so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    /// Whether no template has been read yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
