//! Credential resolution
//!
//! Provider blocks name their secret indirectly. A reference is one of:
//!
//! | Form | Source |
//! |------|--------|
//! | `env:NAME` | environment variable `NAME` |
//! | `file:/path` | contents of the file, trimmed |
//! | `NAME` | environment variable `NAME` |
//!
//! The resolved value is passed to the adapter unmodified and never logged.

use std::collections::HashMap;
use std::path::Path;

use relay_domain::error::{Error, Result};
use relay_domain::value_objects::Credential;

use crate::constants::{CREDENTIAL_ENV_PREFIX, CREDENTIAL_FILE_PREFIX};
use crate::error_ext::ErrorContext;

/// Resolves credential references
///
/// Reads the process environment unless built with [`CredentialResolver::with_vars`],
/// which pins the visible variables.
#[derive(Debug, Clone, Default)]
pub struct CredentialResolver {
    vars: Option<HashMap<String, String>>,
}

impl CredentialResolver {
    /// Resolver backed by the process environment
    pub fn from_env() -> Self {
        Self { vars: None }
    }

    /// Resolver that only sees `vars`
    pub fn with_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: Some(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect()),
        }
    }

    /// Resolve `reference` to a credential
    pub fn resolve(&self, reference: &str) -> Result<Credential> {
        let reference = reference.trim();
        if let Some(path) = reference.strip_prefix(CREDENTIAL_FILE_PREFIX) {
            return Self::read_file(Path::new(path.trim()));
        }
        let name = reference
            .strip_prefix(CREDENTIAL_ENV_PREFIX)
            .unwrap_or(reference)
            .trim();
        if name.is_empty() {
            return Err(Error::configuration("Credential reference is empty"));
        }
        match self.lookup(name) {
            Some(value) if !value.trim().is_empty() => Ok(Credential::new(value)),
            _ => Err(Error::configuration(format!(
                "Credential variable '{name}' is not set"
            ))),
        }
    }

    fn lookup(&self, name: &str) -> Option<String> {
        match &self.vars {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        }
    }

    fn read_file(path: &Path) -> Result<Credential> {
        let contents = std::fs::read_to_string(path)
            .config_context(format!("Failed to read credential file {}", path.display()))?;
        let secret = contents.trim();
        if secret.is_empty() {
            return Err(Error::configuration(format!(
                "Credential file {} is empty",
                path.display()
            )));
        }
        Ok(Credential::new(secret))
    }
}
