//! Provider validation
//!
//! Turns raw `[[providers]]` blocks into validated [`ProviderConfig`]s. A
//! required provider with a problem aborts startup; an optional one is
//! dropped and reported.

use std::collections::HashSet;
use std::time::Duration;

use relay_domain::constants::{
    DEFAULT_PROVIDER_PRIORITY, DEFAULT_PROVIDER_TIMEOUT_SECS, MAX_TIMEOUT_SECS,
};
use relay_domain::error::{Error, Result};
use relay_domain::value_objects::{BackendKind, ProviderConfig};
use tracing::{debug, warn};

use super::credentials::CredentialResolver;
use super::types::ProviderDefinition;

/// An optional provider left out of the active set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedProvider {
    pub name: String,
    pub reason: String,
}

/// Outcome of provider validation
#[derive(Debug, Clone)]
pub struct ProviderSet {
    /// Usable providers, in declaration order
    pub configs: Vec<ProviderConfig>,
    /// Optional providers that were dropped
    pub dropped: Vec<DroppedProvider>,
}

/// Validate every provider block
///
/// Fails with a configuration error when a required provider is incomplete
/// or when no provider survives validation.
pub fn validate_providers(
    definitions: &[ProviderDefinition],
    resolver: &CredentialResolver,
) -> Result<ProviderSet> {
    let mut configs: Vec<ProviderConfig> = Vec::with_capacity(definitions.len());
    let mut dropped = Vec::new();
    let mut seen = HashSet::new();

    for definition in definitions {
        let outcome = if seen.contains(definition.name.trim()) {
            Err("duplicate provider name".to_string())
        } else {
            build_config(definition, resolver)
        };

        match outcome {
            Ok(config) => {
                debug!(
                    provider = config.name(),
                    backend = %config.backend_kind(),
                    model = %config.identity.model_id,
                    "Provider validated"
                );
                seen.insert(config.name().to_string());
                configs.push(config);
            }
            Err(reason) if definition.optional => {
                warn!(provider = %definition.name, %reason, "Dropping optional provider");
                dropped.push(DroppedProvider {
                    name: definition.name.clone(),
                    reason,
                });
            }
            Err(reason) => {
                return Err(Error::configuration(format!(
                    "Provider '{}': {reason}",
                    definition.name
                )));
            }
        }
    }

    if configs.is_empty() {
        return Err(Error::configuration(
            "No usable providers configured; at least one [[providers]] block must be valid",
        ));
    }

    Ok(ProviderSet { configs, dropped })
}

fn build_config(
    definition: &ProviderDefinition,
    resolver: &CredentialResolver,
) -> std::result::Result<ProviderConfig, String> {
    let name = definition.name.trim();
    if name.is_empty() {
        return Err("name is empty".to_string());
    }

    let kind: BackendKind = definition
        .backend_kind
        .as_deref()
        .ok_or_else(|| "backend_kind is missing".to_string())?
        .parse()
        .map_err(|e: Error| e.to_string())?;

    let model_id = definition
        .model_id
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or_else(|| "model_id is missing".to_string())?;

    let timeout_secs = definition
        .timeout_secs
        .unwrap_or(DEFAULT_PROVIDER_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err("timeout_secs cannot be 0".to_string());
    }
    if timeout_secs > MAX_TIMEOUT_SECS {
        return Err(format!("timeout_secs cannot exceed {MAX_TIMEOUT_SECS}"));
    }

    let mut config = ProviderConfig::new(name, kind, model_id)
        .with_timeout(Duration::from_secs(timeout_secs))
        .with_priority(definition.priority.unwrap_or(DEFAULT_PROVIDER_PRIORITY));
    config.optional = definition.optional;

    if let Some(endpoint) = definition.endpoint.as_deref().map(str::trim) {
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(format!("endpoint '{endpoint}' must be an http(s) URL"));
        }
        config = config.with_endpoint(endpoint);
    }

    match definition.credential_ref.as_deref() {
        Some(reference) => {
            let credential = resolver.resolve(reference).map_err(|e| e.to_string())?;
            config.credential_ref = Some(reference.to_string());
            config = config.with_credential(credential);
        }
        None if kind.requires_credential() => {
            return Err(format!("backend kind '{kind}' requires a credential_ref"));
        }
        None => {}
    }

    Ok(config)
}
