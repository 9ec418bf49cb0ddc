//! Provider identity and configuration value objects

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PROVIDER_PRIORITY, DEFAULT_PROVIDER_TIMEOUT_SECS};
use crate::error::Error;

/// Backend implementation selected for a provider
///
/// The configured kind picks the adapter factory at load time; nothing is
/// detected from which client libraries happen to be compiled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Anthropic Messages API
    Anthropic,
    /// OpenAI (or OpenAI-compatible) chat completions API
    #[serde(rename = "openai")]
    OpenAi,
    /// Locally hosted Ollama daemon
    Ollama,
    /// Scripted in-process backend
    Mock,
}

/// Coarse classification of a backend kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendClass {
    /// Remote, credentialed API
    CloudApi,
    /// Model served by a daemon on the local network
    LocalDaemon,
    /// No real backend
    Mock,
}

impl BackendKind {
    /// All known backend kinds
    pub const ALL: [BackendKind; 4] = [Self::Anthropic, Self::OpenAi, Self::Ollama, Self::Mock];

    /// Configuration name of this kind
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }

    /// Classification of this kind
    pub fn class(self) -> BackendClass {
        match self {
            Self::Anthropic | Self::OpenAi => BackendClass::CloudApi,
            Self::Ollama => BackendClass::LocalDaemon,
            Self::Mock => BackendClass::Mock,
        }
    }

    /// Whether a provider of this kind cannot work without a credential
    pub fn requires_credential(self) -> bool {
        self.class() == BackendClass::CloudApi
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "openai" | "open_ai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "mock" => Ok(Self::Mock),
            other => Err(Error::configuration(format!(
                "Unrecognized backend kind '{other}'. Use anthropic, openai, ollama, or mock"
            ))),
        }
    }
}

/// Who a provider is: unique name, backend kind and model
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// Unique provider name
    pub name: String,
    /// Backend implementation
    pub backend_kind: BackendKind,
    /// Model identifier passed to the backend
    pub model_id: String,
}

impl ProviderIdentity {
    pub fn new(name: impl Into<String>, backend_kind: BackendKind, model_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            backend_kind,
            model_id: model_id.into(),
        }
    }
}

/// A resolved secret, passed through to adapters unmodified
///
/// `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// The raw secret
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

/// Validated configuration of one provider
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    /// Name, backend kind and model
    pub identity: ProviderIdentity,
    /// Base URL override; adapters fall back to their public default
    pub endpoint: Option<String>,
    /// Where the credential came from (e.g. `env:ANTHROPIC_API_KEY`)
    pub credential_ref: Option<String>,
    /// The resolved credential
    pub credential: Option<Credential>,
    /// Per-call timeout
    pub timeout: Duration,
    /// Configured priority rank (lower is preferred)
    pub priority: u32,
    /// Optional providers are dropped instead of failing startup when incomplete
    pub optional: bool,
}

impl ProviderConfig {
    /// Create a config with default timeout and priority
    pub fn new(name: impl Into<String>, backend_kind: BackendKind, model_id: impl Into<String>) -> Self {
        Self {
            identity: ProviderIdentity::new(name, backend_kind, model_id),
            endpoint: None,
            credential_ref: None,
            credential: None,
            timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
            priority: DEFAULT_PROVIDER_PRIORITY,
            optional: false,
        }
    }

    /// Provider name
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Backend kind
    pub fn backend_kind(&self) -> BackendKind {
        self.identity.backend_kind
    }

    /// Set the endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the resolved credential
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Set the per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the priority rank
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    /// Mark the provider optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}
