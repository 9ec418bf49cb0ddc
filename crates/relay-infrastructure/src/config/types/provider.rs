//! Provider block configuration types

use serde::{Deserialize, Serialize};

/// One `[[providers]]` block as written by the operator
///
/// Everything except `name` may be absent here; completeness is checked by
/// [`validate_providers`](crate::config::validate_providers) so that optional
/// providers can be dropped instead of failing the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderDefinition {
    /// Unique provider name
    pub name: String,

    /// Backend kind (`anthropic`, `openai`, `ollama`, `mock`)
    pub backend_kind: Option<String>,

    /// Model identifier passed to the backend
    pub model_id: Option<String>,

    /// Credential reference (`env:NAME`, `file:/path` or a bare variable name)
    pub credential_ref: Option<String>,

    /// Base URL override
    pub endpoint: Option<String>,

    /// Per-call timeout in seconds
    pub timeout_secs: Option<u64>,

    /// Priority rank (lower is preferred)
    pub priority: Option<u32>,

    /// Drop this provider with a warning instead of failing startup when it is incomplete
    pub optional: bool,
}

impl ProviderDefinition {
    /// Start a definition for `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_backend_kind(mut self, kind: impl Into<String>) -> Self {
        self.backend_kind = Some(kind.into());
        self
    }

    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn with_credential_ref(mut self, credential_ref: impl Into<String>) -> Self {
        self.credential_ref = Some(credential_ref.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}
