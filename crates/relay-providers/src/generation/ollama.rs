//! Ollama Generation Provider
//!
//! Talks to a locally hosted Ollama daemon through its chat API
//! (`POST /api/chat`, non-streaming).

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use relay_domain::error::ProviderError;
use relay_domain::ports::providers::{GenerationProvider, SharedGenerationProvider};
use relay_domain::value_objects::{
    BackendKind, GenerationOutput, ProviderConfig, ProviderIdentity, TokenUsage,
};

use crate::constants::{CONTENT_TYPE_JSON, OLLAMA_DEFAULT_ENDPOINT};
use crate::http::{HttpClientConfig, build_client};
use crate::registry::{GENERATION_PROVIDERS, ProviderEntry};
use crate::utils::{HttpResponseUtils, run_before};

/// Ollama chat adapter
///
/// ## Example
///
/// ```rust,no_run
/// use relay_domain::{BackendKind, ProviderIdentity};
/// use relay_providers::generation::OllamaProvider;
/// use reqwest::Client;
///
/// let provider = OllamaProvider::new(
///     ProviderIdentity::new("local", BackendKind::Ollama, "llama3.1"),
///     Some("http://localhost:11434".to_string()),
///     Client::new(),
/// );
/// ```
pub struct OllamaProvider {
    identity: ProviderIdentity,
    base_url: String,
    http_client: Client,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    pub fn new(identity: ProviderIdentity, base_url: Option<String>, http_client: Client) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| OLLAMA_DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            identity,
            base_url,
            http_client,
        }
    }

    /// Base URL of the daemon
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request_body(&self, prompt: &str, system_prompt: Option<&str>) -> serde_json::Value {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system_prompt {
            messages.push(serde_json::json!({"role": "system", "content": system}));
        }
        messages.push(serde_json::json!({"role": "user", "content": prompt}));
        serde_json::json!({
            "model": self.identity.model_id,
            "messages": messages,
            "stream": false,
        })
    }
}

#[async_trait]
impl GenerationProvider for OllamaProvider {
    fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        deadline: Instant,
    ) -> Result<GenerationOutput, ProviderError> {
        let body = self.request_body(prompt, system_prompt);
        run_before(deadline, "Ollama", async {
            let response = self
                .http_client
                .post(format!("{}/api/chat", self.base_url))
                .header("Content-Type", CONTENT_TYPE_JSON)
                .json(&body)
                .send()
                .await
                .map_err(|e| HttpResponseUtils::transport_error("Ollama", &e))?;

            let parsed: ChatResponse = HttpResponseUtils::check_and_parse(response, "Ollama").await?;
            let mut output = GenerationOutput::new(parsed.message.content);
            if let (Some(input), Some(generated)) = (parsed.prompt_eval_count, parsed.eval_count) {
                output = output.with_usage(TokenUsage::new(input, generated));
            }
            Ok(output)
        })
        .await
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

fn ollama_factory(config: &ProviderConfig) -> Result<SharedGenerationProvider, String> {
    let http_client = build_client(&HttpClientConfig::default())?;

    Ok(Arc::new(OllamaProvider::new(
        config.identity.clone(),
        config.endpoint.clone(),
        http_client,
    )))
}

#[linkme::distributed_slice(GENERATION_PROVIDERS)]
static OLLAMA_PROVIDER: ProviderEntry = ProviderEntry {
    kind: BackendKind::Ollama,
    description: "Ollama local daemon (llama, mistral, qwen, etc.)",
    factory: ollama_factory,
};
