//! OpenAI Generation Provider
//!
//! Implements the `GenerationProvider` port using the chat completions API
//! (`POST /v1/chat/completions`). Any OpenAI-compatible gateway works by
//! pointing `endpoint` at it.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use relay_domain::error::ProviderError;
use relay_domain::ports::providers::{GenerationProvider, SharedGenerationProvider};
use relay_domain::value_objects::{
    BackendKind, Credential, GenerationOutput, ProviderConfig, ProviderIdentity, TokenUsage,
};

use crate::constants::{CONTENT_TYPE_JSON, OPENAI_DEFAULT_ENDPOINT};
use crate::http::{HttpClientConfig, build_client};
use crate::registry::{GENERATION_PROVIDERS, ProviderEntry};
use crate::utils::{HttpResponseUtils, run_before};

/// OpenAI chat completions adapter
pub struct OpenAiProvider {
    identity: ProviderIdentity,
    base_url: String,
    api_key: Credential,
    http_client: Client,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider
    ///
    /// # Arguments
    /// * `identity` - Provider name, kind and model
    /// * `base_url` - Optional custom base URL (defaults to the OpenAI API)
    /// * `api_key` - Bearer token
    /// * `http_client` - Reqwest HTTP client for making API requests
    pub fn new(
        identity: ProviderIdentity,
        base_url: Option<String>,
        api_key: Credential,
        http_client: Client,
    ) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| OPENAI_DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        Self {
            identity,
            base_url,
            api_key,
            http_client,
        }
    }

    /// Base URL requests are sent to
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
        })
    }

    fn into_output(response: ChatResponse) -> Result<GenerationOutput, ProviderError> {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                ProviderError::malformed_response("OpenAI response contained no message content")
            })?;
        let mut output = GenerationOutput::new(content);
        if let Some(usage) = response.usage {
            output = output.with_usage(TokenUsage::new(usage.prompt_tokens, usage.completion_tokens));
        }
        Ok(output)
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
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
        run_before(deadline, "OpenAI", async {
            let response = self
                .http_client
                .post(format!("{}/v1/chat/completions", self.base_url))
                .header("Content-Type", CONTENT_TYPE_JSON)
                .bearer_auth(self.api_key.expose())
                .json(&body)
                .send()
                .await
                .map_err(|e| HttpResponseUtils::transport_error("OpenAI", &e))?;

            let parsed: ChatResponse = HttpResponseUtils::check_and_parse(response, "OpenAI").await?;
            Self::into_output(parsed)
        })
        .await
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

fn openai_factory(config: &ProviderConfig) -> Result<SharedGenerationProvider, String> {
    let api_key = config
        .credential
        .clone()
        .ok_or_else(|| "OpenAI requires a credential".to_string())?;
    let http_client = build_client(&HttpClientConfig::default())?;

    Ok(Arc::new(OpenAiProvider::new(
        config.identity.clone(),
        config.endpoint.clone(),
        api_key,
        http_client,
    )))
}

#[linkme::distributed_slice(GENERATION_PROVIDERS)]
static OPENAI_PROVIDER: ProviderEntry = ProviderEntry {
    kind: BackendKind::OpenAi,
    description: "OpenAI chat completions API (and compatible gateways)",
    factory: openai_factory,
};
