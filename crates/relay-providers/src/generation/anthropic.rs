//! Anthropic Generation Provider
//!
//! Implements the `GenerationProvider` port on top of the Anthropic Messages
//! API (`POST /v1/messages`).

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

use crate::constants::{
    ANTHROPIC_API_VERSION, ANTHROPIC_DEFAULT_ENDPOINT, ANTHROPIC_MAX_TOKENS, CONTENT_TYPE_JSON,
};
use crate::http::{HttpClientConfig, build_client};
use crate::registry::{GENERATION_PROVIDERS, ProviderEntry};
use crate::utils::{HttpResponseUtils, run_before};

/// Anthropic Messages API adapter
///
/// Receives its HTTP client via constructor injection.
pub struct AnthropicProvider {
    identity: ProviderIdentity,
    base_url: String,
    api_key: Credential,
    http_client: Client,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    usage: Option<MessagesUsage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct MessagesUsage {
    input_tokens: u64,
    output_tokens: u64,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    ///
    /// `base_url` defaults to the public API when `None`.
    pub fn new(
        identity: ProviderIdentity,
        base_url: Option<String>,
        api_key: Credential,
        http_client: Client,
    ) -> Self {
        let base_url = base_url
            .unwrap_or_else(|| ANTHROPIC_DEFAULT_ENDPOINT.to_string())
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
        let mut body = serde_json::json!({
            "model": self.identity.model_id,
            "max_tokens": ANTHROPIC_MAX_TOKENS,
            "messages": [{"role": "user", "content": prompt}],
        });
        if let Some(system) = system_prompt {
            body["system"] = serde_json::Value::String(system.to_string());
        }
        body
    }

    fn into_output(response: MessagesResponse) -> Result<GenerationOutput, ProviderError> {
        let text: String = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        if text.is_empty() {
            return Err(ProviderError::malformed_response(
                "Anthropic response contained no text content",
            ));
        }
        let mut output = GenerationOutput::new(text);
        if let Some(usage) = response.usage {
            output = output.with_usage(TokenUsage::new(usage.input_tokens, usage.output_tokens));
        }
        Ok(output)
    }
}

#[async_trait]
impl GenerationProvider for AnthropicProvider {
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
        run_before(deadline, "Anthropic", async {
            let response = self
                .http_client
                .post(format!("{}/v1/messages", self.base_url))
                .header("Content-Type", CONTENT_TYPE_JSON)
                .header("x-api-key", self.api_key.expose())
                .header("anthropic-version", ANTHROPIC_API_VERSION)
                .json(&body)
                .send()
                .await
                .map_err(|e| HttpResponseUtils::transport_error("Anthropic", &e))?;

            let parsed: MessagesResponse =
                HttpResponseUtils::check_and_parse(response, "Anthropic").await?;
            Self::into_output(parsed)
        })
        .await
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

fn anthropic_factory(config: &ProviderConfig) -> Result<SharedGenerationProvider, String> {
    let api_key = config
        .credential
        .clone()
        .ok_or_else(|| "Anthropic requires a credential".to_string())?;
    let http_client = build_client(&HttpClientConfig::default())?;

    Ok(Arc::new(AnthropicProvider::new(
        config.identity.clone(),
        config.endpoint.clone(),
        api_key,
        http_client,
    )))
}

#[linkme::distributed_slice(GENERATION_PROVIDERS)]
static ANTHROPIC_PROVIDER: ProviderEntry = ProviderEntry {
    kind: BackendKind::Anthropic,
    description: "Anthropic Messages API (Claude models)",
    factory: anthropic_factory,
};
