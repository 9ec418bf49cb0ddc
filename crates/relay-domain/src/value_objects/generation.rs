//! Generation request and response value objects

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{DEFAULT_REQUEST_DEADLINE_SECS, MAX_TIMEOUT_SECS};
use crate::value_objects::ProviderIdentity;

/// Token accounting reported by a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt
    pub input_tokens: u64,
    /// Tokens produced in the completion
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Prompt plus completion tokens
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// `timeout` after `start`, with `timeout` capped at [`MAX_TIMEOUT_SECS`]
pub fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    let timeout = timeout.min(Duration::from_secs(MAX_TIMEOUT_SECS));
    start.checked_add(timeout).unwrap_or(start)
}

/// One request to be resolved by the router
///
/// The deadline is an absolute instant; it bounds the whole fallback chain,
/// not a single attempt.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Correlates events and failures of this request
    pub request_id: Uuid,
    /// User prompt
    pub prompt: String,
    /// Optional system prompt
    pub system_prompt: Option<String>,
    /// Provider to try first regardless of its health
    pub provider_override: Option<String>,
    /// Point in time by which the request must complete
    pub deadline: Instant,
}

impl GenerationRequest {
    /// Create a request with the default deadline
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            prompt: prompt.into(),
            system_prompt: None,
            provider_override: None,
            deadline: deadline_after(
                Instant::now(),
                Duration::from_secs(DEFAULT_REQUEST_DEADLINE_SECS),
            ),
        }
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Try `provider` first
    pub fn with_provider_override(mut self, provider: impl Into<String>) -> Self {
        self.provider_override = Some(provider.into());
        self
    }

    /// Deadline `timeout` from now, capped like [`deadline_after`]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = deadline_after(Instant::now(), timeout);
        self
    }

    /// Absolute deadline
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = deadline;
        self
    }

    /// Time left before the deadline (zero once passed)
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Whether the deadline has passed
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.deadline
    }
}

/// What a single adapter call produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutput {
    /// Generated text
    pub content: String,
    /// Token usage, when the backend reports it
    pub usage: Option<TokenUsage>,
}

impl GenerationOutput {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            usage: None,
        }
    }

    /// Attach token usage
    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Successful result of a routed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Request this response answers
    pub request_id: Uuid,
    /// Generated text
    pub content: String,
    /// Provider that produced the text
    pub provider: ProviderIdentity,
    /// Duration of the successful attempt
    pub latency: Duration,
    /// Token usage, when reported
    pub usage: Option<TokenUsage>,
    /// Every provider attempted, ending with the one that succeeded
    pub fallback_chain_used: Vec<String>,
}
