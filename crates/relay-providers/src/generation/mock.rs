//! Scripted generation provider for testing and dry runs
//!
//! Outcomes are consumed from a queue in call order. Once the queue is empty
//! the provider falls back to its standing behavior: echo the prompt, or fail
//! with a fixed error when one is set through [`MockProvider::set_failing`].

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use relay_domain::error::ProviderError;
use relay_domain::ports::providers::{GenerationProvider, SharedGenerationProvider};
use relay_domain::value_objects::{BackendKind, GenerationOutput, ProviderConfig, ProviderIdentity};

use crate::registry::{GENERATION_PROVIDERS, ProviderEntry};
use crate::utils::run_before;

/// One scripted result
#[derive(Debug, Clone)]
pub enum MockOutcome {
    /// Answer with this text
    Reply(String),
    /// Fail with this error
    Fail(ProviderError),
    /// Never answer; only the deadline ends the call
    Hang,
}

#[derive(Debug)]
struct Step {
    delay: Duration,
    outcome: MockOutcome,
}

#[derive(Debug, Default)]
struct Script {
    steps: VecDeque<Step>,
    failing: Option<ProviderError>,
    latency: Duration,
}

/// Scripted provider
///
/// # Example
///
/// ```rust
/// use relay_domain::ProviderError;
/// use relay_providers::generation::MockProvider;
///
/// let provider = MockProvider::new("p1");
/// provider.push_failure(ProviderError::rate_limited("slow down"));
/// provider.push_reply("hello");
/// ```
#[derive(Debug)]
pub struct MockProvider {
    identity: ProviderIdentity,
    script: Mutex<Script>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockProvider {
    /// Create a mock provider with model `mock`
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_identity(ProviderIdentity::new(name, BackendKind::Mock, "mock"))
    }

    /// Create a mock provider with an explicit identity
    pub fn with_identity(identity: ProviderIdentity) -> Self {
        Self {
            identity,
            script: Mutex::new(Script::default()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn push_reply(&self, text: impl Into<String>) -> &Self {
        self.push(Duration::ZERO, MockOutcome::Reply(text.into()))
    }

    /// Queue a failure
    pub fn push_failure(&self, error: ProviderError) -> &Self {
        self.push(Duration::ZERO, MockOutcome::Fail(error))
    }

    /// Queue a call that never completes
    pub fn push_hang(&self) -> &Self {
        self.push(Duration::ZERO, MockOutcome::Hang)
    }

    /// Queue `outcome`, delivered after `delay`
    pub fn push(&self, delay: Duration, outcome: MockOutcome) -> &Self {
        self.lock_script().steps.push_back(Step { delay, outcome });
        self
    }

    /// Standing failure once the queue is empty; `None` restores echoing
    pub fn set_failing(&self, error: Option<ProviderError>) {
        self.lock_script().failing = error;
    }

    /// Delay applied to standing (unscripted) answers
    pub fn set_latency(&self, latency: Duration) {
        self.lock_script().latency = latency;
    }

    /// Number of calls received, pings included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, Script> {
        // A poisoned script only means a test panicked mid-update
        self.script
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn next_step(&self, prompt: &str) -> Step {
        let mut script = self.lock_script();
        if let Some(step) = script.steps.pop_front() {
            return step;
        }
        let outcome = match &script.failing {
            Some(error) => MockOutcome::Fail(error.clone()),
            None => MockOutcome::Reply(format!("{}: {prompt}", self.identity.name)),
        };
        Step {
            delay: script.latency,
            outcome,
        }
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    async fn generate(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
        deadline: Instant,
    ) -> Result<GenerationOutput, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let step = self.next_step(prompt);

        run_before(deadline, &self.identity.name, async move {
            if !step.delay.is_zero() {
                tokio::time::sleep(step.delay).await;
            }
            match step.outcome {
                MockOutcome::Reply(text) => Ok(GenerationOutput::new(text)),
                MockOutcome::Fail(error) => Err(error),
                MockOutcome::Hang => std::future::pending().await,
            }
        })
        .await
    }
}

// ============================================================================
// Auto-registration via linkme distributed slice
// ============================================================================

fn mock_factory(config: &ProviderConfig) -> Result<SharedGenerationProvider, String> {
    Ok(Arc::new(MockProvider::with_identity(config.identity.clone())))
}

#[linkme::distributed_slice(GENERATION_PROVIDERS)]
static MOCK_PROVIDER: ProviderEntry = ProviderEntry {
    kind: BackendKind::Mock,
    description: "Scripted in-process provider (echoes prompts when unscripted)",
    factory: mock_factory,
};
