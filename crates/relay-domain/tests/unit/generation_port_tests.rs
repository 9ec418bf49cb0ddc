//! Default behavior of the generation port

use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use relay_domain::constants::PROBE_PROMPT;
use relay_domain::{
    BackendKind, GenerationOutput, GenerationProvider, ProviderError, ProviderIdentity,
};

struct RecordingProvider {
    identity: ProviderIdentity,
    prompts: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingProvider {
    fn new(fail: bool) -> Self {
        Self {
            identity: ProviderIdentity::new("rec", BackendKind::Mock, "m"),
            prompts: Mutex::new(Vec::new()),
            fail,
        }
    }
}

#[async_trait]
impl GenerationProvider for RecordingProvider {
    fn identity(&self) -> &ProviderIdentity {
        &self.identity
    }

    async fn generate(
        &self,
        prompt: &str,
        _system_prompt: Option<&str>,
        _deadline: Instant,
    ) -> Result<GenerationOutput, ProviderError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            Err(ProviderError::auth_failure("bad key"))
        } else {
            Ok(GenerationOutput::new("pong"))
        }
    }
}

#[tokio::test]
async fn test_ping_sends_probe_prompt() {
    let provider = RecordingProvider::new(false);
    provider
        .ping(Instant::now() + Duration::from_secs(1))
        .await
        .unwrap();
    assert_eq!(*provider.prompts.lock().unwrap(), vec![PROBE_PROMPT.to_string()]);
}

#[tokio::test]
async fn test_ping_propagates_error_kind() {
    let provider = RecordingProvider::new(true);
    let err = provider
        .ping(Instant::now() + Duration::from_secs(1))
        .await
        .unwrap_err();
    assert_eq!(err.kind, relay_domain::ProviderErrorKind::AuthFailure);
}
