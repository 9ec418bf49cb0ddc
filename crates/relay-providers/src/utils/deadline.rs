//! Deadline enforcement for adapter calls

use std::future::Future;
use std::time::Instant;

use relay_domain::error::ProviderError;

/// Drive `call` until it completes or `deadline` passes
///
/// On expiry the in-flight future is dropped, which cancels the underlying
/// request, and a `Timeout` error is returned.
pub async fn run_before<T, F>(deadline: Instant, provider: &str, call: F) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    match tokio::time::timeout_at(tokio::time::Instant::from_std(deadline), call).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::timeout(format!(
            "{provider} did not respond before the deadline"
        ))),
    }
}
