//! Unit tests for the failover router
//!
//! Covers candidate ordering by health, fallback on failure, exhaustion,
//! deadline handling and the per-request override.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use relay_domain::error::{ProviderError, ProviderErrorKind, RoutingError};
use relay_domain::events::RoutingEvent;
use relay_domain::ports::providers::SharedGenerationProvider;
use relay_domain::value_objects::{GenerationRequest, HealthStatus};
use relay_infrastructure::routing::{RoutedProvider, Router};
use relay_providers::generation::MockProvider;

use crate::support::{fixture, fixture_with, mock_config};

fn request(prompt: &str) -> GenerationRequest {
    GenerationRequest::new(prompt).with_timeout(Duration::from_secs(5))
}

// =============================================================================
// Happy path and fallback
// =============================================================================

/// A healthy primary answers without touching the fallbacks
#[tokio::test]
async fn test_healthy_primary_answers() {
    let fx = fixture(&["p1", "p2", "p3"]);
    fx.mock("p1").push_reply("from p1");

    let response = fx.router.generate(request("hello")).await.unwrap();

    assert_eq!(response.content, "from p1");
    assert_eq!(response.provider.name, "p1");
    assert_eq!(response.fallback_chain_used, vec!["p1"]);
    assert_eq!(fx.mock("p2").calls(), 0);
    assert_eq!(fx.health.status("p1"), Some(HealthStatus::Healthy));
}

/// A failing primary falls through to the next candidate
#[tokio::test]
async fn test_failure_falls_back_to_next_provider() {
    let fx = fixture(&["p1", "p2", "p3"]);
    fx.mock("p1").push_failure(ProviderError::unavailable("connection refused"));
    fx.mock("p2").push_reply("from p2");

    let response = fx.router.generate(request("hello")).await.unwrap();

    assert_eq!(response.provider.name, "p2");
    assert_eq!(response.fallback_chain_used, vec!["p1", "p2"]);
    assert_eq!(fx.mock("p3").calls(), 0);
    assert_eq!(fx.health.status("p1"), Some(HealthStatus::Degraded));
    assert_eq!(fx.health.status("p2"), Some(HealthStatus::Healthy));
    assert_eq!(fx.health.status("p3"), Some(HealthStatus::Unknown));
}

/// Two timeouts then a success: the third provider answers
#[tokio::test]
async fn test_third_provider_answers_after_two_timeouts() {
    let fx = fixture(&["p1", "p2", "p3"]);
    fx.mock("p1").push_failure(ProviderError::timeout("slow"));
    fx.mock("p2").push_failure(ProviderError::timeout("slow"));

    let response = fx.router.generate(request("hello")).await.unwrap();

    assert_eq!(response.provider.name, "p3");
    assert_eq!(response.fallback_chain_used, vec!["p1", "p2", "p3"]);
    assert_eq!(fx.health.get("p1").unwrap().consecutive_failures, 1);
    assert_eq!(fx.health.get("p2").unwrap().consecutive_failures, 1);
    assert_eq!(fx.health.status("p3"), Some(HealthStatus::Healthy));
}

/// Every candidate failing yields one aggregate listing each failure
#[tokio::test]
async fn test_all_failures_are_aggregated() {
    let fx = fixture(&["p1", "p2"]);
    fx.mock("p1").push_failure(ProviderError::rate_limited("429"));
    fx.mock("p2").push_failure(ProviderError::rate_limited("429"));

    let error = fx.router.generate(request("hello")).await.unwrap_err();
    let aggregate = error.aggregate().expect("exhausted");

    assert_eq!(aggregate.providers(), vec!["p1", "p2"]);
    assert!(aggregate.all_failed_with(ProviderErrorKind::RateLimited));
    assert!(!aggregate.deadline_exceeded);
    assert_eq!(fx.health.status("p1"), Some(HealthStatus::Degraded));
    assert_eq!(fx.health.status("p2"), Some(HealthStatus::Degraded));
}

/// Mixed failure kinds are kept per provider
#[tokio::test]
async fn test_aggregate_keeps_each_kind() {
    let fx = fixture(&["p1", "p2", "p3"]);
    fx.mock("p1").push_failure(ProviderError::auth_failure("401"));
    fx.mock("p2").push_failure(ProviderError::malformed_response("not json"));
    fx.mock("p3").push_failure(ProviderError::unavailable("503"));

    let error = fx.router.generate(request("hello")).await.unwrap_err();
    let aggregate = error.aggregate().expect("exhausted");

    assert_eq!(
        aggregate.kinds(),
        vec![
            ProviderErrorKind::AuthFailure,
            ProviderErrorKind::MalformedResponse,
            ProviderErrorKind::Unavailable
        ]
    );
    assert!(!aggregate.all_failed_with(ProviderErrorKind::Unavailable));
}

// =============================================================================
// Health-aware ordering
// =============================================================================

/// An unhealthy primary is tried after healthier providers
#[tokio::test]
async fn test_unhealthy_primary_is_skipped_first() {
    let fx = fixture(&["p1", "p2"]);
    fx.make_unhealthy("p1");

    let response = fx.router.generate(request("hello")).await.unwrap();

    assert_eq!(response.provider.name, "p2");
    assert_eq!(response.fallback_chain_used, vec!["p2"]);
    assert_eq!(fx.mock("p1").calls(), 0);
}

/// Unhealthy providers are still attempted as a last resort
#[tokio::test]
async fn test_unhealthy_provider_is_last_resort() {
    let fx = fixture(&["p1", "p2"]);
    fx.make_unhealthy("p1");
    fx.mock("p2").push_failure(ProviderError::unavailable("503"));
    fx.mock("p1").push_reply("recovered");

    let response = fx.router.generate(request("hello")).await.unwrap();

    assert_eq!(response.fallback_chain_used, vec!["p2", "p1"]);
    assert_eq!(response.content, "recovered");
    assert_eq!(fx.health.status("p1"), Some(HealthStatus::Healthy));
}

/// Degraded providers come after healthy ones but before unknown ones
#[tokio::test]
async fn test_candidates_follow_health_class_then_priority() {
    let fx = fixture(&["p1", "p2", "p3", "p4"]);
    fx.health.record_failure("p1", &ProviderError::timeout("slow"));
    fx.health.record_success("p3", Duration::from_millis(5));
    fx.make_unhealthy("p2");
    for name in ["p1", "p2", "p3", "p4"] {
        fx.mock(name).set_failing(Some(ProviderError::unavailable("down")));
    }

    let error = fx.router.generate(request("hello")).await.unwrap_err();

    assert_eq!(
        error.aggregate().expect("exhausted").providers(),
        vec!["p3", "p1", "p4", "p2"]
    );
}

// =============================================================================
// Deadlines
// =============================================================================

/// A provider that exceeds its own timeout is recorded as a timeout
#[tokio::test]
async fn test_per_provider_timeout_falls_back() {
    let mut fx = fixture_with(vec![
        mock_config("p1", 1).with_timeout(Duration::from_millis(50)),
        mock_config("p2", 2),
    ]);
    fx.mock("p1").push_hang();
    fx.mock("p2").push_reply("from p2");

    let response = fx.router.generate(request("hello")).await.unwrap();

    assert_eq!(response.fallback_chain_used, vec!["p1", "p2"]);
    let record = fx.health.get("p1").unwrap();
    assert_eq!(
        record.last_error.map(|e| e.kind),
        Some(ProviderErrorKind::Timeout)
    );

    let failed: Vec<_> = fx
        .drain_events()
        .into_iter()
        .filter_map(|event| match event {
            RoutingEvent::AttemptFailed { provider, kind, .. } => Some((provider, kind)),
            _ => None,
        })
        .collect();
    assert_eq!(failed, vec![("p1".to_string(), ProviderErrorKind::Timeout)]);
}

/// A provider timeout far beyond any clock range is capped, not overflowed
#[tokio::test]
async fn test_oversized_provider_timeout_still_routes() {
    let fx = fixture_with(vec![mock_config("p1", 1).with_timeout(Duration::MAX)]);
    fx.mock("p1").push_reply("from p1");

    let response = fx.router.generate(GenerationRequest::new("hi")).await.unwrap();

    assert_eq!(response.content, "from p1");
    assert_eq!(fx.health.status("p1"), Some(HealthStatus::Healthy));
}

/// Once the request deadline passes, no further candidate is attempted
#[tokio::test]
async fn test_deadline_stops_the_chain() {
    let fx = fixture(&["p1", "p2"]);
    fx.mock("p1").push_hang();
    fx.mock("p2").push_reply("too late");

    let request = GenerationRequest::new("hello").with_timeout(Duration::from_millis(100));
    let error = fx.router.generate(request).await.unwrap_err();
    let aggregate = error.aggregate().expect("exhausted");

    assert!(aggregate.deadline_exceeded);
    assert_eq!(aggregate.providers(), vec!["p1"]);
    assert!(aggregate.all_failed_with(ProviderErrorKind::Timeout));
    assert_eq!(fx.mock("p2").calls(), 0);
}

/// An already expired request makes no attempt at all
#[tokio::test]
async fn test_expired_request_makes_no_attempt() {
    let mut fx = fixture(&["p1"]);

    let request = GenerationRequest::new("hello").with_timeout(Duration::ZERO);
    let error = fx.router.generate(request).await.unwrap_err();
    let aggregate = error.aggregate().expect("exhausted");

    assert!(aggregate.is_empty());
    assert!(aggregate.deadline_exceeded);
    assert_eq!(fx.mock("p1").calls(), 0);
    assert_eq!(fx.health.status("p1"), Some(HealthStatus::Unknown));

    let names: Vec<_> = fx.drain_events().iter().map(RoutingEvent::name).collect();
    assert_eq!(names, vec!["request_exhausted"]);
}

// =============================================================================
// Override
// =============================================================================

/// The override is tried first regardless of its health
#[tokio::test]
async fn test_override_goes_first_even_when_unhealthy() {
    let fx = fixture(&["p1", "p2"]);
    fx.make_unhealthy("p2");

    let response = fx
        .router
        .generate(request("hello").with_provider_override("p2"))
        .await
        .unwrap();

    assert_eq!(response.fallback_chain_used, vec!["p2"]);
    assert_eq!(fx.health.status("p2"), Some(HealthStatus::Healthy));
}

/// A failing override still falls back to the remaining candidates
#[tokio::test]
async fn test_failed_override_falls_back() {
    let fx = fixture(&["p1", "p2"]);
    fx.mock("p2").push_failure(ProviderError::unavailable("down"));

    let response = fx
        .router
        .generate(request("hello").with_provider_override("p2"))
        .await
        .unwrap();

    assert_eq!(response.fallback_chain_used, vec!["p2", "p1"]);
}

/// An override naming no configured provider is rejected up front
#[tokio::test]
async fn test_unknown_override_is_rejected() {
    let fx = fixture(&["p1"]);

    let error = fx
        .router
        .generate(request("hello").with_provider_override("nope"))
        .await
        .unwrap_err();

    assert!(matches!(error, RoutingError::UnknownProvider { ref name } if name == "nope"));
    assert_eq!(fx.mock("p1").calls(), 0);
}

// =============================================================================
// Events and priority management
// =============================================================================

/// Attempts and the final outcome are reported in order
#[tokio::test]
async fn test_fallback_emits_attempt_events() {
    let mut fx = fixture(&["p1", "p2"]);
    fx.mock("p1").push_failure(ProviderError::unavailable("down"));

    fx.router.generate(request("hello")).await.unwrap();

    let attempts: Vec<_> = fx
        .drain_events()
        .into_iter()
        .filter(|event| !matches!(event, RoutingEvent::HealthTransition { .. }))
        .map(|event| (event.name(), event.provider().map(str::to_string)))
        .collect();
    assert_eq!(
        attempts,
        vec![
            ("attempt_started", Some("p1".to_string())),
            ("attempt_failed", Some("p1".to_string())),
            ("attempt_started", Some("p2".to_string())),
            ("request_succeeded", Some("p2".to_string())),
        ]
    );
}

/// Priority changes reorder equally healthy providers
#[tokio::test]
async fn test_set_primary_and_fallback() {
    let mut fx = fixture(&["p1", "p2", "p3"]);

    fx.router.set_primary_provider("p3").unwrap();
    assert_eq!(fx.router.priority_order(), vec!["p3", "p1", "p2"]);

    fx.router.add_fallback_provider("p1").unwrap();
    assert_eq!(fx.router.priority_order(), vec!["p3", "p2", "p1"]);

    assert!(fx.router.set_primary_provider("ghost").is_err());

    let changes = fx
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, RoutingEvent::PriorityChanged { .. }))
        .count();
    assert_eq!(changes, 2);

    let response = fx.router.generate(request("hello")).await.unwrap();
    assert_eq!(response.provider.name, "p3");
}

/// The summary reports every provider
#[tokio::test]
async fn test_health_summary_covers_all_providers() {
    let fx = fixture(&["p1", "p2"]);
    fx.mock("p1").push_failure(ProviderError::unavailable("down"));
    fx.router.generate(request("hello")).await.unwrap();

    let summary = fx.router.get_health_summary();

    assert_eq!(summary.len(), 2);
    assert_eq!(summary["p1"].status, HealthStatus::Degraded);
    assert_eq!(summary["p1"].consecutive_failures, 1);
    assert!(summary["p1"].last_error.as_deref().unwrap().contains("down"));
    assert_eq!(summary["p2"].status, HealthStatus::Healthy);
    assert!(summary["p2"].last_check_age.is_some());
}

// =============================================================================
// Construction and concurrency
// =============================================================================

/// Empty lists, duplicate names and misnamed adapters are rejected
#[test]
fn test_router_rejects_bad_provider_lists() {
    let fx = fixture(&["p1"]);
    let health = Arc::clone(&fx.health);

    let empty = Router::new(Vec::new(), Arc::clone(&health), Arc::clone(&fx.sink));
    assert!(empty.unwrap_err().is_configuration());

    let adapter: SharedGenerationProvider = Arc::clone(fx.mock("p1")) as _;
    let duplicated = Router::new(
        vec![
            RoutedProvider::new(mock_config("p1", 1), Arc::clone(&adapter)),
            RoutedProvider::new(mock_config("p1", 2), adapter),
        ],
        Arc::clone(&health),
        Arc::clone(&fx.sink),
    );
    assert!(duplicated.unwrap_err().is_configuration());

    let misnamed: SharedGenerationProvider =
        Arc::new(MockProvider::with_identity(mock_config("other", 1).identity));
    let mismatch = Router::new(
        vec![RoutedProvider::new(mock_config("p1", 1), misnamed)],
        health,
        Arc::clone(&fx.sink),
    );
    let error = mismatch.unwrap_err();
    assert!(error.is_configuration());
    assert!(error.to_string().contains("other"));
}

/// Concurrent requests keep health bookkeeping consistent
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_health() {
    let fx = fixture(&["p1", "p2"]);
    fx.mock("p1").set_failing(Some(ProviderError::unavailable("down")));

    let results = join_all((0..32).map(|i| fx.router.generate(request(&format!("req {i}"))))).await;

    assert!(results.iter().all(Result::is_ok));
    let p1 = fx.health.get("p1").unwrap();
    assert_eq!(p1.total_checks, fx.mock("p1").calls() as u64);
    assert_eq!(p1.total_failures, p1.total_checks);
    assert_ne!(p1.status, HealthStatus::Healthy);

    let p2 = fx.health.get("p2").unwrap();
    assert_eq!(p2.total_checks, 32);
    assert_eq!(p2.status, HealthStatus::Healthy);
}
