//! Unit tests for the background health monitor

use std::sync::Arc;
use std::time::Duration;

use relay_domain::error::{ProviderError, ProviderErrorKind};
use relay_domain::events::RoutingEvent;
use relay_domain::value_objects::HealthStatus;
use relay_infrastructure::routing::{HealthMonitor, ProbeSettings};
use tokio_util::sync::CancellationToken;

use crate::support::fixture;

fn settings(interval_ms: u64, timeout_ms: u64) -> ProbeSettings {
    ProbeSettings {
        interval: Duration::from_millis(interval_ms),
        timeout: Duration::from_millis(timeout_ms),
    }
}

/// One cycle pings every provider and records the outcomes
#[tokio::test]
async fn test_probe_once_records_outcomes() {
    let mut fx = fixture(&["p1", "p2"]);
    fx.mock("p1").set_failing(Some(ProviderError::auth_failure("401")));
    let monitor = HealthMonitor::new(
        Arc::clone(&fx.health),
        fx.router.adapters(),
        settings(1000, 500),
        Arc::clone(&fx.sink),
    );

    let report = monitor.probe_once().await;

    assert_eq!(report.probed, 2);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.healthy, 1);
    assert_eq!(fx.health.status("p1"), Some(HealthStatus::Degraded));
    assert_eq!(fx.health.status("p2"), Some(HealthStatus::Healthy));

    let completed = fx
        .drain_events()
        .into_iter()
        .any(|event| matches!(event, RoutingEvent::ProbeCycleCompleted { probed: 2, .. }));
    assert!(completed);
}

/// A probe timeout beyond the clock range is capped instead of overflowing
#[tokio::test]
async fn test_oversized_probe_timeout_still_probes() {
    let fx = fixture(&["p1"]);
    let monitor = HealthMonitor::new(
        Arc::clone(&fx.health),
        fx.router.adapters(),
        ProbeSettings {
            interval: Duration::from_secs(1),
            timeout: Duration::MAX,
        },
        Arc::clone(&fx.sink),
    );

    let report = monitor.probe_once().await;

    assert_eq!(report.succeeded, 1);
    assert_eq!(fx.health.status("p1"), Some(HealthStatus::Healthy));
}

/// Probes bring an unhealthy provider back without live traffic
#[tokio::test]
async fn test_probe_recovers_unhealthy_provider() {
    let fx = fixture(&["p1"]);
    fx.make_unhealthy("p1");
    let monitor = HealthMonitor::new(
        Arc::clone(&fx.health),
        fx.router.adapters(),
        settings(1000, 500),
        Arc::clone(&fx.sink),
    );

    monitor.probe_once().await;

    assert_eq!(fx.health.status("p1"), Some(HealthStatus::Healthy));
}

/// A hanging ping is cut off by the probe timeout
#[tokio::test]
async fn test_hanging_probe_times_out() {
    let fx = fixture(&["p1", "p2"]);
    fx.mock("p1").push_hang();
    let monitor = HealthMonitor::new(
        Arc::clone(&fx.health),
        fx.router.adapters(),
        settings(1000, 50),
        Arc::clone(&fx.sink),
    );

    let report = monitor.probe_once().await;

    assert!(report.duration < Duration::from_secs(1));
    assert_eq!(report.succeeded, 1);
    let record = fx.health.get("p1").unwrap();
    assert_eq!(
        record.last_error.map(|e| e.kind),
        Some(ProviderErrorKind::Timeout)
    );
}

/// The loop probes repeatedly and stops on cancellation
#[tokio::test]
async fn test_probe_loop_runs_until_cancelled() {
    let fx = fixture(&["p1"]);
    let monitor = Arc::new(HealthMonitor::new(
        Arc::clone(&fx.health),
        fx.router.adapters(),
        settings(20, 10),
        Arc::clone(&fx.sink),
    ));
    let cancel = CancellationToken::new();

    let handle = Arc::clone(&monitor).spawn_probe_loop(cancel.clone());
    tokio::time::sleep(Duration::from_millis(120)).await;
    cancel.cancel();
    handle.await.unwrap();

    let calls = fx.mock("p1").calls();
    assert!(calls >= 2, "expected repeated probes, got {calls}");
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(fx.mock("p1").calls(), calls);
}

/// Alternating probe outcomes toggle between healthy and degraded only
#[tokio::test]
async fn test_alternating_probes_never_reach_unhealthy() {
    let fx = fixture(&["p1"]);
    let monitor = HealthMonitor::new(
        Arc::clone(&fx.health),
        fx.router.adapters(),
        settings(1000, 500),
        Arc::clone(&fx.sink),
    );

    let mut statuses = Vec::new();
    for cycle in 0..6 {
        if cycle % 2 == 0 {
            fx.mock("p1").push_failure(ProviderError::unavailable("flaky"));
        } else {
            fx.mock("p1").push_reply("pong");
        }
        monitor.probe_once().await;
        statuses.push(fx.health.status("p1").unwrap());
    }

    assert_eq!(
        statuses,
        [HealthStatus::Degraded, HealthStatus::Healthy]
            .repeat(3)
    );
}
