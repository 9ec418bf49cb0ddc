//! Unit tests for the copy-on-write health table

use std::sync::Arc;
use std::time::Duration;

use relay_domain::error::ProviderError;
use relay_domain::events::RoutingEvent;
use relay_domain::value_objects::HealthStatus;
use relay_infrastructure::events::{BroadcastEventSink, NullEventSink};
use relay_infrastructure::routing::HealthTable;

fn table(threshold: u32) -> HealthTable {
    HealthTable::new(["p1", "p2"], threshold, Arc::new(NullEventSink::new()))
}

/// Failures degrade, then cross the threshold
#[test]
fn test_failures_degrade_then_mark_unhealthy() {
    let table = table(3);
    let error = ProviderError::unavailable("down");

    table.record_failure("p1", &error);
    assert_eq!(table.status("p1"), Some(HealthStatus::Degraded));
    table.record_failure("p1", &error);
    assert_eq!(table.status("p1"), Some(HealthStatus::Degraded));
    table.record_failure("p1", &error);
    assert_eq!(table.status("p1"), Some(HealthStatus::Unhealthy));

    table.record_success("p1", Duration::from_millis(3));
    let record = table.get("p1").unwrap();
    assert_eq!(record.status, HealthStatus::Healthy);
    assert_eq!(record.consecutive_failures, 0);
    assert_eq!(record.total_failures, 3);
}

/// Only status changes produce transition events
#[test]
fn test_transitions_are_emitted_on_status_change() {
    let sink = BroadcastEventSink::new();
    let mut events = sink.subscribe();
    let table = HealthTable::new(["p1"], 2, Arc::new(sink));
    let error = ProviderError::unavailable("down");

    table.record_failure("p1", &error);
    table.record_failure("p1", &error);
    table.record_failure("p1", &error);
    table.record_success("p1", Duration::from_millis(1));
    table.record_success("p1", Duration::from_millis(1));

    let mut transitions = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let RoutingEvent::HealthTransition { from, to, .. } = event {
            transitions.push((from, to));
        }
    }
    assert_eq!(
        transitions,
        vec![
            (HealthStatus::Unknown, HealthStatus::Degraded),
            (HealthStatus::Degraded, HealthStatus::Unhealthy),
            (HealthStatus::Unhealthy, HealthStatus::Healthy),
        ]
    );
}

/// Concurrent writers never lose an update
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_updates_are_not_lost() {
    let table = Arc::new(table(3));
    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let table = Arc::clone(&table);
            tokio::spawn(async move {
                for _ in 0..50 {
                    if i % 2 == 0 {
                        table.record_success("p1", Duration::from_millis(1));
                    } else {
                        table.record_failure("p1", &ProviderError::unavailable("down"));
                    }
                }
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let record = table.get("p1").unwrap();
    assert_eq!(record.total_checks, 400);
    assert_eq!(record.total_failures, 200);
}
