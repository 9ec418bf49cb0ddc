//! Unit tests for domain error types

use relay_domain::error::{AggregateFailure, FailureRecord, RoutingError};
use relay_domain::{Error, ProviderError, ProviderErrorKind};
use uuid::Uuid;

#[test]
fn test_not_found_error() {
    let error = Error::not_found("provider 'p9'");
    match error {
        Error::NotFound { resource } => assert_eq!(resource, "provider 'p9'"),
        _ => panic!("Expected NotFound error"),
    }
}

#[test]
fn test_configuration_error_is_fatal_kind() {
    let error = Error::configuration("missing model_id");
    assert!(error.is_configuration());
    assert!(error.to_string().contains("missing model_id"));
    assert!(!Error::internal("x").is_configuration());
}

#[test]
fn test_provider_error_display_includes_kind() {
    let error = ProviderError::rate_limited("slow down");
    assert_eq!(error.kind, ProviderErrorKind::RateLimited);
    assert_eq!(error.to_string(), "rate_limited: slow down");
}

#[test]
fn test_routing_error_exposes_aggregate() {
    let aggregate = AggregateFailure {
        request_id: Uuid::new_v4(),
        failures: vec![FailureRecord::new("p1", &ProviderError::timeout("late"))],
        deadline_exceeded: true,
    };
    let error = RoutingError::Exhausted(aggregate);
    let inner = error.aggregate().expect("exhausted carries an aggregate");
    assert_eq!(inner.providers(), vec!["p1"]);
    assert!(error.to_string().contains("deadline exceeded"));

    let unknown = RoutingError::UnknownProvider {
        name: "nope".to_string(),
    };
    assert!(unknown.aggregate().is_none());
}
