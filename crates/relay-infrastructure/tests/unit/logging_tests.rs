//! Unit tests for logging helpers

use relay_infrastructure::logging::parse_log_level;
use tracing::Level;

#[test]
fn test_parse_log_level_accepts_known_levels() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);
}

#[test]
fn test_parse_log_level_rejects_unknown() {
    let error = parse_log_level("loud").unwrap_err();
    assert!(error.is_configuration());
}
