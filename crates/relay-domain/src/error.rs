//! Error handling types
//!
//! Three families of errors live here:
//!
//! - [`Error`]: configuration, lookup and internal failures. Configuration
//!   errors are fatal at startup.
//! - [`ProviderError`]: a single backend call failed. Adapters normalize every
//!   backend-specific failure into one of the [`ProviderErrorKind`] variants.
//! - [`RoutingError`]: the outcome of a routed request that produced no
//!   response. Individual provider errors only surface inside an
//!   [`AggregateFailure`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for relay
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON parsing or serialization error
    #[error("JSON parsing error: {source}")]
    Json {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Resource not found error
    #[error("Not found: {resource}")]
    NotFound {
        /// The resource that was not found
        resource: String,
    },

    /// Configuration-related error
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error
        message: String,
    },

    /// Infrastructure operation error
    #[error("Infrastructure error: {message}")]
    Infrastructure {
        /// Description of the infrastructure error
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl Error {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(resource: S) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create an I/O error with source
    pub fn io_with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
        message: S,
        source: E,
    ) -> Self {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

// Configuration error creation methods
impl Error {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error with source
    pub fn configuration_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an infrastructure error
    pub fn infrastructure<S: Into<String>>(message: S) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: None,
        }
    }

    /// Create an infrastructure error with source
    pub fn infrastructure_with_source<
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    >(
        message: S,
        source: E,
    ) -> Self {
        Self::Infrastructure {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Returns `true` for configuration errors (fatal at startup)
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }
}

// ============================================================================
// Provider errors
// ============================================================================

/// Normalized failure category of a single provider call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// The call did not complete before its deadline
    Timeout,
    /// Credentials were rejected
    AuthFailure,
    /// The backend asked us to slow down
    RateLimited,
    /// Network, DNS or 5xx-class failure
    Unavailable,
    /// The backend answered with something we could not decode
    MalformedResponse,
    /// Anything else
    Unknown,
}

impl ProviderErrorKind {
    /// Stable snake_case name, used in logs and events
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::AuthFailure => "auth_failure",
            Self::RateLimited => "rate_limited",
            Self::Unavailable => "unavailable",
            Self::MalformedResponse => "malformed_response",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned by a provider adapter
///
/// Adapters never leak backend-specific error types; everything is mapped to
/// a [`ProviderErrorKind`] plus a human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct ProviderError {
    /// Failure category
    pub kind: ProviderErrorKind,
    /// Backend-provided or adapter-generated details
    pub message: String,
}

impl ProviderError {
    /// Create a provider error of the given kind
    pub fn new<S: Into<String>>(kind: ProviderErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create a timeout error
    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    /// Create an authentication failure
    pub fn auth_failure<S: Into<String>>(message: S) -> Self {
        Self::new(ProviderErrorKind::AuthFailure, message)
    }

    /// Create a rate-limit error
    pub fn rate_limited<S: Into<String>>(message: S) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    /// Create an unavailability error
    pub fn unavailable<S: Into<String>>(message: S) -> Self {
        Self::new(ProviderErrorKind::Unavailable, message)
    }

    /// Create a malformed-response error
    pub fn malformed_response<S: Into<String>>(message: S) -> Self {
        Self::new(ProviderErrorKind::MalformedResponse, message)
    }

    /// Create an uncategorized error
    pub fn unknown<S: Into<String>>(message: S) -> Self {
        Self::new(ProviderErrorKind::Unknown, message)
    }
}

// ============================================================================
// Routing errors
// ============================================================================

/// One failed attempt within a routed request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Provider that was attempted
    pub provider: String,
    /// Failure category
    pub kind: ProviderErrorKind,
    /// Failure details
    pub message: String,
    /// When the attempt failed
    pub timestamp: DateTime<Utc>,
}

impl FailureRecord {
    /// Record a failed attempt against `provider`
    pub fn new<S: Into<String>>(provider: S, error: &ProviderError) -> Self {
        Self {
            provider: provider.into(),
            kind: error.kind,
            message: error.message.clone(),
            timestamp: Utc::now(),
        }
    }
}

/// Every failure collected while trying to satisfy one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateFailure {
    /// Request the failures belong to
    pub request_id: Uuid,
    /// One record per attempted provider, in attempt order
    pub failures: Vec<FailureRecord>,
    /// `true` when the request deadline cut the candidate list short
    pub deadline_exceeded: bool,
}

impl AggregateFailure {
    /// Providers that were attempted, in order
    pub fn providers(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.provider.as_str()).collect()
    }

    /// Failure kinds, in attempt order
    pub fn kinds(&self) -> Vec<ProviderErrorKind> {
        self.failures.iter().map(|f| f.kind).collect()
    }

    /// Returns `true` if at least one attempt was made and all failed with `kind`
    pub fn all_failed_with(&self, kind: ProviderErrorKind) -> bool {
        !self.failures.is_empty() && self.failures.iter().all(|f| f.kind == kind)
    }

    /// Number of failed attempts
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Returns `true` if no attempt was made
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "all {} attempted provider(s) failed",
            self.failures.len()
        )?;
        if self.deadline_exceeded {
            f.write_str(" (deadline exceeded)")?;
        }
        for (i, failure) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{} [{}] {}", failure.provider, failure.kind, failure.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFailure {}

/// Outcome of a routed request that produced no response
#[derive(Error, Debug, Clone)]
pub enum RoutingError {
    /// Every candidate failed, or the deadline expired first
    #[error("{0}")]
    Exhausted(AggregateFailure),

    /// The explicit provider override names no configured provider
    #[error("Unknown provider override: {name}")]
    UnknownProvider {
        /// The override that was requested
        name: String,
    },
}

impl RoutingError {
    /// The aggregate failure, if the candidates were exhausted
    pub fn aggregate(&self) -> Option<&AggregateFailure> {
        match self {
            Self::Exhausted(aggregate) => Some(aggregate),
            Self::UnknownProvider { .. } => None,
        }
    }
}
