//! HTTP Response Utilities
//!
//! Maps HTTP status codes and transport failures onto the provider error
//! taxonomy. Shared by every API-based adapter.

use relay_domain::error::{ProviderError, ProviderErrorKind};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::constants::ERROR_BODY_PREVIEW_LIMIT;

/// Utilities for processing HTTP responses
pub struct HttpResponseUtils;

impl HttpResponseUtils {
    /// Failure kind of a non-success status
    pub fn classify_status(status: StatusCode) -> ProviderErrorKind {
        match status.as_u16() {
            401 | 403 => ProviderErrorKind::AuthFailure,
            429 => ProviderErrorKind::RateLimited,
            408 | 504 => ProviderErrorKind::Timeout,
            500..=599 => ProviderErrorKind::Unavailable,
            _ => ProviderErrorKind::Unknown,
        }
    }

    /// Failure kind of a transport-level `reqwest` error
    pub fn classify_transport(error: &reqwest::Error) -> ProviderErrorKind {
        if error.is_timeout() {
            ProviderErrorKind::Timeout
        } else if error.is_connect() || error.is_request() {
            ProviderErrorKind::Unavailable
        } else if error.is_decode() || error.is_body() {
            ProviderErrorKind::MalformedResponse
        } else {
            ProviderErrorKind::Unknown
        }
    }

    /// Normalize a `reqwest` error raised while sending
    pub fn transport_error(provider_name: &str, error: &reqwest::Error) -> ProviderError {
        ProviderError::new(
            Self::classify_transport(error),
            format!("{provider_name} request failed: {error}"),
        )
    }

    /// Check response status and decode the JSON body into `T`
    pub async fn check_and_parse<T: DeserializeOwned>(
        response: Response,
        provider_name: &str,
    ) -> Result<T, ProviderError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(provider_name, &e))?;

        if !status.is_success() {
            let kind = Self::classify_status(status);
            return Err(ProviderError::new(
                kind,
                format!(
                    "{provider_name} returned {}: {}",
                    status.as_u16(),
                    preview(&body)
                ),
            ));
        }

        serde_json::from_str(&body).map_err(|e| {
            ProviderError::malformed_response(format!(
                "{provider_name} response parse failed: {e}"
            ))
        })
    }
}

fn preview(body: &str) -> &str {
    let body = body.trim();
    if body.len() <= ERROR_BODY_PREVIEW_LIMIT {
        return body;
    }
    let mut end = ERROR_BODY_PREVIEW_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
