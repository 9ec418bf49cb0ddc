//! HTTP Client Configuration
//!
//! Shared `reqwest` client settings for API-based adapters. Request timeouts
//! are not set on the client: each call is bounded by its own deadline.

pub mod client;

pub use client::{HttpClientConfig, build_client};
