use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

/// HTTP client configuration
///
/// Controls connection pooling and connect behavior of adapter clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Maximum idle connections per host
    pub max_idle_per_host: usize,
    /// Idle connection timeout
    pub idle_timeout: Duration,
    /// TCP keep-alive duration
    pub keepalive: Duration,
    /// Upper bound on establishing a connection
    pub connect_timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Duration::from_secs(90),
            keepalive: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("relay/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Configuration with a custom connect timeout only
    pub fn with_connect_timeout(connect_timeout: Duration) -> Self {
        Self {
            connect_timeout,
            ..Default::default()
        }
    }
}

/// Build a pooled client from `config`
pub fn build_client(config: &HttpClientConfig) -> Result<Client, String> {
    Client::builder()
        .pool_max_idle_per_host(config.max_idle_per_host)
        .pool_idle_timeout(config.idle_timeout)
        .tcp_keepalive(config.keepalive)
        .connect_timeout(config.connect_timeout)
        .user_agent(&config.user_agent)
        .build()
        .map_err(|e| format!("Failed to create HTTP client: {e}"))
}
