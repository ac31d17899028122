//! Configuration for the feed layer
//!
//! Covers the upstream credentials, the daily call ceiling, and the HTTP
//! timeouts. TTL classes live with the endpoint catalog in [`crate::api`].

use std::time::Duration;

/// Default daily upstream call ceiling
pub const DEFAULT_DAILY_LIMIT: u32 = 100;

/// Default connect timeout for upstream requests
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default read timeout for upstream requests
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(12);

/// Default upstream API host
pub const DEFAULT_API_HOST: &str = "cricbuzz-cricket.p.rapidapi.com";

/// Configuration for the fetch layer and upstream client
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// API key sent with every upstream request
    pub api_key: String,
    /// API host header value for the upstream provider
    pub api_host: String,
    /// Maximum upstream calls per UTC calendar day
    pub daily_limit: u32,
    /// TCP connect timeout for upstream requests
    pub connect_timeout: Duration,
    /// Total request timeout (covers the read)
    pub request_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            daily_limit: DEFAULT_DAILY_LIMIT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl FeedConfig {
    /// Creates a config with the given upstream credentials and defaults
    /// for everything else
    pub fn new(api_key: impl Into<String>, api_host: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_host: api_host.into(),
            ..Self::default()
        }
    }

    /// Reads credentials from `CRICFEED_API_KEY` and `CRICFEED_API_HOST`
    ///
    /// Returns `None` when no API key is set. A missing host falls back to
    /// the default provider host.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("CRICFEED_API_KEY").ok()?;
        let api_host =
            std::env::var("CRICFEED_API_HOST").unwrap_or_else(|_| DEFAULT_API_HOST.to_string());
        Some(Self::new(api_key, api_host))
    }

    /// Overrides the daily call ceiling
    pub fn with_daily_limit(mut self, limit: u32) -> Self {
        self.daily_limit = limit;
        self
    }

    /// Overrides the connect and request timeouts
    pub fn with_timeouts(mut self, connect: Duration, request: Duration) -> Self {
        self.connect_timeout = connect;
        self.request_timeout = request;
        self
    }
}
