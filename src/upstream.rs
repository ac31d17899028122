//! Upstream HTTP client
//!
//! One bounded GET against the rate-limited provider: required auth headers,
//! a connect timeout, and a total request timeout. Failures come back as a
//! typed error; the fetch layer decides whether to degrade to stale data.

use std::future::Future;

use reqwest::Client;
use thiserror::Error;
use tracing::debug;

use crate::config::FeedConfig;

/// Errors from a single upstream request
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Non-2xx response from the provider
    #[error("upstream returned HTTP {status}: {body}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Response body, kept for diagnosis
        body: String,
    },

    /// Connection, TLS, or timeout failure
    #[error("transport failure: {0}")]
    Transport(String),
}

/// A GET primitive against the rate-limited upstream
///
/// Abstracted so the fetch layer can be exercised against a scripted
/// upstream in tests. Returned futures are `Send` so fetches can run on
/// spawned tasks.
pub trait Upstream: Send + Sync {
    /// Issues one GET for `url`, returning the raw body on success
    fn get(&self, url: &str) -> impl Future<Output = Result<String, UpstreamError>> + Send;
}

/// Production upstream over `reqwest`
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: Client,
    api_key: String,
    api_host: String,
}

impl HttpUpstream {
    /// Builds a client with the configured credentials and timeouts
    pub fn from_config(config: &FeedConfig) -> Result<Self, UpstreamError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
        })
    }
}

impl Upstream for HttpUpstream {
    fn get(&self, url: &str) -> impl Future<Output = Result<String, UpstreamError>> + Send {
        async move {
            debug!(url, "issuing upstream GET");

            let response = self
                .client
                .get(url)
                .header("x-rapidapi-key", &self.api_key)
                .header("x-rapidapi-host", &self.api_host)
                .send()
                .await
                .map_err(|e| UpstreamError::Transport(e.to_string()))?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| UpstreamError::Transport(e.to_string()))?;

            if !status.is_success() {
                return Err(UpstreamError::Http {
                    status: status.as_u16(),
                    body,
                });
            }

            Ok(body)
        }
    }
}
