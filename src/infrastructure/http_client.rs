//! HTTP client for the upstream catalog
//!
//! Thin wrapper over `reqwest` that applies the configured timeout, user agent
//! and redirect policy, and reports failures as `SourceError` so callers can
//! tell a refused connection from a 404 from an undecodable body.

use anyhow::{Context, Result};
use reqwest::{
    Client,
    header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::domain::SourceError;
use crate::infrastructure::config::{UpstreamConfig, defaults};

/// HTTP client configuration
#[derive(Debug, Clone, serde::Serialize)]
pub struct HttpClientConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub follow_redirects: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            follow_redirects: true,
        }
    }
}

impl From<&UpstreamConfig> for HttpClientConfig {
    fn from(upstream: &UpstreamConfig) -> Self {
        Self {
            user_agent: upstream.user_agent.clone(),
            timeout_seconds: upstream.timeout_seconds,
            follow_redirects: upstream.follow_redirects,
        }
    }
}

pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with the given configuration
    pub fn new(config: HttpClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).context("Invalid user agent")?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    /// GET `url` and decode the JSON body into `T`
    ///
    /// The body is read fully before decoding so a truncated or mistyped
    /// document is reported as `Decode`, not `Transport`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        tracing::debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SourceError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| SourceError::Transport {
            url: url.to_string(),
            message: format!("failed to read response body: {e}"),
        })?;

        serde_json::from_str(&body).map_err(|e| SourceError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    pub const fn config(&self) -> &HttpClientConfig {
        &self.config
    }
}
