//! Configuration module
//!
//! Holds the settings injected into the API client at startup. Nothing here is
//! process-global: callers build a [`ClientConfig`] once and pass it down.

use std::env;
use std::time::Duration;

use crate::error::{ShareError, ShareResult};

const DEFAULT_API_BASE_URL: &str = "http://localhost:8001";

/// Client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address of the sharing API, without trailing slash
    pub api_base_url: String,
    /// Per-request timeout; `None` keeps the transport default
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_base_url: impl Into<String>) -> ShareResult<Self> {
        let config = Self {
            api_base_url: api_base_url.into().trim().trim_end_matches('/').to_string(),
            request_timeout: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Load from environment: SHARELINK_API_BASE_URL (or API_BASE_URL).
    pub fn from_env() -> ShareResult<Self> {
        dotenvy::dotenv().ok();

        let api_base_url = env::var("SHARELINK_API_BASE_URL")
            .or_else(|_| env::var("API_BASE_URL"))
            .unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string());

        Self::new(api_base_url)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn validate(&self) -> ShareResult<()> {
        let rest = self
            .api_base_url
            .strip_prefix("https://")
            .or_else(|| self.api_base_url.strip_prefix("http://"))
            .ok_or_else(|| {
                ShareError::Config(format!(
                    "API base URL must start with http:// or https://, got {:?}",
                    self.api_base_url
                ))
            })?;

        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() {
            return Err(ShareError::Config(
                "API base URL must include a host".to_string(),
            ));
        }

        if self.request_timeout == Some(Duration::ZERO) {
            return Err(ShareError::Config(
                "Request timeout must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base_url, path)
    }
}
