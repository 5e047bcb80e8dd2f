//! Client configuration.
//!
//! Values come from the environment at runtime, optionally seeded from a
//! `.env` file. `CRM_API_BASE_URL` may also be baked in at build time; the
//! runtime value wins when both are set.

use std::time::Duration;

use crate::error::ApiError;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

pub const BASE_URL_ENV: &str = "CRM_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "CRM_API_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Overall per-request timeout enforced by the transport.
    pub timeout: Duration,
    /// Sent with every request unless the request sets the header itself.
    pub default_headers: Vec<(String, String)>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: option_env!("CRM_API_BASE_URL")
                .unwrap_or(DEFAULT_BASE_URL)
                .to_string(),
            timeout: DEFAULT_TIMEOUT,
            default_headers: Vec::new(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`ClientConfig::from_env`], after loading `.env` into the process
    /// environment. Variables already set are not overridden.
    pub fn from_dotenv() -> Result<Self, ApiError> {
        let _ = dotenvy::dotenv();
        Self::from_env()
    }

    /// Build a config from an arbitrary variable source. Blank values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var(BASE_URL_ENV) {
            config.base_url = url.trim().to_string();
        }
        if let Some(raw) = var(TIMEOUT_ENV) {
            let millis: u64 = raw
                .trim()
                .parse()
                .map_err(|_| ApiError::Config(format!("{TIMEOUT_ENV} must be milliseconds, got {raw:?}")))?;
            if millis == 0 {
                return Err(ApiError::Config(format!("{TIMEOUT_ENV} must be positive")));
            }
            config.timeout = Duration::from_millis(millis);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let lower = self.base_url.to_ascii_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }
}
