use crate::{error::StoreError, retry::RetryPolicy};
use std::{collections::HashMap, time::Duration};
use tracing::warn;

pub const STORE_URL_VAR: &str = "FILTER_STORE_URL";
pub const STORE_TIMEOUT_VAR: &str = "FILTER_STORE_TIMEOUT_MS";
pub const STORE_ATTEMPTS_VAR: &str = "FILTER_STORE_MAX_ATTEMPTS";

pub const DEFAULT_STORE_URL: &str = "http://localhost:5001";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Connection settings for the filter store and query service.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_STORE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            retry: RetryPolicy {
                max_attempts: DEFAULT_MAX_ATTEMPTS,
                ..RetryPolicy::default()
            },
        }
    }
}

impl StoreConfig {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Reads the settings from `vars`. Unset or unparsable values fall back
    /// to the defaults.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = vars.get(STORE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.base_url = url.trim().to_string();
        }

        if let Some(ms) = parse_var::<u64>(vars, STORE_TIMEOUT_VAR) {
            config.timeout = Duration::from_millis(ms);
        }

        if let Some(attempts) = parse_var::<usize>(vars, STORE_ATTEMPTS_VAR) {
            config.retry.max_attempts = attempts.max(1);
        }

        config
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Joins `path` onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub(crate) fn http_client(&self) -> Result<reqwest::Client, StoreError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(StoreError::Config(format!(
                "base URL must be http(s): {}",
                self.base_url
            )));
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(StoreError::Transport)
    }
}

fn parse_var<T: std::str::FromStr>(vars: &HashMap<String, String>, key: &str) -> Option<T> {
    let raw = vars.get(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}
