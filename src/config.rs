//! Configuration for the redrive client
//!
//! Every tunable carries a serde default, so a partially specified document
//! (for example a `[client]` table inside a host application's TOML config)
//! deserializes into a usable configuration.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::time::Duration;

/// Tunables for the shared transport and its retry policy
#[derive(Debug, Deserialize, Clone)]
pub struct ClientConfig {
    /// Max idle pooled connections kept alive per host
    #[serde(default = "default_pool_max_idle_per_host")]
    pub pool_max_idle_per_host: usize,

    /// Seconds an idle pooled connection is kept before being closed
    #[serde(default = "default_pool_idle_timeout_secs")]
    pub pool_idle_timeout_secs: u64,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Extra low-level attempts for connect failures and retryable statuses
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Initial backoff between low-level retries in milliseconds (doubles per attempt)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Status codes retried transparently at the transport level
    #[serde(default = "default_retry_status_codes")]
    pub retry_status_codes: Vec<u16>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            pool_max_idle_per_host: default_pool_max_idle_per_host(),
            pool_idle_timeout_secs: default_pool_idle_timeout_secs(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            retry_status_codes: default_retry_status_codes(),
        }
    }
}

impl ClientConfig {
    /// Per-request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Idle pooled connection timeout as a [`Duration`]
    pub fn pool_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_idle_timeout_secs)
    }

    /// Initial retry backoff as a [`Duration`]
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(Error::Config(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_retries > 0 && self.retry_status_codes.is_empty() {
            return Err(Error::Config(
                "retry_status_codes must not be empty when max_retries is set".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_pool_max_idle_per_host() -> usize {
    256
}

fn default_pool_idle_timeout_secs() -> u64 {
    10
}

fn default_timeout_secs() -> u64 {
    20
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_backoff_ms() -> u64 {
    100
}

fn default_retry_status_codes() -> Vec<u16> {
    vec![500, 502, 503, 504]
}
