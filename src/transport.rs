//! Shared connection pool and low-level retry policy
//!
//! One `reqwest::Client` is built per transport and reused for every request;
//! reqwest pools connections per host internally and is safe to share across
//! tasks without external locking. A process-wide default instance is
//! available through [`Transport::shared`] for call sites that do not inject
//! their own.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::HeaderMap;

use crate::config::ClientConfig;
use crate::dlq::Method;
use crate::error::{Error, Result};

const TCP_KEEPALIVE: Duration = Duration::from_secs(60);
const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(30);

static SHARED: OnceLock<Transport> = OnceLock::new();

/// A reusable, pooled HTTP transport
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    config: ClientConfig,
}

impl Transport {
    /// Build a transport from configuration
    ///
    /// Returns an error if the configuration is invalid or the underlying
    /// client cannot be constructed.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(config.pool_idle_timeout())
            .tcp_keepalive(TCP_KEEPALIVE)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Process-wide default transport, created lazily on first use and kept
    /// for the remainder of the process lifetime.
    pub fn shared() -> &'static Transport {
        SHARED.get_or_init(|| {
            Transport::new(ClientConfig::default())
                .expect("default transport configuration is valid")
        })
    }

    /// The configuration this transport was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue one request, transparently retrying connect failures and
    /// retryable status codes with exponential backoff.
    ///
    /// Timeouts are not retried here: no call may block beyond the fixed
    /// request timeout. The final response is returned unjudged even when its
    /// status is retryable; classification belongs to the caller.
    pub(crate) async fn execute(
        &self,
        method: Method,
        url: &str,
        payload: Option<&[u8]>,
        headers: &HeaderMap,
    ) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let mut delay = self.config.retry_backoff();
        let mut attempt = 0;

        loop {
            let mut builder = match method {
                Method::Get => self.http.get(url),
                Method::Post => self.http.post(url),
            };
            builder = builder.headers(headers.clone());
            if let Some(bytes) = payload {
                builder = builder.body(bytes.to_vec());
            }

            let result = builder.send().await;

            let retryable = match &result {
                Ok(response) => self
                    .config
                    .retry_status_codes
                    .contains(&response.status().as_u16()),
                Err(e) => e.is_connect(),
            };

            if retryable && attempt < self.config.max_retries {
                attempt += 1;
                tracing::debug!(
                    url,
                    attempt,
                    max_retries = self.config.max_retries,
                    "retrying transient transport failure, waiting {:?}",
                    delay
                );
                tokio::time::sleep(delay).await;
                delay = std::cmp::min(delay * 2, MAX_RETRY_BACKOFF);
                continue;
            }

            return result;
        }
    }
}
