//! Request executor
//!
//! Sends one GET or POST end-to-end: compose headers, issue the request
//! through the pooled transport, classify the status code, and apply the
//! failure policy. Transient failures (timeouts and 5xx responses) are
//! recorded in the dead-letter queue; any successful request triggers a
//! drain that replays whatever is queued.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::config::ClientConfig;
use crate::dlq::{DeadLetterQueue, FailedRequest, FailureKind, Method};
use crate::error::{Error, Result};
use crate::headers;
use crate::outcome::{Outcome, Response};
use crate::transport::Transport;

static SHARED: OnceLock<Client> = OnceLock::new();

/// HTTP client with failure classification and opportunistic replay
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
    dead_letters: DeadLetterQueue,
}

impl Client {
    /// Create a client with its own transport and an empty dead-letter queue
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
            dead_letters: DeadLetterQueue::new(),
        })
    }

    /// Create a client from injected parts.
    ///
    /// Lets several clients share one transport pool, one queue, or both.
    pub fn with_parts(transport: Transport, dead_letters: DeadLetterQueue) -> Self {
        Self {
            transport,
            dead_letters,
        }
    }

    /// Process-wide default client: shared transport, shared queue, default
    /// configuration. Created lazily on first use.
    pub fn shared() -> &'static Client {
        SHARED.get_or_init(|| {
            Client::with_parts(Transport::shared().clone(), DeadLetterQueue::new())
        })
    }

    /// The dead-letter queue backing this client
    pub fn dead_letters(&self) -> &DeadLetterQueue {
        &self.dead_letters
    }

    /// POST an opaque payload to `url`.
    ///
    /// On a 2xx response the dead-letter queue is drained before the result
    /// is returned; drain failures are logged and never affect the result.
    pub async fn post(
        &self,
        url: &str,
        payload: &[u8],
        api_key: Option<&str>,
        parent_key: Option<&str>,
        jwt: Option<&str>,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<Response> {
        let response = self
            .send(
                Method::Post,
                url,
                Some(payload),
                api_key,
                parent_key,
                jwt,
                extra_headers,
                true,
            )
            .await?;

        if response.is_success() {
            self.drain_dead_letters().await;
        }
        Ok(response)
    }

    /// GET from `url`.
    ///
    /// Same classification, enqueue, and drain behavior as [`Client::post`].
    pub async fn get(
        &self,
        url: &str,
        api_key: Option<&str>,
        jwt: Option<&str>,
        extra_headers: Option<&HashMap<String, String>>,
    ) -> Result<Response> {
        let response = self
            .send(Method::Get, url, None, api_key, None, jwt, extra_headers, true)
            .await?;

        if response.is_success() {
            self.drain_dead_letters().await;
        }
        Ok(response)
    }

    /// Replay every currently queued descriptor once, in enqueue order.
    ///
    /// A replay counts as successful only when it comes back 2xx, in which
    /// case exactly that entry is removed. Failed replays stay queued for the
    /// next pass and never abort the rest of the pass. Replays neither
    /// enqueue new descriptors nor trigger further drains, so a pass
    /// processes exactly the snapshot taken at its start.
    pub async fn drain_dead_letters(&self) {
        let snapshot = self.dead_letters.snapshot();
        if snapshot.is_empty() {
            return;
        }

        tracing::debug!(count = snapshot.len(), "draining dead-letter queue");

        for (id, request) in snapshot {
            let result = self
                .send(
                    request.method,
                    &request.url,
                    request.payload.as_deref(),
                    request.api_key.as_deref(),
                    request.parent_key.as_deref(),
                    request.jwt.as_deref(),
                    None,
                    false,
                )
                .await;

            match result {
                Ok(response) if response.is_success() => {
                    tracing::debug!(url = %request.url, "dead-letter replay delivered");
                    self.dead_letters.remove(id);
                }
                Ok(response) => {
                    tracing::warn!(
                        url = %request.url,
                        code = response.code,
                        "dead-letter replay not accepted, leaving queued"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        url = %request.url,
                        error = %e,
                        "dead-letter replay failed, leaving queued"
                    );
                }
            }
        }
    }

    /// Execute one request attempt and apply the failure policy.
    ///
    /// `record_failures` is false during replays: a failed replay must leave
    /// the original descriptor in place rather than enqueue a duplicate.
    #[allow(clippy::too_many_arguments)]
    async fn send(
        &self,
        method: Method,
        url: &str,
        payload: Option<&[u8]>,
        api_key: Option<&str>,
        parent_key: Option<&str>,
        jwt: Option<&str>,
        extra_headers: Option<&HashMap<String, String>>,
        record_failures: bool,
    ) -> Result<Response> {
        let headers = headers::compose(api_key, parent_key, jwt, extra_headers)?;

        let raw = match self.transport.execute(method, url, payload, &headers).await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                if record_failures {
                    self.enqueue(
                        method,
                        url,
                        payload,
                        api_key,
                        parent_key,
                        jwt,
                        FailureKind::Timeout,
                    );
                }
                return Err(Error::ServerUnreachable(
                    "connection timed out".to_string(),
                ));
            }
            // Connection-level failure with no response: nothing meaningful
            // to replay, so it is surfaced without entering the queue
            Err(e) => return Err(Error::ServerUnreachable(format!("request failed: {}", e))),
        };

        let status = raw.status();
        let code = status.as_u16();
        let bytes = raw
            .bytes()
            .await
            .map_err(|e| Error::Unclassified(format!("failed to read response body: {}", e)))?;
        let response = Response::from_parts(code, &bytes);

        match response.outcome {
            Outcome::InvalidApiKey => Err(Error::AuthenticationFailed(
                "API server rejected the API key or JWT".to_string(),
            )),
            Outcome::Failed => {
                if record_failures {
                    self.enqueue(
                        method,
                        url,
                        payload,
                        api_key,
                        parent_key,
                        jwt,
                        FailureKind::ServerError,
                    );
                }
                let message = match response.message() {
                    Some(message) => message.to_string(),
                    None if code == 500 => "internal server error".to_string(),
                    // 502, 503, ...: fall back to the canonical reason phrase
                    None => status
                        .canonical_reason()
                        .unwrap_or("server error")
                        .to_string(),
                };
                Err(Error::ServerError { code, message })
            }
            Outcome::InvalidRequest if code == 400 => {
                let message = match response.message() {
                    Some(message) => message.to_string(),
                    None => serde_json::Value::Object(response.body.clone()).to_string(),
                };
                Err(Error::InvalidRequest(message))
            }
            // Success, plus the non-fatal 4xx family (404, 408, 413, 429, ...):
            // the caller gets the classified response back
            _ => Ok(response),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn enqueue(
        &self,
        method: Method,
        url: &str,
        payload: Option<&[u8]>,
        api_key: Option<&str>,
        parent_key: Option<&str>,
        jwt: Option<&str>,
        error_type: FailureKind,
    ) {
        tracing::debug!(url, %error_type, "recording failed request for replay");
        self.dead_letters.add(FailedRequest {
            method,
            url: url.to_string(),
            payload: payload.map(<[u8]>::to_vec),
            api_key: api_key.map(str::to_string),
            parent_key: parent_key.map(str::to_string),
            jwt: jwt.map(str::to_string),
            error_type,
        });
    }
}
