//! Status-code classification and the response type

use serde_json::{Map, Value};

/// Semantic classification of an HTTP response's status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    TooManyRequests,
    PayloadTooLarge,
    Timeout,
    InvalidApiKey,
    InvalidRequest,
    Failed,
    Unknown,
}

impl Outcome {
    /// Classify an integer status code.
    ///
    /// Total over all integers; the specific 4xx codes (429, 413, 408, 401)
    /// win over the generic client-error bucket.
    pub fn from_code(code: i32) -> Outcome {
        match code {
            200..=299 => Outcome::Success,
            429 => Outcome::TooManyRequests,
            413 => Outcome::PayloadTooLarge,
            408 => Outcome::Timeout,
            401 => Outcome::InvalidApiKey,
            400..=499 => Outcome::InvalidRequest,
            c if c >= 500 => Outcome::Failed,
            _ => Outcome::Unknown,
        }
    }
}

/// A classified response from the API server
#[derive(Debug, Clone)]
pub struct Response {
    /// Semantic outcome derived from the status code
    pub outcome: Outcome,
    /// Raw numeric status code
    pub code: i32,
    /// Parsed JSON body; empty when the body was absent or not a JSON object
    pub body: Map<String, Value>,
}

impl Response {
    /// Build a response from a status code and raw body bytes
    pub(crate) fn from_parts(code: u16, raw: &[u8]) -> Self {
        let body = serde_json::from_slice::<Value>(raw)
            .ok()
            .and_then(|value| match value {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .unwrap_or_default();

        Response {
            outcome: Outcome::from_code(i32::from(code)),
            code: i32::from(code),
            body,
        }
    }

    /// True when the status code was in the 2xx range
    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    /// The body's `message` field, when present and a string
    pub(crate) fn message(&self) -> Option<&str> {
        self.body.get("message").and_then(Value::as_str)
    }
}
