//! # redrive
//!
//! Resilient HTTP delivery for collector-style APIs.
//!
//! This library provides:
//! - A shared, pooled HTTP transport with bounded low-level retries
//! - Status-code driven classification of responses into semantic outcomes
//! - A dead-letter queue that records transient failures and replays them
//!   after the next successful request
//!
//! ## Failure policy
//!
//! Every failure is a typed [`Error`]. Authentication failures (401) and
//! malformed requests (400) are terminal and never retried. Timeouts and 5xx
//! responses are surfaced to the caller *and* recorded in the dead-letter
//! queue; the queue is drained opportunistically whenever a later request
//! succeeds, trading immediate consistency for eventual delivery.
//!
//! ## Example
//!
//! ```rust,no_run
//! use redrive::{Client, ClientConfig};
//!
//! # async fn run() -> redrive::Result<()> {
//! let client = Client::new(ClientConfig::default())?;
//! let response = client
//!     .post(
//!         "https://collector.example.com/v2/events",
//!         br#"{"events": []}"#,
//!         Some("api-key"),
//!         None,
//!         None,
//!         None,
//!     )
//!     .await?;
//! assert!(response.is_success());
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use client::Client;
pub use config::ClientConfig;
pub use dlq::{DeadLetterQueue, FailedRequest, FailureKind, Method};
pub use error::{Error, Result};
pub use outcome::{Outcome, Response};
pub use transport::Transport;

// Public modules
pub mod client;
pub mod config;
pub mod dlq;
pub mod error;
pub mod headers;
pub mod logging;
pub mod outcome;
pub mod transport;
