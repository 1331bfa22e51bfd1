//! Dead-letter queue for failed requests
//!
//! Requests that fail transiently (timeouts, 5xx) are recorded here and
//! replayed after the next successful request. The queue is in-memory only:
//! it is created empty at process start and is never persisted, so delivery
//! is best-effort within one process lifetime.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// HTTP method of a queued request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// What caused a request to be enqueued
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    ServerError,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => write!(f, "Timeout"),
            FailureKind::ServerError => write!(f, "ServerError"),
        }
    }
}

/// The minimal record of a failed request sufficient to replay it later
#[derive(Debug, Clone)]
pub struct FailedRequest {
    pub method: Method,
    pub url: String,
    /// Request body; `None` for GET
    pub payload: Option<Vec<u8>>,
    pub api_key: Option<String>,
    pub parent_key: Option<String>,
    pub jwt: Option<String>,
    pub error_type: FailureKind,
}

#[derive(Debug, Clone)]
struct Entry {
    id: u64,
    request: FailedRequest,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    entries: Vec<Entry>,
}

/// Thread-safe, ordered store of failed request descriptors.
///
/// Cloning the handle shares the underlying queue. Entries carry a private
/// monotonically increasing id so a drain pass removes exactly the entries
/// it replayed, leaving adds that raced the drain untouched.
#[derive(Debug, Clone, Default)]
pub struct DeadLetterQueue {
    inner: Arc<Mutex<Inner>>,
}

impl DeadLetterQueue {
    /// Create a new, empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor. No deduplication: the same failing request can
    /// appear multiple times if enqueued repeatedly.
    pub fn add(&self, request: FailedRequest) {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push(Entry { id, request });
    }

    /// Ordered snapshot of the queued descriptors
    pub fn get_all(&self) -> Vec<FailedRequest> {
        self.lock()
            .entries
            .iter()
            .map(|entry| entry.request.clone())
            .collect()
    }

    /// Number of queued descriptors
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// True when nothing is queued
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Empty the queue unconditionally
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Snapshot of (id, descriptor) pairs for a drain pass
    pub(crate) fn snapshot(&self) -> Vec<(u64, FailedRequest)> {
        self.lock()
            .entries
            .iter()
            .map(|entry| (entry.id, entry.request.clone()))
            .collect()
    }

    /// Remove the entry with the given id, if it is still queued
    pub(crate) fn remove(&self, id: u64) {
        self.lock().entries.retain(|entry| entry.id != id);
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // The queue holds no invariants that a panicked writer could break
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
