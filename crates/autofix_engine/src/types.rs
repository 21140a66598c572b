use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

/// Fixed delay between two fetches of a non-terminal run.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Message used when a failed start carries no backend detail.
pub const GENERIC_START_ERROR: &str = "An error occurred";

/// Produces the creation timestamp of locally synthesized runs.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    pub poll_interval: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
        }
    }
}

/// Body of the start request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StartRunRequest {
    pub event_id: String,
    pub instruction: String,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("http status {status}")]
    HttpStatus { status: u16, detail: Option<String> },
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl BackendError {
    /// The backend's own explanation, meant to be shown verbatim.
    pub fn detail(&self) -> Option<&str> {
        match self {
            BackendError::HttpStatus { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// How a write to a cache slot ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Structurally equal to the cached value; subscribers were not notified.
    Unchanged,
    /// A newer start happened since the write was issued; dropped.
    Superseded,
}
