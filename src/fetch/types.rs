//! Record and error types for the remote todo endpoint.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A todo item as served by the remote endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub completed: bool,
}

impl Todo {
    /// Human-readable completion status.
    pub fn status(&self) -> &'static str {
        if self.completed {
            "Completed"
        } else {
            "Pending"
        }
    }
}

/// Network-level failures reported by a [`Fetcher`](super::Fetcher).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request could not be built (bad URL, bad header).
    #[error("error creating request: {0}")]
    InvalidRequest(String),

    /// Connecting or sending failed.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("unexpected status {status}")]
    Status { status: u16 },

    /// The response body could not be read.
    #[error("error reading response: {0}")]
    Body(String),

    /// The transport's own time budget ran out.
    #[error("request timed out")]
    TimedOut,

    /// The cancellation token fired while the call was in flight.
    #[error("request cancelled")]
    Cancelled,

    /// The worker running the call ended without reporting a result.
    #[error("worker task ended without reporting a result")]
    WorkerLost,
}

/// The fetched bytes could not be parsed into a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("error decoding response: {0}")]
pub struct DecodeError(pub String);
