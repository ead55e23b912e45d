//! Outcome, failure and batch result types.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::fetch::types::{DecodeError, TransportError};

/// The single terminal result of one bounded operation.
pub type Outcome<R> = Result<R, OperationError>;

/// Coarse classification of an [`OperationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    DeadlineExceeded,
    Cancelled,
    Transport,
    Decode,
}

/// Where an operation was when it observed cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The artificial latency stage, before the request was sent.
    Delay,
    /// The transport call.
    Transport,
    /// The caller was waiting on the outcome.
    Waiting,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Stage::Delay => "before starting",
            Stage::Transport => "in flight",
            Stage::Waiting => "while waiting",
        };
        f.write_str(stage)
    }
}

/// A failed bounded operation, attributed to its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    #[error("request {id}: timed out after {budget:?}")]
    DeadlineExceeded { id: u64, budget: Duration },

    #[error("request {id}: cancelled {stage}")]
    Cancelled { id: u64, stage: Stage },

    #[error("request {id}: {source}")]
    Transport {
        id: u64,
        #[source]
        source: TransportError,
    },

    #[error("request {id}: {source}")]
    Decode {
        id: u64,
        #[source]
        source: DecodeError,
    },
}

impl OperationError {
    pub fn id(&self) -> u64 {
        match self {
            OperationError::DeadlineExceeded { id, .. }
            | OperationError::Cancelled { id, .. }
            | OperationError::Transport { id, .. }
            | OperationError::Decode { id, .. } => *id,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            OperationError::DeadlineExceeded { .. } => FailureKind::DeadlineExceeded,
            OperationError::Cancelled { .. } => FailureKind::Cancelled,
            OperationError::Transport { .. } => FailureKind::Transport,
            OperationError::Decode { .. } => FailureKind::Decode,
        }
    }

    /// True for failures produced by the racing logic rather than the work itself.
    pub fn is_interruption(&self) -> bool {
        matches!(
            self.kind(),
            FailureKind::DeadlineExceeded | FailureKind::Cancelled
        )
    }
}

/// Outcome of an aggregated batch.
///
/// `records` and `errors` are in completion order. `pending` lists the
/// identifiers (in input order) still outstanding when the batch stopped
/// waiting.
#[derive(Debug)]
pub struct BatchResult<R> {
    pub records: Vec<R>,
    pub errors: Vec<OperationError>,
    pub pending: Vec<u64>,
    pub dispatched: usize,
}

impl<R> BatchResult<R> {
    pub(crate) fn with_capacity(dispatched: usize) -> Self {
        Self {
            records: Vec::with_capacity(dispatched),
            errors: Vec::new(),
            pending: Vec::new(),
            dispatched,
        }
    }

    /// "count + first cause" summary, if anything failed.
    pub fn failure(&self) -> Option<BatchFailure<'_>> {
        self.errors.first().map(|first| BatchFailure {
            count: self.errors.len(),
            first,
        })
    }

    /// Every dispatched operation reached a terminal outcome.
    pub fn is_complete(&self) -> bool {
        self.pending.is_empty()
    }

    /// Every dispatched operation succeeded.
    pub fn is_success(&self) -> bool {
        self.records.len() == self.dispatched
    }

    /// Split into the records, or an error that still carries them.
    pub fn into_result(self) -> Result<Vec<R>, BatchError<R>> {
        let mut errors = self.errors.into_iter();
        match errors.next() {
            None => Ok(self.records),
            Some(first) => Err(BatchError {
                records: self.records,
                count: errors.len() + 1,
                first,
                rest: errors.collect(),
            }),
        }
    }
}

/// Borrowed summary of a batch's failures.
#[derive(Debug, Clone, Copy)]
pub struct BatchFailure<'a> {
    pub count: usize,
    pub first: &'a OperationError,
}

impl fmt::Display for BatchFailure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors occurred: {}", self.count, self.first)
    }
}

/// A batch with at least one failure, keeping the partial records.
#[derive(Debug)]
pub struct BatchError<R> {
    pub records: Vec<R>,
    pub count: usize,
    pub first: OperationError,
    pub rest: Vec<OperationError>,
}

impl<R> fmt::Display for BatchError<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} errors occurred: {}", self.count, self.first)
    }
}

impl<R: fmt::Debug> std::error::Error for BatchError<R> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.first)
    }
}
