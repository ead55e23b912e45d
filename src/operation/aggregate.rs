//! Concurrent fan-out of bounded operations.
//!
//! # Responsibilities
//! - Dispatch one bounded operation per identifier, all at once
//! - Collect outcomes through a single-consumer channel
//! - Stop waiting when every operation reported or the shared deadline fires
//!
//! # Design Decisions
//! - No lock: each task sends `(index, outcome)` and only the collector
//!   mutates the batch result
//! - A child interrupted by the batch deadline or token is still pending;
//!   one that timed out or was cancelled on its own is a failure
//! - Pending operations are omitted unless `PendingPolicy::ReportCancelled`

use std::time::Duration;

use rand::Rng;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::fetch::{Decoder, Fetcher};
use crate::operation::bounded::BoundedOperation;
use crate::operation::outcome::{BatchResult, OperationError, Outcome, Stage};
use crate::resilience::{race, Deadline};

/// What happens to operations still outstanding when the batch stops waiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PendingPolicy {
    /// Leave them out of the result entirely.
    #[default]
    Omit,
    /// Report each one as a `Cancelled` failure.
    ReportCancelled,
}

/// Runs many bounded operations against one deadline/cancellation scope.
pub struct Aggregator<F, D> {
    operation: BoundedOperation<F, D>,
    stage_delay: Duration,
    stage_jitter: Duration,
    pending_policy: PendingPolicy,
}

impl<F, D> Aggregator<F, D>
where
    F: Fetcher,
    D: Decoder,
{
    pub fn new(operation: BoundedOperation<F, D>) -> Self {
        Self {
            operation,
            stage_delay: Duration::ZERO,
            stage_jitter: Duration::ZERO,
            pending_policy: PendingPolicy::default(),
        }
    }

    /// Artificial latency applied to every operation before its request.
    pub fn stage_delay(mut self, delay: Duration) -> Self {
        self.stage_delay = delay;
        self
    }

    /// Upper bound of a random extra delay added per operation.
    pub fn stage_jitter(mut self, jitter: Duration) -> Self {
        self.stage_jitter = jitter;
        self
    }

    pub fn pending_policy(mut self, policy: PendingPolicy) -> Self {
        self.pending_policy = policy;
        self
    }

    /// Run one operation per identifier and reduce their outcomes.
    ///
    /// Duplicated identifiers are dispatched independently.
    pub async fn run_all(
        &self,
        ids: &[u64],
        deadline: Deadline,
        cancel: &CancellationToken,
    ) -> BatchResult<D::Record> {
        let mut result = BatchResult::with_capacity(ids.len());
        if ids.is_empty() {
            return result;
        }

        let batch_id = Uuid::new_v4();
        let start = Instant::now();
        let scope = cancel.child_token();
        let _abandon = scope.clone().drop_guard();

        tracing::info!(
            batch_id = %batch_id,
            operations = ids.len(),
            budget_ms = deadline.budget().as_millis() as u64,
            "Dispatching batch"
        );

        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, Outcome<D::Record>)>();
        for (index, &id) in ids.iter().enumerate() {
            let tx = tx.clone();
            let operation = self.operation.clone();
            let scope = scope.clone();
            let delay = self.delay_for_next();

            tokio::spawn(async move {
                let outcome = operation.run(id, delay, deadline, &scope).await;
                // The collector may already have stopped waiting.
                let _ = tx.send((index, outcome));
            });
        }
        drop(tx);

        let mut outstanding = vec![true; ids.len()];
        let mut remaining = ids.len();

        while remaining > 0 {
            match race(rx.recv(), &deadline, cancel).await {
                Ok(Some((index, outcome))) => {
                    match outcome {
                        Ok(record) => result.records.push(record),
                        // Interrupted by the batch's own deadline or token: still pending.
                        Err(e)
                            if e.is_interruption()
                                && (deadline.is_expired() || cancel.is_cancelled()) =>
                        {
                            tracing::trace!(batch_id = %batch_id, error = %e, "Operation interrupted");
                            continue;
                        }
                        Err(e) => {
                            tracing::warn!(batch_id = %batch_id, error = %e, "Operation failed");
                            result.errors.push(e);
                        }
                    }
                    outstanding[index] = false;
                    remaining -= 1;
                }
                Ok(None) => break,
                Err(interrupted) => {
                    tracing::info!(
                        batch_id = %batch_id,
                        outstanding = remaining,
                        reason = %interrupted,
                        "Batch stopped waiting"
                    );
                    break;
                }
            }
        }

        result.pending = ids
            .iter()
            .zip(&outstanding)
            .filter_map(|(&id, &pending)| pending.then_some(id))
            .collect();

        if self.pending_policy == PendingPolicy::ReportCancelled {
            result
                .errors
                .extend(result.pending.iter().map(|&id| OperationError::Cancelled {
                    id,
                    stage: Stage::Waiting,
                }));
        }

        tracing::info!(
            batch_id = %batch_id,
            succeeded = result.records.len(),
            failed = result.errors.len(),
            pending = result.pending.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Batch finished"
        );

        result
    }

    fn delay_for_next(&self) -> Duration {
        let jitter_ms = self.stage_jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return self.stage_delay;
        }
        self.stage_delay + Duration::from_millis(rand::thread_rng().gen_range(0..=jitter_ms))
    }
}
