//! Deadline-bounded, cancellable fetch.
//!
//! # Responsibilities
//! - Run the stage sequence delay → fetch → decode on its own task
//! - Deliver exactly one outcome through a oneshot channel
//! - Stop waiting when the deadline passes or the caller's token fires
//!
//! # Design Decisions
//! - The worker observes a child token at every suspension point, and the
//!   child token is cancelled when the caller stops waiting, so abandoned
//!   work does not keep running
//! - A send on the closed oneshot after abandonment is ignored

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::fetch::{Decoder, FetchContext, Fetcher, TransportError};
use crate::operation::outcome::{OperationError, Outcome, Stage};
use crate::resilience::{race, Deadline, Interrupted};

/// Wraps a fetcher and decoder with a deadline/cancellation race.
pub struct BoundedOperation<F, D> {
    fetcher: Arc<F>,
    decoder: Arc<D>,
}

impl<F, D> BoundedOperation<F, D>
where
    F: Fetcher,
    D: Decoder,
{
    pub fn new(fetcher: F, decoder: D) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            decoder: Arc::new(decoder),
        }
    }

    /// Run one operation and wait for its outcome.
    ///
    /// Returns at the latest when `deadline` passes or `cancel` fires. The
    /// work is abandoned at that point and its own token is cancelled.
    pub async fn run(
        &self,
        id: u64,
        stage_delay: Duration,
        deadline: Deadline,
        cancel: &CancellationToken,
    ) -> Outcome<D::Record> {
        let start = Instant::now();
        let scope = cancel.child_token();
        let _abandon = scope.clone().drop_guard();

        let notification = self.launch(id, stage_delay, deadline, scope);

        let outcome = match race(notification, &deadline, cancel).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(OperationError::Transport {
                id,
                source: TransportError::WorkerLost,
            }),
            Err(interrupted) => Err(interruption(id, interrupted, Stage::Waiting, &deadline)),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => tracing::debug!(id, elapsed_ms, "Operation succeeded"),
            Err(e) => tracing::debug!(id, elapsed_ms, error = %e, "Operation failed"),
        }
        outcome
    }

    /// Start the work on its own task and return the notification channel.
    ///
    /// The task observes `scope` and `deadline` at every suspension point.
    fn launch(
        &self,
        id: u64,
        stage_delay: Duration,
        deadline: Deadline,
        scope: CancellationToken,
    ) -> oneshot::Receiver<Outcome<D::Record>> {
        let (tx, rx) = oneshot::channel();
        let fetcher = Arc::clone(&self.fetcher);
        let decoder = Arc::clone(&self.decoder);
        let span = tracing::debug_span!("bounded_operation", id);

        tokio::spawn(
            async move {
                let outcome =
                    execute(&*fetcher, &*decoder, id, stage_delay, deadline, &scope).await;
                if tx.send(outcome).is_err() {
                    tracing::trace!(id, "Caller stopped waiting, outcome dropped");
                }
            }
            .instrument(span),
        );

        rx
    }
}

impl<F, D> Clone for BoundedOperation<F, D> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            decoder: Arc::clone(&self.decoder),
        }
    }
}

async fn execute<F, D>(
    fetcher: &F,
    decoder: &D,
    id: u64,
    stage_delay: Duration,
    deadline: Deadline,
    scope: &CancellationToken,
) -> Outcome<D::Record>
where
    F: Fetcher,
    D: Decoder,
{
    tracing::debug!(
        id,
        delay_ms = stage_delay.as_millis() as u64,
        "Starting request"
    );

    if !stage_delay.is_zero() {
        race(tokio::time::sleep(stage_delay), &deadline, scope)
            .await
            .map_err(|i| interruption(id, i, Stage::Delay, &deadline))?;
    }

    let ctx = FetchContext {
        cancel: scope.clone(),
        budget: deadline.remaining(),
    };
    let bytes = race(fetcher.fetch(id, ctx), &deadline, scope)
        .await
        .map_err(|i| interruption(id, i, Stage::Transport, &deadline))?
        .map_err(|source| match source {
            TransportError::TimedOut => OperationError::DeadlineExceeded {
                id,
                budget: deadline.budget(),
            },
            TransportError::Cancelled => OperationError::Cancelled {
                id,
                stage: Stage::Transport,
            },
            source => OperationError::Transport { id, source },
        })?;

    decoder
        .decode(&bytes)
        .map_err(|source| OperationError::Decode { id, source })
}

fn interruption(id: u64, interrupted: Interrupted, stage: Stage, deadline: &Deadline) -> OperationError {
    match interrupted {
        Interrupted::Cancelled => OperationError::Cancelled { id, stage },
        Interrupted::DeadlineExceeded => OperationError::DeadlineExceeded {
            id,
            budget: deadline.budget(),
        },
    }
}
