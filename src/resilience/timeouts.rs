//! Timeout enforcement.
//!
//! # Responsibilities
//! - Represent a deadline anchored to the start of an operation
//! - Race a future against that deadline and a cancellation token
//!
//! # Design Decisions
//! - Uses Tokio's clock, so paused-time tests control every deadline
//! - Timeout and cancellation are distinct outcomes
//! - The race is biased: a ready result beats a deadline firing in the same poll

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// A point in time after which a caller stops waiting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    /// Deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// The instant the deadline fires.
    pub fn at(&self) -> Instant {
        self.start + self.budget
    }

    /// The total budget this deadline was created with.
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left before the deadline fires (zero once expired).
    pub fn remaining(&self) -> Duration {
        self.at().saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at()
    }

    /// Completes when the deadline fires.
    pub async fn expired(&self) {
        sleep_until(self.at()).await
    }
}

/// Why a raced future was abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Interrupted {
    #[error("cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,
}

/// Await `future` unless `cancel` fires or `deadline` passes first.
///
/// The future is dropped when the race is lost. Polling order is: the future,
/// then the cancellation token, then the deadline.
pub async fn race<F>(
    future: F,
    deadline: &Deadline,
    cancel: &CancellationToken,
) -> Result<F::Output, Interrupted>
where
    F: Future,
{
    tokio::select! {
        biased;
        output = future => Ok(output),
        _ = cancel.cancelled() => Err(Interrupted::Cancelled),
        _ = deadline.expired() => Err(Interrupted::DeadlineExceeded),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    fn assert_elapsed(start: Instant, expected: Duration) {
        let elapsed = start.elapsed();
        assert!(
            elapsed >= expected && elapsed < expected + Duration::from_millis(10),
            "expected ~{:?}, got {:?}",
            expected,
            elapsed
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_returns_output_before_deadline() {
        let deadline = Deadline::after(Duration::from_secs(2));
        let cancel = CancellationToken::new();

        let result = race(
            async {
                sleep(Duration::from_secs(1)).await;
                42
            },
            &deadline,
            &cancel,
        )
        .await;

        assert_eq!(result, Ok(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_deadline_fires_at_budget() {
        let start = Instant::now();
        let deadline = Deadline::after(Duration::from_secs(2));
        let cancel = CancellationToken::new();

        let result = race(sleep(Duration::from_secs(3)), &deadline, &cancel).await;

        assert_eq!(result, Err(Interrupted::DeadlineExceeded));
        assert_elapsed(start, Duration::from_secs(2));
        assert!(deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_race_cancelled_before_deadline() {
        let deadline = Deadline::after(Duration::from_secs(5));
        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            sleep(Duration::from_secs(1)).await;
            trigger.cancel();
        });

        let start = Instant::now();
        let result = race(std::future::pending::<()>(), &deadline, &cancel).await;

        assert_eq!(result, Err(Interrupted::Cancelled));
        assert_elapsed(start, Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_output_wins_over_expired_deadline() {
        let deadline = Deadline::after(Duration::ZERO);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = race(async { "done" }, &deadline, &cancel).await;
        assert_eq!(result, Ok("done"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_wins_over_expired_deadline() {
        let deadline = Deadline::after(Duration::ZERO);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = race(std::future::pending::<()>(), &deadline, &cancel).await;
        assert_eq!(result, Err(Interrupted::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_shrinks_with_time() {
        let deadline = Deadline::after(Duration::from_secs(5));
        sleep(Duration::from_secs(3)).await;
        assert!(deadline.remaining() <= Duration::from_secs(2));
        assert!(deadline.remaining() > Duration::from_millis(1990));
        assert_eq!(deadline.budget(), Duration::from_secs(5));
    }
}
