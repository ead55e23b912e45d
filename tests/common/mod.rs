//! Shared stubs for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bounded_fetch::fetch::{FetchContext, Fetcher, JsonDecoder, Todo, TransportError};
use bounded_fetch::operation::BoundedOperation;
use futures_util::future::BoxFuture;
use tokio::time::Instant;

/// What the stub returns once its latency has elapsed.
#[derive(Debug, Clone)]
pub enum Reply {
    Todo,
    Garbage,
    Error(TransportError),
    Hang,
}

/// Scripted behavior for one identifier.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub latency: Duration,
    pub reply: Reply,
}

impl Behavior {
    pub fn ok() -> Self {
        Self::ok_after(Duration::ZERO)
    }

    pub fn ok_after(latency: Duration) -> Self {
        Self { latency, reply: Reply::Todo }
    }

    pub fn fail(err: TransportError) -> Self {
        Self::fail_after(Duration::ZERO, err)
    }

    pub fn fail_after(latency: Duration, err: TransportError) -> Self {
        Self { latency, reply: Reply::Error(err) }
    }

    pub fn garbage() -> Self {
        Self { latency: Duration::ZERO, reply: Reply::Garbage }
    }

    pub fn hang() -> Self {
        Self { latency: Duration::ZERO, reply: Reply::Hang }
    }
}

/// Counters observed by tests after the fact.
#[derive(Debug, Default)]
pub struct Calls {
    pub started: AtomicUsize,
    pub completed: AtomicUsize,
    pub cancelled: AtomicUsize,
}

impl Calls {
    pub fn started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    pub fn cancelled(&self) -> usize {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Fetcher that follows a script instead of touching the network.
pub struct StubFetcher {
    behaviors: HashMap<u64, Behavior>,
    default: Behavior,
    pub calls: Arc<Calls>,
}

impl StubFetcher {
    pub fn new(default: Behavior) -> Self {
        Self {
            behaviors: HashMap::new(),
            default,
            calls: Arc::new(Calls::default()),
        }
    }

    pub fn with(mut self, id: u64, behavior: Behavior) -> Self {
        self.behaviors.insert(id, behavior);
        self
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, id: u64, ctx: FetchContext) -> BoxFuture<'_, Result<Vec<u8>, TransportError>> {
        let behavior = self.behaviors.get(&id).unwrap_or(&self.default).clone();
        let calls = Arc::clone(&self.calls);

        Box::pin(async move {
            calls.started.fetch_add(1, Ordering::SeqCst);

            tokio::select! {
                _ = tokio::time::sleep(behavior.latency) => {}
                _ = ctx.cancel.cancelled() => {
                    calls.cancelled.fetch_add(1, Ordering::SeqCst);
                    return Err(TransportError::Cancelled);
                }
            }

            let reply = match behavior.reply {
                Reply::Todo => Ok(todo_json(id)),
                Reply::Garbage => Ok(b"<html>502 Bad Gateway</html>".to_vec()),
                Reply::Error(err) => Err(err),
                Reply::Hang => {
                    ctx.cancel.cancelled().await;
                    calls.cancelled.fetch_add(1, Ordering::SeqCst);
                    return Err(TransportError::Cancelled);
                }
            };
            calls.completed.fetch_add(1, Ordering::SeqCst);
            reply
        })
    }
}

pub fn todo_json(id: u64) -> Vec<u8> {
    format!(
        r#"{{"userId": {}, "id": {}, "title": "todo number {}", "completed": {}}}"#,
        (id + 9) / 10,
        id,
        id,
        id % 2 == 0
    )
    .into_bytes()
}

pub type StubOperation = BoundedOperation<StubFetcher, JsonDecoder<Todo>>;

/// Build an operation over `fetcher`, returning its call counters too.
pub fn operation(fetcher: StubFetcher) -> (StubOperation, Arc<Calls>) {
    let calls = Arc::clone(&fetcher.calls);
    (BoundedOperation::new(fetcher, JsonDecoder::new()), calls)
}

pub fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

/// Assert that `start` was roughly `expected` ago on the (paused) Tokio clock.
pub fn assert_elapsed(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(50),
        "expected ~{:?}, got {:?}",
        expected,
        elapsed
    );
}
