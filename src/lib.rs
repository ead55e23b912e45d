//! Deadline-bounded, cancellable fetches and their concurrent aggregation.

pub mod config;
pub mod display;
pub mod fetch;
pub mod lifecycle;
pub mod observability;
pub mod operation;
pub mod resilience;

pub use config::DemoConfig;
pub use fetch::{Decoder, Fetcher, HttpFetcher, JsonDecoder, Todo};
pub use lifecycle::Shutdown;
pub use operation::{Aggregator, BatchResult, BoundedOperation, OperationError, PendingPolicy};
pub use resilience::Deadline;
