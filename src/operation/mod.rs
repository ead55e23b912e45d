//! Bounded operations and their aggregation.
//!
//! # Data Flow
//! ```text
//! Aggregator::run_all(ids, deadline, cancel)
//!     → one task per id
//!         → BoundedOperation::run(id, delay, deadline, scope)
//!             → worker task: delay → Fetcher → Decoder
//!             → oneshot notification raced against deadline/cancel
//!     → mpsc (index, Outcome) → collector
//!     → BatchResult { records, errors, pending }
//! ```
//!
//! # Design Decisions
//! - Exactly one outcome per operation
//! - A failure never aborts sibling operations
//! - Batch failures are summarized as "count + first cause"; the full list
//!   is kept alongside

pub mod aggregate;
pub mod bounded;
pub mod outcome;

pub use aggregate::{Aggregator, PendingPolicy};
pub use bounded::BoundedOperation;
pub use outcome::{
    BatchError, BatchFailure, BatchResult, FailureKind, OperationError, Outcome, Stage,
};
