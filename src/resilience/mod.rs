//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call:
//!     → timeouts.rs (Deadline anchored at operation start)
//!     → race(future, deadline, cancel)
//!     → Ok(output) | Err(Interrupted::{Cancelled, DeadlineExceeded})
//! ```
//!
//! # Design Decisions
//! - Every outbound call has a deadline
//! - Cancellation is cooperative: a suspension point is only interruptible
//!   if it is raced against the token
//! - No retries: a failed call is surfaced as-is

pub mod timeouts;

pub use timeouts::{race, Deadline, Interrupted};
