//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     CancellationToken scope → child tokens per scenario / operation
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger → in-flight operations cancelled
//! ```
//!
//! # Design Decisions
//! - Cancellation is cooperative and hierarchical (child tokens)
//! - A signal cancels waiting; abandoned work stops at its next suspension point

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
