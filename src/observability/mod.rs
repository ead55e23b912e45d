//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! operation/ and main emit tracing events
//!     → logging.rs (subscriber, filter, format)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - Structured fields (`id`, `batch_id`, `elapsed_ms`, `error`) on every event
//! - Per-operation spans carry the identifier

pub mod logging;

pub use logging::init_tracing;
