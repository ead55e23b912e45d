//! Fetch subsystem: the collaborators a bounded operation calls into.
//!
//! # Data Flow
//! ```text
//! BoundedOperation
//!     → client.rs (Fetcher: id + FetchContext → raw bytes | TransportError)
//!     → decode.rs (Decoder: raw bytes → record | DecodeError)
//!     → types.rs (Todo record, error types)
//! ```
//!
//! # Design Decisions
//! - Transport and decoding sit behind traits so tests can stub them
//! - The transport observes the caller's cancellation token and time budget
//! - Non-success HTTP statuses are transport failures, not decode failures

pub mod client;
pub mod decode;
pub mod types;

pub use client::{FetchContext, Fetcher, HttpFetcher};
pub use decode::{Decoder, JsonDecoder};
pub use types::{DecodeError, Todo, TransportError};
