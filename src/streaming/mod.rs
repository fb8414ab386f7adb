//! Streaming Module
//!
//! Everything between an HTTP response body and the normalized event
//! stream handed to callers:
//! - SSE transport (in-order frame delivery, cancellation)
//! - per-protocol event dispatch with idempotent termination
//! - the `StreamEvent`/`MessageStream` contract

pub mod dispatcher;
mod events;
mod transport;

pub use dispatcher::{EventDispatcher, extract_error_message};
pub use events::{MessageStream, StreamEvent};
pub use transport::open_sse_stream;
