//! Stream Event Types
//!
//! The Rust mapping of the engine's event contract. Instead of an
//! `onMessage`/`onError`/`onFinished` callback triple, the engine hands the
//! caller a pull-based stream: each item is consumed one at a time, in
//! order, and the transport does not read further bytes until the consumer
//! has taken the previous item.
//!
//! Two invariants carry over from the callback contract:
//! - `Error` items are non-terminal. A subsequent `Finished` item always
//!   follows so consumers waiting for termination are unblocked.
//! - `Finished` is emitted exactly once per request, guarded by the
//!   dispatcher's one-shot latch.

use futures::Stream;
use std::pin::Pin;

/// One normalized emission from the protocol event dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// An incremental fragment of generated text.
    Delta { content: String, role: String },
    /// A non-terminal error report, reduced to a single message string.
    Error { message: String },
    /// Terminal signal with the provider's finish reason. Exactly one per
    /// request.
    Finished { reason: String },
}

impl StreamEvent {
    pub fn delta(content: impl Into<String>, role: impl Into<String>) -> Self {
        Self::Delta {
            content: content.into(),
            role: role.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn finished(reason: impl Into<String>) -> Self {
        Self::Finished {
            reason: reason.into(),
        }
    }
}

/// Stream of normalized events for one `send_message` call.
///
/// Finite, not restartable; terminated by a single `Finished` item unless
/// the request was cancelled mid-flight.
pub type MessageStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;
