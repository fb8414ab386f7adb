//! Test support: SSE body fixtures and stream draining helpers.

use futures_util::StreamExt;
use lingoflow::{MessageStream, StreamEvent};

/// Build a `text/event-stream` body from raw frame payloads.
pub fn sse_body(frames: &[&str]) -> String {
    let mut body = String::new();
    for frame in frames {
        body.push_str("data: ");
        body.push_str(frame);
        body.push_str("\n\n");
    }
    body
}

/// Drain a message stream to completion.
pub async fn collect_events(mut stream: MessageStream) -> Vec<StreamEvent> {
    let mut events = Vec::new();
    while let Some(event) = stream.next().await {
        events.push(event);
    }
    events
}

/// Concatenated delta content of an event sequence.
pub fn joined_content(events: &[StreamEvent]) -> String {
    events
        .iter()
        .filter_map(|e| match e {
            StreamEvent::Delta { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect()
}

/// Number of terminal events in a sequence; must always be 0 or 1.
pub fn finished_count(events: &[StreamEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, StreamEvent::Finished { .. }))
        .count()
}
