//! Streaming Transport
//!
//! Protocol-agnostic server-sent-events reader. Issues the HTTP request,
//! frames the response body with `eventsource-stream` (which handles line
//! buffering and UTF-8 chunk boundaries), and feeds each complete `data:`
//! payload to the request's [`EventDispatcher`].
//!
//! Two properties the rest of the engine depends on:
//! - Strict in-order, one-at-a-time delivery: the next frame is not read
//!   until the consumer has taken the events produced by the previous one.
//! - Failures never escape as panics or rejected futures. Network and HTTP
//!   errors become an in-stream `Error` followed by the terminal
//!   `Finished`, so a caller draining the stream always completes normally.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::streaming::dispatcher::{EventDispatcher, extract_error_message};
use crate::streaming::events::MessageStream;

/// Open an SSE stream for one prepared request.
///
/// Cancelling `cancel` aborts the underlying connection and stops frame
/// delivery; no terminal event is synthesized for a cancelled request.
pub fn open_sse_stream(
    request: reqwest::RequestBuilder,
    dispatcher: EventDispatcher,
    cancel: CancellationToken,
) -> MessageStream {
    let stream = async_stream::stream! {
        let response = tokio::select! {
            _ = cancel.cancelled() => return,
            res = request.send() => res,
        };

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                for ev in dispatcher.fail(format!("HTTP request failed: {e}")) {
                    yield ev;
                }
                return;
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(v) => extract_error_message(&v),
                Err(_) => body,
            };
            for ev in dispatcher.fail(format!("HTTP error {}: {message}", status.as_u16())) {
                yield ev;
            }
            return;
        }

        let mut frames = response.bytes_stream().eventsource();
        loop {
            let item = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("request cancelled, closing SSE stream");
                    return;
                }
                item = frames.next() => item,
            };
            let Some(item) = item else { break };

            match item {
                Ok(frame) => {
                    if frame.data.trim().is_empty() {
                        continue;
                    }
                    for ev in dispatcher.dispatch(&frame.data) {
                        yield ev;
                    }
                }
                Err(e) => {
                    for ev in dispatcher.fail(format!("SSE stream error: {e}")) {
                        yield ev;
                    }
                    return;
                }
            }

            // The terminal event has been delivered; drop the connection
            // instead of draining stray frames.
            if dispatcher.is_finished() {
                return;
            }
        }

        // Provider closed the stream without a terminal frame.
        for ev in dispatcher.handle_stream_end() {
            yield ev;
        }
    };

    Box::pin(stream)
}
