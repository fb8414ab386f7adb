//! Protocol Event Dispatcher
//!
//! Consumes raw SSE `data:` payloads and, per protocol variant, decodes
//! provider-specific JSON deltas into normalized [`StreamEvent`]s.
//!
//! One dispatcher instance per in-flight request; not reused. The state
//! machine is `STREAMING -> FINISHED`: once a terminal frame has been
//! observed (`[DONE]`, `finish_reason`, `response.completed`,
//! `response.failed`, or an unparseable chat frame), a one-shot latch makes
//! every further invocation a no-op, so stray frames after termination can
//! never produce a second terminal event.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::routing::ProtocolVariant;
use crate::streaming::StreamEvent;

/// Per-request decoder state for one protocol variant.
#[derive(Debug, Clone)]
pub struct EventDispatcher {
    variant: ProtocolVariant,
    finished: Arc<AtomicBool>,
    /// Responses API only: whether any text delta has been emitted, so the
    /// terminal frames know whether to synthesize the full text.
    streamed_text: Arc<AtomicBool>,
}

impl EventDispatcher {
    pub fn new(variant: ProtocolVariant) -> Self {
        Self {
            variant,
            finished: Arc::new(AtomicBool::new(false)),
            streamed_text: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether the terminal event has been emitted.
    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Decode one SSE frame payload into zero or more events.
    pub fn dispatch(&self, raw: &str) -> Vec<StreamEvent> {
        if self.is_finished() {
            tracing::debug!("ignoring frame after terminal event");
            return Vec::new();
        }
        match self.variant {
            ProtocolVariant::ChatCompletions | ProtocolVariant::LegacyCompletion => {
                self.dispatch_completion(raw)
            }
            ProtocolVariant::Responses => self.dispatch_responses(raw),
        }
    }

    /// Report a transport-level failure: one `Error`, then the terminal
    /// `Finished` so waiting consumers are unblocked. Latch-guarded like
    /// every other terminal path.
    pub fn fail(&self, message: impl Into<String>) -> Vec<StreamEvent> {
        if self.is_finished() {
            return Vec::new();
        }
        let mut events = vec![StreamEvent::error(message)];
        events.extend(self.finish("error"));
        events
    }

    /// Called when the SSE stream closes without any terminal frame, e.g. a
    /// dropped connection. Emits `Finished("unknown")` so callers never
    /// hang waiting for termination.
    pub fn handle_stream_end(&self) -> Vec<StreamEvent> {
        self.finish("unknown").into_iter().collect()
    }

    /// One-shot terminal transition.
    fn finish(&self, reason: &str) -> Option<StreamEvent> {
        if self.finished.swap(true, Ordering::AcqRel) {
            return None;
        }
        Some(StreamEvent::finished(reason))
    }

    /// Chat-completions and legacy-completion frames share one shape:
    /// `choices[0]` with either a terminal `finish_reason` or a delta.
    fn dispatch_completion(&self, raw: &str) -> Vec<StreamEvent> {
        let json: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                // `[DONE]` is the benign unparseable frame; anything else is
                // reported. Either way the stream is over.
                let mut events = Vec::new();
                if raw.trim() != "[DONE]" {
                    events.push(StreamEvent::error(format!(
                        "Failed to parse stream frame: {e}"
                    )));
                }
                events.extend(self.finish("stop"));
                return events;
            }
        };

        let mut events = Vec::new();

        // Groq extension: inline error object alongside regular choices.
        if let Some(err) = json.pointer("/x_groq/error")
            && !err.is_null()
        {
            events.push(StreamEvent::error(extract_error_message(err)));
        }

        let Some(choice) = json.get("choices").and_then(|c| c.get(0)) else {
            // Keep-alive or metadata-only frame.
            return events;
        };

        if let Some(reason) = choice.get("finish_reason").and_then(|r| r.as_str()) {
            events.extend(self.finish(reason));
            return events;
        }

        let (content, role) = match self.variant {
            ProtocolVariant::LegacyCompletion => (
                choice
                    .get("text")
                    .and_then(|t| t.as_str())
                    .unwrap_or_default(),
                "",
            ),
            _ => {
                let delta = choice.get("delta");
                (
                    delta
                        .and_then(|d| d.get("content"))
                        .and_then(|c| c.as_str())
                        .unwrap_or_default(),
                    delta
                        .and_then(|d| d.get("role"))
                        .and_then(|r| r.as_str())
                        .unwrap_or_default(),
                )
            }
        };
        if !content.is_empty() || !role.is_empty() {
            events.push(StreamEvent::delta(content, role));
        }
        events
    }

    /// Responses API frames are typed `response.*` events with no `[DONE]`
    /// sentinel.
    fn dispatch_responses(&self, raw: &str) -> Vec<StreamEvent> {
        let json: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                // This protocol has no non-JSON sentinel; a bad frame is
                // reported but does not terminate the stream.
                return vec![StreamEvent::error(format!(
                    "Failed to parse stream frame: {e}"
                ))];
            }
        };

        let event_type = json.get("type").and_then(|t| t.as_str()).unwrap_or_default();
        match event_type {
            "response.output_text.delta" => {
                let delta = json.get("delta").and_then(|d| d.as_str()).unwrap_or_default();
                if delta.is_empty() {
                    return Vec::new();
                }
                self.streamed_text.store(true, Ordering::Release);
                vec![StreamEvent::delta(delta, "assistant")]
            }
            "response.output_text.done" => {
                // Provider skipped deltas (or we missed them): surface the
                // full text once.
                if self.streamed_text.load(Ordering::Acquire) {
                    return Vec::new();
                }
                let text = json.get("text").and_then(|t| t.as_str()).unwrap_or_default();
                if text.is_empty() {
                    return Vec::new();
                }
                self.streamed_text.store(true, Ordering::Release);
                vec![StreamEvent::delta(text, "assistant")]
            }
            "response.completed" => {
                let mut events = Vec::new();
                if !self.streamed_text.load(Ordering::Acquire) {
                    let text = collect_output_text(&json);
                    if !text.is_empty() {
                        events.push(StreamEvent::delta(text, "assistant"));
                    }
                }
                events.extend(self.finish("stop"));
                events
            }
            "response.incomplete" => {
                let reason = json
                    .pointer("/response/incomplete_details/reason")
                    .and_then(|r| r.as_str())
                    .unwrap_or("incomplete");
                self.finish(reason).into_iter().collect()
            }
            "response.failed" | "error" => {
                let mut events = vec![StreamEvent::error(responses_error_message(&json))];
                events.extend(self.finish("error"));
                events
            }
            other => {
                tracing::debug!(event_type = other, "ignoring unrecognized responses event");
                Vec::new()
            }
        }
    }
}

/// Final-text synthesis for `response.completed` frames that arrive before
/// any delta was seen: concatenate every `output_text` part under
/// `response.output[].content[]`.
fn collect_output_text(json: &Value) -> String {
    let mut text = String::new();
    if let Some(output) = json.pointer("/response/output").and_then(|o| o.as_array()) {
        for item in output {
            if let Some(parts) = item.get("content").and_then(|c| c.as_array()) {
                for part in parts {
                    if part.get("type").and_then(|t| t.as_str()) == Some("output_text")
                        && let Some(s) = part.get("text").and_then(|t| t.as_str())
                    {
                        text.push_str(s);
                    }
                }
            }
        }
    }
    text
}

/// Best-effort error message for `response.failed` / `error` frames.
fn responses_error_message(json: &Value) -> String {
    for path in ["/response/error/message", "/error/message", "/message"] {
        if let Some(msg) = json.pointer(path).and_then(|m| m.as_str())
            && !msg.is_empty()
        {
            return msg.to_string();
        }
    }
    "unknown provider error".to_string()
}

/// Reduce the several inline provider error shapes (`{detail}`,
/// `{error:{message}}`, `{message}`, bare string) to a single message.
pub fn extract_error_message(value: &Value) -> String {
    if let Some(s) = value.as_str() {
        return s.to_string();
    }
    for path in ["/detail", "/error/message", "/message", "/error"] {
        if let Some(found) = value.pointer(path) {
            if let Some(s) = found.as_str() {
                return s.to_string();
            }
            if !found.is_null() {
                return found.to_string();
            }
        }
    }
    value.to_string()
}
