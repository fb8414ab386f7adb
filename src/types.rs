//! Core Types
//!
//! Provider-neutral request and model types shared across the engine layers.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// One outbound message call, created per request and discarded after the
/// terminal stream event.
///
/// Sampling overrides are string-encoded: `None` and the empty string both
/// mean "use the provider default". This mirrors how the settings surface
/// hands values through and keeps malformed input permissive rather than
/// fatal.
#[derive(Debug, Clone)]
pub struct MessageRequest {
    /// System-style instruction, optional.
    pub role_prompt: Option<String>,
    /// User content, required.
    pub command_prompt: String,
    /// Optional per-call temperature override.
    pub temperature: Option<String>,
    /// Optional per-call frequency-penalty override.
    pub frequency_penalty: Option<String>,
    /// Optional per-call presence-penalty override.
    pub presence_penalty: Option<String>,
    /// Cooperative cancellation for the whole chain: HTTP transport, frame
    /// delivery, and downstream cache writes.
    pub cancel: CancellationToken,
}

impl MessageRequest {
    pub fn new(command_prompt: impl Into<String>) -> Self {
        Self {
            role_prompt: None,
            command_prompt: command_prompt.into(),
            temperature: None,
            frequency_penalty: None,
            presence_penalty: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_role_prompt(mut self, role_prompt: impl Into<String>) -> Self {
        self.role_prompt = Some(role_prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: impl Into<String>) -> Self {
        self.temperature = Some(temperature.into());
        self
    }

    pub fn with_frequency_penalty(mut self, penalty: impl Into<String>) -> Self {
        self.frequency_penalty = Some(penalty.into());
        self
    }

    pub fn with_presence_penalty(mut self, penalty: impl Into<String>) -> Self {
        self.presence_penalty = Some(penalty.into());
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// One entry from a provider's model listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub id: String,
    /// Display name; falls back to the id when the provider has none.
    pub name: String,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
        }
    }
}
