//! Engine Module
//!
//! The provider-neutral message-sending core. Provider differences are
//! confined to the [`ProviderSpec`] capability interface (credentials,
//! endpoint, model, feature flags); the orchestration in [`Engine`] —
//! protocol selection, header and body construction, streaming, dispatch —
//! is shared and non-generic, taking the capability interface as a
//! constructor dependency.

mod providers;

pub use providers::{CompatProvider, GroqProvider, OpenAiProvider};

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::request::build_body;
use crate::routing::{DEFAULT_API_URL, ProtocolVariant, RESPONSES_API_PATH, select_protocol};
use crate::streaming::{EventDispatcher, MessageStream, open_sse_stream};
use crate::types::{MessageRequest, ModelInfo};

/// Stable user-agent sent with every outbound request.
pub const USER_AGENT: &str = concat!("lingoflow/", env!("CARGO_PKG_VERSION"));

/// Sentinel model returned when a listing call fails outright.
const FALLBACK_MODEL: &str = "gpt-4o-mini";

/// Model-id markers for non-chat families, filtered out of listings from
/// the canonical endpoint. Custom endpoints pass through unfiltered.
const NON_CHAT_MODEL_MARKERS: &[&str] = &[
    "whisper",
    "tts",
    "dall-e",
    "embedding",
    "moderation",
    "audio",
    "realtime",
    "transcribe",
    "image",
    "davinci",
    "babbage",
];

/// Capability interface a concrete provider supplies.
///
/// Credential and endpoint lookups are async because real implementations
/// read them from an external settings store.
#[async_trait]
pub trait ProviderSpec: Send + Sync {
    /// Short identifier for logging.
    fn name(&self) -> &'static str;

    async fn api_model(&self) -> String;
    async fn api_key(&self) -> String;
    async fn api_url(&self) -> String;
    async fn api_url_path(&self) -> String;

    /// Whether the endpoint speaks the chat-completions shape. `false`
    /// routes to the legacy completion protocol.
    fn is_chat_api(&self) -> bool {
        true
    }

    /// Whether callers may supply model names outside the provider list.
    fn supports_custom_model(&self) -> bool {
        false
    }

    /// Whether the endpoint has a `/v1/models` listing at all.
    fn supports_model_listing(&self) -> bool {
        true
    }

    /// Static fallback list used when listing is unsupported.
    fn default_models(&self) -> Vec<ModelInfo> {
        Vec::new()
    }
}

/// Sending side of the engine, factored out so the translator façade can
/// be exercised against a scripted engine in tests.
#[async_trait]
pub trait MessageEngine: Send + Sync {
    /// Send one message and return its normalized event stream.
    ///
    /// Never fails at the call site: transport and provider errors arrive
    /// in-stream as `Error` + `Finished` events.
    async fn send_message(&self, request: MessageRequest) -> MessageStream;
}

/// Provider-neutral engine core.
pub struct Engine {
    spec: Arc<dyn ProviderSpec>,
    http: reqwest::Client,
}

impl Engine {
    pub fn new(spec: Arc<dyn ProviderSpec>) -> Self {
        Self {
            spec,
            http: reqwest::Client::new(),
        }
    }

    /// The model this engine currently sends.
    pub async fn get_model(&self) -> String {
        self.spec.api_model().await
    }

    /// List available models.
    ///
    /// Non-fatal by contract: endpoints without listing support get the
    /// provider's static list, and a failed listing call degrades to a
    /// single sentinel entry.
    pub async fn list_models(&self, api_key: Option<&str>) -> Vec<ModelInfo> {
        if !self.spec.supports_model_listing() {
            return self.spec.default_models();
        }

        let api_url = self.spec.api_url().await;
        let key = match api_key {
            Some(k) => k.to_string(),
            None => self.spec.api_key().await,
        };
        let url = format!("{}/v1/models", api_url.trim_end_matches('/'));

        match self.fetch_models(&url, &key).await {
            Ok(models) => {
                if api_url.trim_end_matches('/') == DEFAULT_API_URL {
                    models
                        .into_iter()
                        .filter(|m| is_chat_model(&m.id))
                        .collect()
                } else {
                    models
                }
            }
            Err(e) => {
                tracing::warn!(provider = self.spec.name(), error = %e, "model listing failed, using sentinel");
                let mut model = self.spec.api_model().await;
                if model.is_empty() {
                    model = FALLBACK_MODEL.to_string();
                }
                vec![ModelInfo::new(model)]
            }
        }
    }

    async fn fetch_models(&self, url: &str, key: &str) -> Result<Vec<ModelInfo>, String> {
        let response = self
            .http
            .get(url)
            .bearer_auth(key)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;
        if !response.status().is_success() {
            return Err(format!("HTTP {}", response.status().as_u16()));
        }
        let json: Value = response
            .json()
            .await
            .map_err(|e| format!("malformed response: {e}"))?;
        let data = json
            .get("data")
            .and_then(|d| d.as_array())
            .ok_or_else(|| "missing data array".to_string())?;
        Ok(data
            .iter()
            .filter_map(|m| m.get("id").and_then(|id| id.as_str()))
            .map(ModelInfo::new)
            .collect())
    }
}

#[async_trait]
impl MessageEngine for Engine {
    async fn send_message(&self, request: MessageRequest) -> MessageStream {
        let model = self.spec.api_model().await;
        let api_url = self.spec.api_url().await;
        let api_url_path = self.spec.api_url_path().await;

        let variant = select_protocol(&api_url, &api_url_path, &model, self.spec.is_chat_api());
        let url = endpoint_url(variant, &api_url, &api_url_path);
        let body = build_body(variant, &model, &request);

        tracing::debug!(
            provider = self.spec.name(),
            model,
            variant = variant.as_str(),
            url,
            "sending message"
        );

        let builder = self
            .http
            .post(&url)
            .bearer_auth(self.spec.api_key().await)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(&body);

        open_sse_stream(builder, EventDispatcher::new(variant), request.cancel.clone())
    }
}

/// Resolve the full endpoint URL for a variant. The Responses API has a
/// fixed path; the other variants use the configured one.
fn endpoint_url(variant: ProtocolVariant, api_url: &str, api_url_path: &str) -> String {
    let base = api_url.trim_end_matches('/');
    match variant {
        ProtocolVariant::Responses => format!("{base}{RESPONSES_API_PATH}"),
        _ => format!("{base}{api_url_path}"),
    }
}

fn is_chat_model(id: &str) -> bool {
    let id = id.to_ascii_lowercase();
    !NON_CHAT_MODEL_MARKERS.iter().any(|m| id.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_url_pins_responses_path() {
        assert_eq!(
            endpoint_url(ProtocolVariant::Responses, "https://api.openai.com/", "/v1/chat/completions"),
            "https://api.openai.com/v1/responses"
        );
        assert_eq!(
            endpoint_url(ProtocolVariant::ChatCompletions, "https://api.openai.com", "/v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn non_chat_families_are_filtered() {
        for id in ["whisper-1", "tts-1-hd", "dall-e-3", "text-embedding-3-small", "omni-moderation-latest", "gpt-4o-audio-preview"] {
            assert!(!is_chat_model(id), "{id}");
        }
        for id in ["gpt-4o", "gpt-4.1-mini", "o3", "gpt-5"] {
            assert!(is_chat_model(id), "{id}");
        }
    }
}
