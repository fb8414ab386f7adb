//! Concrete provider adapters.
//!
//! Each provider only supplies credentials, endpoint, model, and capability
//! flags; all orchestration lives in the shared [`Engine`](super::Engine)
//! core.

use async_trait::async_trait;

use super::ProviderSpec;
use crate::config::ProviderSettings;
use crate::types::ModelInfo;

/// The canonical OpenAI endpoint.
pub struct OpenAiProvider {
    settings: ProviderSettings,
}

impl OpenAiProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl ProviderSpec for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn api_model(&self) -> String {
        self.settings.model.clone()
    }

    async fn api_key(&self) -> String {
        self.settings.api_key.clone()
    }

    async fn api_url(&self) -> String {
        self.settings.api_url.clone()
    }

    async fn api_url_path(&self) -> String {
        self.settings.api_url_path.clone()
    }

    fn supports_custom_model(&self) -> bool {
        true
    }

    fn default_models(&self) -> Vec<ModelInfo> {
        ["gpt-4o", "gpt-4o-mini", "gpt-4.1", "gpt-5", "o3-mini"]
            .into_iter()
            .map(ModelInfo::new)
            .collect()
    }
}

/// Groq's OpenAI-compatible endpoint. Streams the chat-completions shape
/// plus the `x_groq` inline-error extension, which the dispatcher
/// understands.
pub struct GroqProvider {
    settings: ProviderSettings,
}

impl GroqProvider {
    pub const DEFAULT_API_URL: &'static str = "https://api.groq.com/openai";

    pub fn new(mut settings: ProviderSettings) -> Self {
        if settings.api_url == crate::routing::DEFAULT_API_URL {
            settings.api_url = Self::DEFAULT_API_URL.to_string();
        }
        Self { settings }
    }
}

#[async_trait]
impl ProviderSpec for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn api_model(&self) -> String {
        self.settings.model.clone()
    }

    async fn api_key(&self) -> String {
        self.settings.api_key.clone()
    }

    async fn api_url(&self) -> String {
        self.settings.api_url.clone()
    }

    async fn api_url_path(&self) -> String {
        self.settings.api_url_path.clone()
    }

    fn supports_custom_model(&self) -> bool {
        true
    }

    fn default_models(&self) -> Vec<ModelInfo> {
        ["llama-3.3-70b-versatile", "mixtral-8x7b-32768"]
            .into_iter()
            .map(ModelInfo::new)
            .collect()
    }
}

/// Generic adapter for custom or self-hosted endpoints, including
/// Azure-style deployments that only speak the legacy completion shape.
/// Capability flags are configuration, not code.
pub struct CompatProvider {
    settings: ProviderSettings,
    chat_api: bool,
    model_listing: bool,
}

impl CompatProvider {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            settings,
            chat_api: true,
            model_listing: true,
        }
    }

    /// Route requests through the legacy completion protocol.
    pub const fn with_chat_api(mut self, chat_api: bool) -> Self {
        self.chat_api = chat_api;
        self
    }

    /// Declare that the endpoint has no `/v1/models` listing.
    pub const fn with_model_listing(mut self, model_listing: bool) -> Self {
        self.model_listing = model_listing;
        self
    }
}

#[async_trait]
impl ProviderSpec for CompatProvider {
    fn name(&self) -> &'static str {
        "compat"
    }

    async fn api_model(&self) -> String {
        self.settings.model.clone()
    }

    async fn api_key(&self) -> String {
        self.settings.api_key.clone()
    }

    async fn api_url(&self) -> String {
        self.settings.api_url.clone()
    }

    async fn api_url_path(&self) -> String {
        self.settings.api_url_path.clone()
    }

    fn is_chat_api(&self) -> bool {
        self.chat_api
    }

    fn supports_custom_model(&self) -> bool {
        true
    }

    fn supports_model_listing(&self) -> bool {
        self.model_listing
    }

    fn default_models(&self) -> Vec<ModelInfo> {
        if self.settings.model.is_empty() {
            Vec::new()
        } else {
            vec![ModelInfo::new(self.settings.model.clone())]
        }
    }
}
