//! Configuration Module
//!
//! Explicitly passed settings objects. The engine and the translator façade
//! take these through their constructors; there is no ambient global state.

use std::time::Duration;

use crate::routing::{DEFAULT_API_URL, DEFAULT_CHAT_COMPLETIONS_PATH};

/// Per-provider connection settings, read from whatever settings store the
/// embedding application uses and handed to a provider at construction time.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Bearer credential for the provider.
    pub api_key: String,
    /// Base URL, without a trailing slash (e.g. `https://api.openai.com`).
    pub api_url: String,
    /// Endpoint path appended to the base URL for chat/legacy calls.
    pub api_url_path: String,
    /// Model identifier sent in request bodies.
    pub model: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            api_url_path: DEFAULT_CHAT_COMPLETIONS_PATH.to_string(),
            model: String::new(),
        }
    }
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_api_url_path(mut self, path: impl Into<String>) -> Self {
        self.api_url_path = path.into();
        self
    }
}

/// Tunables for the translator façade: retry, timeout, and cache behavior.
#[derive(Debug, Clone)]
pub struct TranslatorConfig {
    /// Maximum number of engine attempts per logical call (first try
    /// included).
    pub max_retries: u32,
    /// Base delay between attempts; the actual delay grows linearly with
    /// the attempt number.
    pub retry_delay: Duration,
    /// Per-attempt deadline for the engine call.
    pub timeout: Duration,
    /// Whether successful results are cached.
    pub cache_enabled: bool,
    /// Bounded cache capacity (entries).
    pub cache_capacity: usize,
    /// Per-entry time to live.
    pub cache_ttl: Duration,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
            cache_enabled: true,
            cache_capacity: 500,
            cache_ttl: Duration::from_secs(3600),
        }
    }
}

impl TranslatorConfig {
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub const fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub const fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }

    pub const fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}
