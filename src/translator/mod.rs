//! Translator Façade
//!
//! Orchestrates an engine behind a result-oriented API: validates input,
//! resolves the language pair, builds mode-specific prompts, applies
//! timeout and bounded retry, caches results with TTL, and returns a
//! normalized [`TranslationResult`].
//!
//! Call flow: VALIDATE → DETECT_LANG → CACHE_LOOKUP → CALL_ENGINE →
//! CACHE_STORE → RETURN.

pub mod cache;
pub mod lang;
pub mod prompts;
pub mod retry;

use std::sync::Arc;

use futures_util::StreamExt;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::config::TranslatorConfig;
use crate::engine::MessageEngine;
use crate::error::EngineError;
use crate::streaming::StreamEvent;
use crate::types::MessageRequest;
use cache::{CacheKey, TranslationCache};
use prompts::PromptPair;
use retry::RetryPolicy;

/// Processing mode for one call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslateMode {
    Translate,
    Polishing,
    Summarize,
}

impl TranslateMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Translate => "translate",
            Self::Polishing => "polishing",
            Self::Summarize => "summarize",
        }
    }
}

/// Normalized outcome of one façade call. Exactly one of the
/// mode-dependent text fields is populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub original_text: String,
    pub translated_text: Option<String>,
    pub polished_text: Option<String>,
    pub summary: Option<String>,
    pub source_lang: String,
    pub target_lang: String,
    /// Populated when the caller requested `auto` source detection.
    pub detected_lang: Option<String>,
    pub mode: TranslateMode,
    pub from_cache: bool,
}

impl TranslationResult {
    /// The populated mode-dependent text, whichever it is.
    pub fn output_text(&self) -> Option<&str> {
        self.translated_text
            .as_deref()
            .or(self.polished_text.as_deref())
            .or(self.summary.as_deref())
    }
}

/// One item of a mixed-language batch.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub text: String,
    pub target_lang: String,
}

pub struct Translator {
    engine: Arc<dyn MessageEngine>,
    config: TranslatorConfig,
    cache: TranslationCache,
}

impl Translator {
    pub fn new(engine: Arc<dyn MessageEngine>, config: TranslatorConfig) -> Self {
        let cache = TranslationCache::new(config.cache_capacity, config.cache_ttl);
        Self {
            engine,
            config,
            cache,
        }
    }

    /// Translate `text` from `source_lang` (or `"auto"`) into `target_lang`.
    pub async fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<TranslationResult, EngineError> {
        self.process(text, source_lang, target_lang, TranslateMode::Translate)
            .await
    }

    /// Run one call in any mode.
    pub async fn process(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
        mode: TranslateMode,
    ) -> Result<TranslationResult, EngineError> {
        if text.trim().is_empty() {
            return Err(EngineError::EmptyInput);
        }

        let source = lang::normalize(source_lang);
        let target = lang::normalize(target_lang);
        if !lang::is_supported(&source) {
            return Err(EngineError::UnsupportedLanguage(source_lang.to_string()));
        }
        // `auto` is a source-only wildcard.
        if target == lang::AUTO || !lang::is_supported(&target) {
            return Err(EngineError::UnsupportedLanguage(target_lang.to_string()));
        }

        let detected = (source == lang::AUTO).then(|| lang::detect(text).to_string());
        // The cache key carries the resolved source language, so
        // auto-detected and explicitly specified calls for the same pair
        // share an entry.
        let resolved_source = detected.clone().unwrap_or(source);

        let key = CacheKey {
            source_lang: resolved_source.clone(),
            target_lang: target.clone(),
            mode,
            text: text.to_string(),
        };
        if self.config.cache_enabled
            && let Some(hit) = self.cache.get(&key)
        {
            tracing::debug!(mode = mode.as_str(), "cache hit");
            return Ok(hit);
        }

        let prompts = prompts::build(mode, &resolved_source, &target, text);
        let policy = RetryPolicy::new(self.config.max_retries, self.config.retry_delay);
        let output = policy
            .execute(|| self.call_engine_once(prompts.clone()))
            .await?;

        let mut result = TranslationResult {
            original_text: text.to_string(),
            translated_text: None,
            polished_text: None,
            summary: None,
            source_lang: resolved_source,
            target_lang: target,
            detected_lang: detected,
            mode,
            from_cache: false,
        };
        match mode {
            TranslateMode::Translate => result.translated_text = Some(output),
            TranslateMode::Polishing => result.polished_text = Some(output),
            TranslateMode::Summarize => result.summary = Some(output),
        }

        if self.config.cache_enabled {
            self.cache.put(key, result.clone());
        }
        Ok(result)
    }

    /// Translate several texts sharing one language pair. Strictly
    /// sequential: each item fully completes, including its own cache and
    /// retry cycle, before the next begins.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<TranslationResult>, EngineError> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.translate(text, source_lang, target_lang).await?);
        }
        Ok(results)
    }

    /// Translate items with per-item target languages, auto-detecting each
    /// source. Sequential like [`translate_batch`](Self::translate_batch).
    pub async fn translate_batch_mixed(
        &self,
        items: &[BatchItem],
    ) -> Result<Vec<TranslationResult>, EngineError> {
        let mut results = Vec::with_capacity(items.len());
        for item in items {
            results.push(
                self.translate(&item.text, lang::AUTO, &item.target_lang)
                    .await?,
            );
        }
        Ok(results)
    }

    /// One engine attempt: race the streamed call against the configured
    /// timeout. On timeout the cancellation token aborts the transport, and
    /// the caller sees an error distinguishable from provider failures.
    async fn call_engine_once(&self, prompts: PromptPair) -> Result<String, EngineError> {
        let cancel = CancellationToken::new();
        let request = MessageRequest::new(prompts.command_prompt)
            .with_role_prompt(prompts.role_prompt)
            .with_cancel(cancel.clone());

        match tokio::time::timeout(self.config.timeout, self.drain_stream(request)).await {
            Ok(result) => result,
            Err(_) => {
                cancel.cancel();
                Err(EngineError::Timeout)
            }
        }
    }

    /// Accumulate streamed deltas until the terminal event. A reported
    /// error does not interrupt the stream, but it wins over any partial
    /// content once the stream terminates.
    async fn drain_stream(&self, request: MessageRequest) -> Result<String, EngineError> {
        let mut stream = self.engine.send_message(request).await;
        let mut accumulated = String::new();
        let mut last_error: Option<String> = None;

        while let Some(event) = stream.next().await {
            match event {
                StreamEvent::Delta { content, .. } => accumulated.push_str(&content),
                StreamEvent::Error { message } => {
                    tracing::warn!(message, "engine reported stream error");
                    last_error = Some(message);
                }
                StreamEvent::Finished { reason } => {
                    tracing::debug!(reason, "stream finished");
                    break;
                }
            }
        }

        match last_error {
            Some(message) => Err(EngineError::ProviderError(message)),
            None => Ok(accumulated),
        }
    }
}
