//! Translator façade tests against a scripted engine: validation, language
//! resolution, caching, retry accounting, and timeout cancellation.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream;
use tokio_util::sync::CancellationToken;

use lingoflow::{
    BatchItem, EngineError, MessageEngine, MessageRequest, MessageStream, StreamEvent,
    TranslateMode, Translator, TranslatorConfig,
};

/// Engine double that replays a fixed script: the first `failures` calls
/// report an in-stream error, later calls stream `reply`. Records every
/// call and the cancellation token it was handed.
struct ScriptedEngine {
    calls: AtomicU32,
    failures: u32,
    reply: String,
    delay: Option<Duration>,
    cancels: Mutex<Vec<CancellationToken>>,
}

impl ScriptedEngine {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            failures: 0,
            reply: reply.to_string(),
            delay: None,
            cancels: Mutex::new(Vec::new()),
        })
    }

    fn failing_first(failures: u32, reply: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            failures,
            reply: reply.to_string(),
            delay: None,
            cancels: Mutex::new(Vec::new()),
        })
    }

    fn stalled(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            failures: 0,
            reply: String::new(),
            delay: Some(delay),
            cancels: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageEngine for ScriptedEngine {
    async fn send_message(&self, request: MessageRequest) -> MessageStream {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.cancels
            .lock()
            .expect("cancel log")
            .push(request.cancel.clone());

        if let Some(delay) = self.delay {
            let reply = self.reply.clone();
            return Box::pin(async_stream::stream! {
                tokio::time::sleep(delay).await;
                yield StreamEvent::delta(reply, "");
                yield StreamEvent::finished("stop");
            });
        }

        let events = if call < self.failures {
            vec![
                StreamEvent::error("upstream hiccup"),
                StreamEvent::finished("error"),
            ]
        } else {
            vec![
                StreamEvent::delta(self.reply.clone(), ""),
                StreamEvent::finished("stop"),
            ]
        };
        Box::pin(stream::iter(events))
    }
}

fn fast_config() -> TranslatorConfig {
    TranslatorConfig::default().with_retry_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn translate_populates_the_mode_field_and_normalizes_languages() {
    let engine = ScriptedEngine::replying("你好");
    let translator = Translator::new(engine.clone(), fast_config());

    let result = translator.translate("hello", "en", "zh-CN").await.unwrap();

    assert_eq!(result.translated_text.as_deref(), Some("你好"));
    assert!(result.polished_text.is_none());
    assert!(result.summary.is_none());
    assert_eq!(result.output_text(), Some("你好"));
    assert_eq!(result.source_lang, "en");
    assert_eq!(result.target_lang, "zh-Hans");
    assert_eq!(result.detected_lang, None);
    assert_eq!(result.mode, TranslateMode::Translate);
    assert!(!result.from_cache);
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn polishing_and_summarize_populate_their_own_fields() {
    let engine = ScriptedEngine::replying("output");
    let translator = Translator::new(engine, fast_config());

    let polished = translator
        .process("rough text", "en", "en", TranslateMode::Polishing)
        .await
        .unwrap();
    assert_eq!(polished.polished_text.as_deref(), Some("output"));
    assert!(polished.translated_text.is_none());

    let summary = translator
        .process("long text", "en", "en", TranslateMode::Summarize)
        .await
        .unwrap();
    assert_eq!(summary.summary.as_deref(), Some("output"));
    assert!(summary.translated_text.is_none());
}

#[tokio::test]
async fn second_identical_call_is_served_from_cache() {
    let engine = ScriptedEngine::replying("hola");
    let translator = Translator::new(engine.clone(), fast_config());

    let first = translator.translate("hello", "en", "es").await.unwrap();
    let second = translator.translate("hello", "en", "es").await.unwrap();

    assert!(!first.from_cache);
    assert!(second.from_cache);
    assert_eq!(first.translated_text, second.translated_text);
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn different_target_languages_do_not_share_cache_entries() {
    let engine = ScriptedEngine::replying("x");
    let translator = Translator::new(engine.clone(), fast_config());

    translator.translate("hello", "en", "es").await.unwrap();
    translator.translate("hello", "en", "fr").await.unwrap();

    assert_eq!(engine.call_count(), 2);
}

#[tokio::test]
async fn different_modes_do_not_share_cache_entries() {
    let engine = ScriptedEngine::replying("x");
    let translator = Translator::new(engine.clone(), fast_config());

    translator
        .process("hello", "en", "en", TranslateMode::Polishing)
        .await
        .unwrap();
    translator
        .process("hello", "en", "en", TranslateMode::Summarize)
        .await
        .unwrap();

    assert_eq!(engine.call_count(), 2);
}

#[tokio::test]
async fn expired_entries_are_refreshed() {
    let engine = ScriptedEngine::replying("hola");
    let config = fast_config().with_cache_ttl(Duration::from_millis(30));
    let translator = Translator::new(engine.clone(), config);

    translator.translate("hello", "en", "es").await.unwrap();
    tokio::time::sleep(Duration::from_millis(60)).await;
    let refreshed = translator.translate("hello", "en", "es").await.unwrap();

    assert!(!refreshed.from_cache);
    assert_eq!(engine.call_count(), 2);
}

#[tokio::test]
async fn disabling_the_cache_always_calls_the_engine() {
    let engine = ScriptedEngine::replying("hola");
    let config = fast_config().with_cache_enabled(false);
    let translator = Translator::new(engine.clone(), config);

    translator.translate("hello", "en", "es").await.unwrap();
    translator.translate("hello", "en", "es").await.unwrap();

    assert_eq!(engine.call_count(), 2);
}

#[tokio::test]
async fn auto_detection_shares_the_cache_with_explicit_source_calls() {
    let engine = ScriptedEngine::replying("hello");
    let translator = Translator::new(engine.clone(), fast_config());

    let detected = translator.translate("你好世界", "auto", "en").await.unwrap();
    assert_eq!(detected.detected_lang.as_deref(), Some("zh-Hans"));
    assert_eq!(detected.source_lang, "zh-Hans");

    // The cache key carries the resolved source language.
    let explicit = translator.translate("你好世界", "zh-CN", "en").await.unwrap();
    assert!(explicit.from_cache);
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn blank_input_is_rejected_without_calling_the_engine() {
    let engine = ScriptedEngine::replying("x");
    let translator = Translator::new(engine.clone(), fast_config());

    for input in ["", "   ", "\n\t"] {
        let err = translator.translate(input, "en", "es").await.unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput), "{input:?}");
        assert!(err.to_string().to_lowercase().contains("empty"));
    }
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn unsupported_languages_are_rejected_without_calling_the_engine() {
    let engine = ScriptedEngine::replying("x");
    let translator = Translator::new(engine.clone(), fast_config());

    let err = translator.translate("hello", "en", "xx").await.unwrap_err();
    assert_eq!(err.to_string(), "Unsupported language: xx");

    // `auto` is a source-side wildcard only.
    let err = translator.translate("hello", "en", "auto").await.unwrap_err();
    assert!(matches!(err, EngineError::UnsupportedLanguage(_)));

    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn transient_failures_are_retried_up_to_the_attempt_budget() {
    let engine = ScriptedEngine::failing_first(2, "hola");
    let config = fast_config().with_max_retries(3);
    let translator = Translator::new(engine.clone(), config);

    let result = translator.translate("hello", "en", "es").await.unwrap();

    assert_eq!(result.translated_text.as_deref(), Some("hola"));
    assert_eq!(engine.call_count(), 3);
}

#[tokio::test]
async fn exhausted_retries_surface_the_last_provider_error() {
    let engine = ScriptedEngine::failing_first(5, "never");
    let config = fast_config().with_max_retries(2);
    let translator = Translator::new(engine.clone(), config);

    let err = translator.translate("hello", "en", "es").await.unwrap_err();

    assert!(err.to_string().contains("upstream hiccup"), "{err}");
    assert_eq!(engine.call_count(), 2);
}

#[tokio::test]
async fn failed_calls_are_not_cached() {
    let engine = ScriptedEngine::failing_first(1, "hola");
    let config = fast_config().with_max_retries(1);
    let translator = Translator::new(engine.clone(), config);

    translator.translate("hello", "en", "es").await.unwrap_err();
    let retried = translator.translate("hello", "en", "es").await.unwrap();

    assert!(!retried.from_cache);
    assert_eq!(retried.translated_text.as_deref(), Some("hola"));
}

#[tokio::test]
async fn timeout_cancels_the_in_flight_request() {
    let engine = ScriptedEngine::stalled(Duration::from_millis(300));
    let config = fast_config()
        .with_max_retries(1)
        .with_timeout(Duration::from_millis(30));
    let translator = Translator::new(engine.clone(), config);

    let err = translator.translate("hello", "en", "es").await.unwrap_err();

    assert!(matches!(err, EngineError::Timeout));
    assert!(err.to_string().to_lowercase().contains("timeout"));
    let cancels = engine.cancels.lock().expect("cancel log");
    assert_eq!(cancels.len(), 1);
    assert!(cancels[0].is_cancelled());
}

#[tokio::test]
async fn batch_runs_sequentially_and_reuses_the_cache() {
    let engine = ScriptedEngine::replying("hola");
    let translator = Translator::new(engine.clone(), fast_config());

    let texts = vec![
        "one".to_string(),
        "two".to_string(),
        "one".to_string(),
    ];
    let results = translator.translate_batch(&texts, "en", "es").await.unwrap();

    assert_eq!(results.len(), 3);
    assert!(!results[0].from_cache);
    assert!(!results[1].from_cache);
    assert!(results[2].from_cache);
    assert_eq!(engine.call_count(), 2);
}

#[tokio::test]
async fn mixed_batch_detects_each_source_and_honors_each_target() {
    let engine = ScriptedEngine::replying("out");
    let translator = Translator::new(engine.clone(), fast_config());

    let items = vec![
        BatchItem {
            text: "こんにちは".to_string(),
            target_lang: "en".to_string(),
        },
        BatchItem {
            text: "hello".to_string(),
            target_lang: "fr".to_string(),
        },
    ];
    let results = translator.translate_batch_mixed(&items).await.unwrap();

    assert_eq!(results[0].detected_lang.as_deref(), Some("ja"));
    assert_eq!(results[0].target_lang, "en");
    assert_eq!(results[1].detected_lang.as_deref(), Some("en"));
    assert_eq!(results[1].target_lang, "fr");
    assert_eq!(engine.call_count(), 2);
}

#[tokio::test]
async fn batch_stops_at_the_first_hard_failure() {
    let engine = ScriptedEngine::replying("x");
    let translator = Translator::new(engine.clone(), fast_config());

    let texts = vec!["one".to_string(), "".to_string(), "three".to_string()];
    let err = translator.translate_batch(&texts, "en", "es").await.unwrap_err();

    assert!(matches!(err, EngineError::EmptyInput));
    assert_eq!(engine.call_count(), 1);
}
