//! # lingoflow
//!
//! Streaming LLM translation engine with a unified provider interface.
//!
//! The crate is a uniform layer over heterogeneous LLM HTTP APIs (OpenAI
//! Chat Completions, OpenAI Responses, legacy Azure-style completion,
//! Groq-style extensions): it normalizes request construction, multiplexes
//! the incompatible streaming protocols, and exposes a single event-based
//! contract to callers regardless of backend quirks. On top of the engine
//! sits a translator façade adding caching, retries, timeouts, and
//! mode-specific prompt construction.
//!
//! Data flow for one call:
//!
//! ```text
//! Translator::translate
//!   └─ Engine::send_message
//!        ├─ routing::select_protocol    (which wire protocol to speak)
//!        ├─ request::build_body         (variant-specific JSON body)
//!        ├─ streaming::open_sse_stream  (in-order SSE frame delivery)
//!        └─ streaming::EventDispatcher  (frames → normalized events)
//!   └─ accumulate deltas → TranslationResult (cached, TTL-bounded)
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lingoflow::{Engine, OpenAiProvider, ProviderSettings, Translator, TranslatorConfig};
//!
//! # async fn example() -> Result<(), lingoflow::EngineError> {
//! let settings = ProviderSettings::new("sk-...", "gpt-4o-mini");
//! let engine = Engine::new(Arc::new(OpenAiProvider::new(settings)));
//! let translator = Translator::new(Arc::new(engine), TranslatorConfig::default());
//!
//! let result = translator.translate("Hello, world", "auto", "zh-CN").await?;
//! println!("{}", result.translated_text.unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod request;
pub mod routing;
pub mod streaming;
pub mod translator;
pub mod types;

pub use config::{ProviderSettings, TranslatorConfig};
pub use engine::{CompatProvider, Engine, GroqProvider, MessageEngine, OpenAiProvider, ProviderSpec};
pub use error::{EngineError, ErrorCategory};
pub use routing::{ProtocolVariant, select_protocol};
pub use streaming::{EventDispatcher, MessageStream, StreamEvent};
pub use translator::{BatchItem, TranslateMode, TranslationResult, Translator};
pub use types::{MessageRequest, ModelInfo};
