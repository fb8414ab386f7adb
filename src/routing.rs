//! Model-Routing Policy
//!
//! Pure functions deciding, from a model name and configured endpoint,
//! which wire protocol variant to speak. No side effects.
//!
//! The ordering is load-bearing: a responses-style endpoint path always
//! wins over model-name heuristics, and the heuristics only apply on the
//! official default endpoint. Custom or self-hosted endpoints are never
//! auto-upgraded to the Responses API even if the model name matches.

use lazy_static::lazy_static;
use regex::Regex;

/// Canonical default provider base URL.
pub const DEFAULT_API_URL: &str = "https://api.openai.com";
/// Canonical default chat-completions path.
pub const DEFAULT_CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
/// Path used for the Responses API variant.
pub const RESPONSES_API_PATH: &str = "/v1/responses";

/// One of the three mutually exclusive wire formats the engine can speak.
///
/// Determined once per request and immutable for the request's duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolVariant {
    /// Azure-style `prompt`/`stop` completion with `choices[0].text` deltas.
    LegacyCompletion,
    /// OpenAI Chat Completions: `messages` request, `choices[0].delta`
    /// stream chunks, `[DONE]` sentinel.
    ChatCompletions,
    /// OpenAI Responses API: `input`/`instructions` request, typed
    /// `response.*` stream events, no `[DONE]` sentinel.
    Responses,
}

impl ProtocolVariant {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LegacyCompletion => "legacy-completion",
            Self::ChatCompletions => "chat-completions",
            Self::Responses => "responses",
        }
    }
}

lazy_static! {
    /// Model families served through the Responses API on the default
    /// endpoint. Case-insensitive, anchored at the start of the name.
    static ref RESPONSES_CAPABLE_MODEL: Regex =
        Regex::new(r"(?i)^(gpt-5|o\d|gpt-4o|gpt-4\.1|gpt-4\.5)").expect("valid regex");
    /// Endpoint paths that force the Responses API regardless of model.
    static ref RESPONSES_PATH: Regex =
        Regex::new(r"/v\d+/responses/?$").expect("valid regex");
}

/// Decide the wire protocol for one request.
///
/// `is_chat_api` is the capability flag supplied by the provider adapter;
/// it is only consulted when neither the path nor the model-name heuristics
/// resolve to the Responses API.
pub fn select_protocol(
    api_url: &str,
    api_url_path: &str,
    model: &str,
    is_chat_api: bool,
) -> ProtocolVariant {
    if RESPONSES_PATH.is_match(api_url_path) {
        return ProtocolVariant::Responses;
    }

    let canonical_endpoint = api_url.trim_end_matches('/') == DEFAULT_API_URL
        && api_url_path == DEFAULT_CHAT_COMPLETIONS_PATH;
    if canonical_endpoint && RESPONSES_CAPABLE_MODEL.is_match(model) {
        tracing::debug!(model, "routing responses-capable model to the Responses API");
        return ProtocolVariant::Responses;
    }

    if !is_chat_api {
        return ProtocolVariant::LegacyCompletion;
    }

    ProtocolVariant::ChatCompletions
}
