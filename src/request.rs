//! Request Builder
//!
//! Turns a normalized [`MessageRequest`] into the exact JSON body for a
//! protocol variant, including model-family-specific default parameters.
//! Pure transforms: malformed upstream settings propagate as empty or
//! default values, never as errors.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Value, json};

use crate::routing::ProtocolVariant;
use crate::types::MessageRequest;

/// Opening delimiter used by the legacy completion prompt format.
pub const LEGACY_PROMPT_START: &str = "<|im_start|>";
/// Closing delimiter, also used as the stop sequence.
pub const LEGACY_PROMPT_END: &str = "<|im_end|>";

lazy_static! {
    static ref GPT_3_4_FAMILY: Regex = Regex::new(r"^gpt-[34]").expect("valid regex");
    static ref O_SERIES_FAMILY: Regex = Regex::new(r"^o[134]").expect("valid regex");
    static ref GPT_5_FAMILY: Regex =
        Regex::new(r"^gpt-5(\.0)?(-mini|-nano)?").expect("valid regex");
}

/// Default body parameters by model family, first match wins.
///
/// Unknown model names get `{stream: true}` only, so future models whose
/// accepted parameter set is unknown are not sent parameters they may
/// reject.
pub fn default_body(model: &str) -> Value {
    if GPT_3_4_FAMILY.is_match(model) {
        return json!({
            "temperature": 0,
            "top_p": 1,
            "frequency_penalty": 1,
            "presence_penalty": 1,
            "stream": true,
        });
    }
    if O_SERIES_FAMILY.is_match(model) {
        return json!({ "stream": true, "reasoning_effort": "low" });
    }
    if is_minimal_effort_gpt5(model) {
        return json!({ "stream": true, "reasoning_effort": "minimal" });
    }
    json!({ "stream": true })
}

/// `gpt-5`, `gpt-5.0`, `gpt-5-mini`, `gpt-5-nano` (and dated suffixes of
/// those) take minimal reasoning effort, but the `-pro`, `-chat` and
/// `instant` lines do not.
fn is_minimal_effort_gpt5(model: &str) -> bool {
    let Some(m) = GPT_5_FAMILY.find(model) else {
        return false;
    };
    let rest = &model[m.end()..];
    let bare = rest.strip_prefix('-').unwrap_or(rest);
    !(bare.starts_with("pro") || bare.starts_with("chat") || rest.starts_with("instant"))
}

/// Build the request body for one protocol variant.
///
/// Exactly one of `prompt`, `messages`, `input` ends up populated, and
/// `stream` is always `true`.
pub fn build_body(variant: ProtocolVariant, model: &str, req: &MessageRequest) -> Value {
    let mut body = default_body(model);
    body["model"] = json!(model);

    match variant {
        ProtocolVariant::LegacyCompletion => build_legacy_body(body, req),
        ProtocolVariant::ChatCompletions => build_chat_body(body, req),
        ProtocolVariant::Responses => build_responses_body(body, req),
    }
}

fn build_legacy_body(mut body: Value, req: &MessageRequest) -> Value {
    let role = req.role_prompt.as_deref().unwrap_or_default();
    body["prompt"] = json!(format!(
        "{LEGACY_PROMPT_START}system\n{role}\n{LEGACY_PROMPT_END}\n\
         {LEGACY_PROMPT_START}user\n{command}\n{LEGACY_PROMPT_END}\n\
         {LEGACY_PROMPT_START}assistant\n",
        command = req.command_prompt,
    ));
    body["stop"] = json!([LEGACY_PROMPT_END]);
    body
}

fn build_chat_body(mut body: Value, req: &MessageRequest) -> Value {
    let content = match req.role_prompt.as_deref() {
        Some(role) if !role.is_empty() => format!("{role}\n\n{}", req.command_prompt),
        _ => req.command_prompt.clone(),
    };
    body["messages"] = json!([{ "role": "user", "content": content }]);

    apply_override(&mut body, "temperature", req.temperature.as_deref());
    apply_override(&mut body, "frequency_penalty", req.frequency_penalty.as_deref());
    apply_override(&mut body, "presence_penalty", req.presence_penalty.as_deref());
    body
}

fn build_responses_body(mut body: Value, req: &MessageRequest) -> Value {
    if let Some(obj) = body.as_object_mut() {
        // Responses-API parameter surface: effort is nested, token limits
        // renamed, sampling parameters rejected outright.
        if let Some(effort) = obj.remove("reasoning_effort") {
            obj.insert("reasoning".to_string(), json!({ "effort": effort }));
        }
        if !obj.contains_key("max_output_tokens")
            && let Some(max) = obj.remove("max_tokens")
        {
            obj.insert("max_output_tokens".to_string(), max);
        }
        for key in ["temperature", "top_p", "frequency_penalty", "presence_penalty", "messages", "prompt", "stop"] {
            obj.remove(key);
        }
    }

    body["input"] = json!(req.command_prompt);
    if let Some(role) = req.role_prompt.as_deref()
        && !role.is_empty()
    {
        body["instructions"] = json!(role);
    }
    body
}

/// Apply a string-encoded per-call override; empty strings and
/// non-numeric values keep the provider default.
fn apply_override(body: &mut Value, key: &str, raw: Option<&str>) {
    if let Some(raw) = raw
        && !raw.is_empty()
    {
        match raw.parse::<f64>() {
            Ok(v) => body[key] = json!(v),
            Err(_) => tracing::warn!(key, raw, "ignoring non-numeric sampling override"),
        }
    }
}
