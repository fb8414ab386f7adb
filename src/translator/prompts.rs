//! Mode-Specific Prompt Construction
//!
//! Builds the role/command prompt pair for each translation mode. Chinese
//! targets get a native-language instruction; everything else uses the
//! English templates.

use super::TranslateMode;
use crate::translator::lang;

/// Role and command prompts for one engine call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub role_prompt: String,
    pub command_prompt: String,
}

pub fn build(mode: TranslateMode, source_lang: &str, target_lang: &str, text: &str) -> PromptPair {
    match mode {
        TranslateMode::Translate => translate_prompts(source_lang, target_lang, text),
        TranslateMode::Polishing => PromptPair {
            role_prompt: "You are an expert text editor.".to_string(),
            command_prompt: format!(
                "Revise the following text to improve its clarity, conciseness, and coherence. \
                 Keep the original language and meaning:\n\n{text}"
            ),
        },
        TranslateMode::Summarize => PromptPair {
            role_prompt: "You are a professional summarizer.".to_string(),
            command_prompt: format!(
                "Summarize the following text in {}. Output only the summary:\n\n{text}",
                lang::display_name(target_lang)
            ),
        },
    }
}

fn translate_prompts(source_lang: &str, target_lang: &str, text: &str) -> PromptPair {
    let role_prompt =
        "You are a translation engine that can only translate text and cannot interpret it."
            .to_string();

    let command_prompt = match target_lang {
        "zh-Hans" => format!("将以下文本翻译成简体白话文：\n\n{text}"),
        "zh-Hant" => format!("將以下文本翻譯成繁體白話文：\n\n{text}"),
        _ => format!(
            "Translate the following text from {} to {}:\n\n{text}",
            lang::display_name(source_lang),
            lang::display_name(target_lang),
        ),
    };

    PromptPair {
        role_prompt,
        command_prompt,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_uses_language_pair_template() {
        let p = build(TranslateMode::Translate, "en", "fr", "Good morning");
        assert!(p.role_prompt.contains("translation engine"));
        assert!(p.command_prompt.contains("from English to French"));
        assert!(p.command_prompt.ends_with("Good morning"));
    }

    #[test]
    fn chinese_targets_get_native_instructions() {
        let p = build(TranslateMode::Translate, "en", "zh-Hans", "Hello");
        assert!(p.command_prompt.contains("简体白话文"));
        let p = build(TranslateMode::Translate, "en", "zh-Hant", "Hello");
        assert!(p.command_prompt.contains("繁體白話文"));
    }

    #[test]
    fn polishing_is_language_independent() {
        let p = build(TranslateMode::Polishing, "en", "en", "some draft");
        assert!(p.command_prompt.contains("clarity"));
        assert!(!p.command_prompt.contains("English to"));
    }

    #[test]
    fn summarize_demands_target_language_output() {
        let p = build(TranslateMode::Summarize, "auto", "de", "long text");
        assert!(p.command_prompt.contains("in German"));
    }
}
