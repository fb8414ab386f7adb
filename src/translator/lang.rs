//! Language Table and Detection
//!
//! Supported-language set, informal-code normalization, and the
//! script-based heuristic used when the caller requests `auto`.

/// Source-language wildcard that triggers detection.
pub const AUTO: &str = "auto";

/// Supported language codes and their English display names, used in
/// prompt construction.
const SUPPORTED: &[(&str, &str)] = &[
    ("en", "English"),
    ("zh-Hans", "Simplified Chinese"),
    ("zh-Hant", "Traditional Chinese"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("fr", "French"),
    ("de", "German"),
    ("es", "Spanish"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("tr", "Turkish"),
    ("id", "Indonesian"),
    ("sv", "Swedish"),
];

/// Map informal codes onto the canonical set before validation.
pub fn normalize(code: &str) -> String {
    match code {
        "zh" | "zh-CN" | "zh-cn" => "zh-Hans".to_string(),
        "zh-TW" | "zh-tw" | "zh-HK" | "zh-hk" => "zh-Hant".to_string(),
        other => other.to_string(),
    }
}

pub fn is_supported(code: &str) -> bool {
    code == AUTO || SUPPORTED.iter().any(|(c, _)| *c == code)
}

/// Display name for prompt templates; unknown codes fall through as-is so
/// prompt construction stays permissive.
pub fn display_name(code: &str) -> &str {
    SUPPORTED
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Script-based language detection.
///
/// Deliberately local and side-effect free: good enough to resolve `auto`
/// into a cache-key-stable language code without a network round trip.
/// The first script with any hits wins, checked in specificity order
/// (kana before Han, since Japanese text mixes both).
pub fn detect(text: &str) -> &'static str {
    let mut saw_han = false;
    for ch in text.chars() {
        let cp = ch as u32;
        match cp {
            0x3040..=0x30FF => return "ja",          // Hiragana + Katakana
            0xAC00..=0xD7AF | 0x1100..=0x11FF => return "ko",
            0x0400..=0x04FF => return "ru",
            0x0600..=0x06FF => return "ar",
            0x0E00..=0x0E7F => return "th",
            0x0900..=0x097F => return "hi",
            0x4E00..=0x9FFF | 0x3400..=0x4DBF => saw_han = true,
            _ => {}
        }
    }
    if saw_han { "zh-Hans" } else { "en" }
}
