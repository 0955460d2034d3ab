//! Supported display languages and script-based detection
//!
//! The gateway normalizes every query to English before generation and
//! localizes the reply back to the selected language afterwards.

use serde::{Deserialize, Serialize};

/// Canonical working language for generation
pub const WORKING_LANGUAGE: Language = Language::English;

/// Languages offered by the form's selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Spanish,
    French,
    German,
    Chinese,
    Hindi,
    Sanskrit,
}

impl Language {
    /// ISO 639 code used on the wire (639-1 where one exists, 639-2 for Sanskrit)
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::German => "de",
            Self::Chinese => "zh",
            Self::Hindi => "hi",
            Self::Sanskrit => "sa",
        }
    }

    /// Human-readable name for the selector and logs
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::German => "German",
            Self::Chinese => "Chinese",
            Self::Hindi => "Hindi",
            Self::Sanskrit => "Sanskrit",
        }
    }

    /// Parse a language from an ISO code or display name (case-insensitive)
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "en" | "english" => Some(Self::English),
            "es" | "spanish" => Some(Self::Spanish),
            "fr" | "french" => Some(Self::French),
            "de" | "german" => Some(Self::German),
            "zh" | "zh-cn" | "chinese" => Some(Self::Chinese),
            "hi" | "hindi" => Some(Self::Hindi),
            "sa" | "sanskrit" => Some(Self::Sanskrit),
            _ => None,
        }
    }

    /// All selectable languages, in form order
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::English,
            Self::Spanish,
            Self::French,
            Self::German,
            Self::Chinese,
            Self::Hindi,
            Self::Sanskrit,
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Result of language detection over a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detection {
    /// A supported language was identified
    Known(Language),
    /// Detection failed or the language is unsupported; code "und"
    Unknown,
}

impl Detection {
    /// ISO code for API responses ("und" when unknown)
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Known(lang) => lang.code(),
            Self::Unknown => "und",
        }
    }
}

/// Detect the most likely language of `text` from Unicode script ranges.
///
/// Latin-script text is indistinguishable between English, Spanish, French
/// and German without a statistical model, so Latin input falls back to
/// `preferred` when that is a Latin-script language, else English. Hindi
/// and Sanskrit share Devanagari; `preferred` breaks the tie.
#[must_use]
pub fn detect_script(text: &str, preferred: Language) -> Detection {
    let mut cjk = 0u32;
    let mut devanagari = 0u32;
    let mut latin = 0u32;
    let mut total = 0u32;

    for c in text.chars() {
        if c.is_whitespace() || c.is_ascii_punctuation() || c.is_ascii_digit() {
            continue;
        }
        total += 1;

        match c as u32 {
            // CJK Unified Ideographs
            0x4E00..=0x9FFF | 0x3400..=0x4DBF => cjk += 1,
            // Devanagari
            0x0900..=0x097F => devanagari += 1,
            // Basic Latin letters + Latin-1 supplement + Latin Extended
            0x0041..=0x024F => latin += 1,
            _ => {}
        }
    }

    if total == 0 {
        return Detection::Unknown;
    }

    // Require at least 20% of non-space chars to match a script
    let threshold = total / 5;

    if cjk > threshold {
        return Detection::Known(Language::Chinese);
    }
    if devanagari > threshold {
        let lang = if preferred == Language::Sanskrit {
            Language::Sanskrit
        } else {
            Language::Hindi
        };
        return Detection::Known(lang);
    }
    if latin > threshold {
        let lang = match preferred {
            Language::Chinese | Language::Hindi | Language::Sanskrit => Language::English,
            other => other,
        };
        return Detection::Known(lang);
    }

    Detection::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_codes_and_names() {
        assert_eq!(Language::parse("en"), Some(Language::English));
        assert_eq!(Language::parse("French"), Some(Language::French));
        assert_eq!(Language::parse("  SANSKRIT "), Some(Language::Sanskrit));
        assert_eq!(Language::parse("tlh"), None);
    }

    #[test]
    fn codes_roundtrip() {
        for lang in Language::all() {
            assert_eq!(Language::parse(lang.code()), Some(*lang));
        }
    }

    #[test]
    fn detects_chinese_script() {
        assert_eq!(
            detect_script("你好，世界", Language::English),
            Detection::Known(Language::Chinese)
        );
    }

    #[test]
    fn devanagari_tie_breaks_on_preference() {
        let text = "नमस्ते दुनिया";
        assert_eq!(
            detect_script(text, Language::Hindi),
            Detection::Known(Language::Hindi)
        );
        assert_eq!(
            detect_script(text, Language::Sanskrit),
            Detection::Known(Language::Sanskrit)
        );
        assert_eq!(
            detect_script(text, Language::English),
            Detection::Known(Language::Hindi)
        );
    }

    #[test]
    fn latin_falls_back_to_preferred() {
        assert_eq!(
            detect_script("Bonjour tout le monde", Language::French),
            Detection::Known(Language::French)
        );
        assert_eq!(
            detect_script("Hello world", Language::Chinese),
            Detection::Known(Language::English)
        );
    }

    #[test]
    fn empty_and_symbolic_input_is_unknown() {
        assert_eq!(detect_script("", Language::English), Detection::Unknown);
        assert_eq!(detect_script("123 !!", Language::English), Detection::Unknown);
    }
}
