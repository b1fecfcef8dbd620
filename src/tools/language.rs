//! Language detection for research topics.
//!
//! Detection looks at the writing system only: Arabic-script text is told
//! apart by letters specific to Persian or Urdu, anything else is treated as
//! English. The raw code is then normalized to a supported [`Language`].

use crate::models::Language;
use crate::tools::LanguageDetector;

/// Detected code to supported language. Other Arabic-script codes map to Persian.
const NORMALIZATION: &[(&str, Language)] = &[
    ("en", Language::En),
    ("fa", Language::Fa),
    ("ar", Language::Fa),
    ("ur", Language::Fa),
];

/// Map a detected language code to a supported language.
pub fn normalize(code: &str) -> Language {
    let code = code.trim().to_ascii_lowercase();
    NORMALIZATION
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, language)| *language)
        .unwrap_or_default()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptLanguageDetector;

impl ScriptLanguageDetector {
    pub fn new() -> Self {
        Self
    }

    /// Raw language code of `text`, `None` when nothing alphabetic is present.
    pub fn detect_code(text: &str) -> Option<&'static str> {
        let mut arabic_script = 0usize;
        let mut other_letters = 0usize;
        let mut persian_marks = 0usize;
        let mut urdu_marks = 0usize;

        for ch in text.chars().filter(|c| c.is_alphabetic()) {
            if is_arabic_script(ch) {
                arabic_script += 1;
                if is_persian_letter(ch) {
                    persian_marks += 1;
                }
                if is_urdu_letter(ch) {
                    urdu_marks += 1;
                }
            } else {
                other_letters += 1;
            }
        }

        if arabic_script == 0 && other_letters == 0 {
            return None;
        }
        if arabic_script <= other_letters {
            return Some("en");
        }
        // Persian never uses the Urdu-only letters, Urdu shares the Persian ones.
        Some(if urdu_marks > 0 {
            "ur"
        } else if persian_marks > 0 {
            "fa"
        } else {
            "ar"
        })
    }
}

impl LanguageDetector for ScriptLanguageDetector {
    fn detect(&self, text: &str) -> Language {
        Self::detect_code(text).map(normalize).unwrap_or_default()
    }
}

fn is_arabic_script(ch: char) -> bool {
    matches!(ch,
        '\u{0600}'..='\u{06FF}'
        | '\u{0750}'..='\u{077F}'
        | '\u{08A0}'..='\u{08FF}'
        | '\u{FB50}'..='\u{FDFF}'
        | '\u{FE70}'..='\u{FEFF}')
}

fn is_persian_letter(ch: char) -> bool {
    // پ چ ژ گ ک ی
    matches!(ch, '\u{067E}' | '\u{0686}' | '\u{0698}' | '\u{06AF}' | '\u{06A9}' | '\u{06CC}')
}

fn is_urdu_letter(ch: char) -> bool {
    // ٹ ڈ ڑ ں ے
    matches!(ch, '\u{0679}' | '\u{0688}' | '\u{0691}' | '\u{06BA}' | '\u{06D2}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_topic() {
        assert_eq!(ScriptLanguageDetector.detect("Python programming"), Language::En);
    }

    #[test]
    fn persian_topic() {
        assert_eq!(ScriptLanguageDetector::detect_code("برنامه نویسی پایتون"), Some("fa"));
        assert_eq!(ScriptLanguageDetector.detect("هوش مصنوعی چیست"), Language::Fa);
    }

    #[test]
    fn arabic_and_urdu_normalize_to_persian() {
        assert_eq!(ScriptLanguageDetector::detect_code("الذكاء الاصطناعي"), Some("ar"));
        assert_eq!(ScriptLanguageDetector.detect("الذكاء الاصطناعي"), Language::Fa);
        assert_eq!(ScriptLanguageDetector::detect_code("مصنوعی ذہانت کے بارے میں ٹیکنالوجی"), Some("ur"));
        assert_eq!(ScriptLanguageDetector.detect("مصنوعی ذہانت کے بارے میں ٹیکنالوجی"), Language::Fa);
    }

    #[test]
    fn blank_or_symbolic_input_defaults_to_english() {
        for text in ["", "   \n\t", "12345 !?", "🚀🚀"] {
            assert_eq!(ScriptLanguageDetector.detect(text), Language::En, "{text:?}");
        }
    }

    #[test]
    fn mixed_script_follows_majority() {
        assert_eq!(ScriptLanguageDetector.detect("Rust زبان"), Language::En);
        assert_eq!(ScriptLanguageDetector.detect("زبان برنامه نویسی Rust"), Language::Fa);
    }

    #[test]
    fn normalization_table() {
        assert_eq!(normalize("EN"), Language::En);
        assert_eq!(normalize("fa"), Language::Fa);
        assert_eq!(normalize("ar"), Language::Fa);
        assert_eq!(normalize("ur"), Language::Fa);
        assert_eq!(normalize("de"), Language::En);
        assert_eq!(normalize("zh-cn"), Language::En);
        assert_eq!(normalize(""), Language::En);
    }
}
