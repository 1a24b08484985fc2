//! translate::language
//!
//! Supported target languages.
//!
//! Codes are two-letter and case-insensitive, so `DE`, `de` and `De` all
//! select German.

use std::str::FromStr;

use super::traits::TranslateError;

/// A target language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Spanish,
    French,
    German,
    Italian,
    Portuguese,
    Russian,
    Japanese,
    Korean,
    Chinese,
}

impl Language {
    /// Every supported language.
    pub const ALL: [Language; 9] = [
        Language::Spanish,
        Language::French,
        Language::German,
        Language::Italian,
        Language::Portuguese,
        Language::Russian,
        Language::Japanese,
        Language::Korean,
        Language::Chinese,
    ];

    /// Lowercase two-letter code.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Spanish => "es",
            Language::French => "fr",
            Language::German => "de",
            Language::Italian => "it",
            Language::Portuguese => "pt",
            Language::Russian => "ru",
            Language::Japanese => "ja",
            Language::Korean => "ko",
            Language::Chinese => "zh",
        }
    }

    /// English name used in prompts.
    pub fn name(&self) -> &'static str {
        match self {
            Language::Spanish => "Spanish",
            Language::French => "French",
            Language::German => "German",
            Language::Italian => "Italian",
            Language::Portuguese => "Portuguese",
            Language::Russian => "Russian",
            Language::Japanese => "Japanese",
            Language::Korean => "Korean",
            Language::Chinese => "Chinese",
        }
    }

    /// Comma-separated list of supported codes.
    pub fn supported_codes() -> String {
        Self::ALL
            .iter()
            .map(Language::code)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Language {
    type Err = TranslateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| TranslateError::UnsupportedLanguage {
                code: s.to_string(),
                supported: Self::supported_codes(),
            })
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name(), self.code().to_ascii_uppercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("DE".parse::<Language>().unwrap(), Language::German);
        assert_eq!("de".parse::<Language>().unwrap(), Language::German);
        assert_eq!(" Fr ".parse::<Language>().unwrap(), Language::French);
    }

    #[test]
    fn every_code_round_trips() {
        for lang in Language::ALL {
            assert_eq!(lang.code().parse::<Language>().unwrap(), lang);
        }
    }

    #[test]
    fn unsupported_code_lists_alternatives() {
        let err = "xx".parse::<Language>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid language code: xx (supported: es, fr, de, it, pt, ru, ja, ko, zh)"
        );
    }

    #[test]
    fn display_shows_name_and_code() {
        assert_eq!(Language::German.to_string(), "German (DE)");
    }
}
