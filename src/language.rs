//! The fixed set of languages offered by the translator.
//!
//! Each language maps into **two different code spaces**:
//!
//! * [`Language::translation_code`] — the code the translation service
//!   expects (`sl`/`tl` parameters).
//! * [`Language::synthesis_code`] — the code the speech-synthesis service
//!   expects.  Most languages use the same code in both spaces; Sanskrit has
//!   no synthesis voice and borrows the Hindi voice instead.
//!
//! The fallback mapping is a hand-authored table, not a computed rule.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Language
// ---------------------------------------------------------------------------

/// A language selectable in the source/target pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    English,
    French,
    German,
    Spanish,
    Hindi,
    Italian,
    Russian,
    Arabic,
    Chinese,
    Sanskrit,
}

impl Language {
    /// All supported languages, in picker display order.
    pub const ALL: [Language; 10] = [
        Language::English,
        Language::French,
        Language::German,
        Language::Spanish,
        Language::Hindi,
        Language::Italian,
        Language::Russian,
        Language::Arabic,
        Language::Chinese,
        Language::Sanskrit,
    ];

    /// Human-readable name shown in the UI.
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::French => "French",
            Language::German => "German",
            Language::Spanish => "Spanish",
            Language::Hindi => "Hindi",
            Language::Italian => "Italian",
            Language::Russian => "Russian",
            Language::Arabic => "Arabic",
            Language::Chinese => "Chinese",
            Language::Sanskrit => "Sanskrit",
        }
    }

    /// Code understood by the translation service.
    pub fn translation_code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Hindi => "hi",
            Language::Italian => "it",
            Language::Russian => "ru",
            Language::Arabic => "ar",
            Language::Chinese => "zh-CN",
            Language::Sanskrit => "sa",
        }
    }

    /// Code understood by the speech-synthesis service.
    ///
    /// Sanskrit has no synthesis voice and falls back to the Hindi voice.
    pub fn synthesis_code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::French => "fr",
            Language::German => "de",
            Language::Spanish => "es",
            Language::Hindi => "hi",
            Language::Italian => "it",
            Language::Russian => "ru",
            Language::Arabic => "ar",
            Language::Chinese => "zh-CN",
            Language::Sanskrit => "hi",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
