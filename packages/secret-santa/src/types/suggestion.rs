//! Gift suggestion types.

use serde::{Deserialize, Serialize};

/// One gift idea for an assignee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GiftSuggestion {
    /// Name of the gift item
    pub item: String,

    /// Why this is a good match
    pub reason: String,

    /// Rough price range, free-form (e.g. "$20-$30")
    pub estimated_price: String,
}

/// Language suggestions are written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
    Ja,
    Ko,
    Es,
}

impl Language {
    /// Instruction appended to prompts so the model answers in this language.
    pub fn instruction(self) -> &'static str {
        match self {
            Language::En => "Response MUST be in English.",
            Language::Zh => "Response MUST be in Traditional Chinese (Taiwan).",
            Language::Ja => "Response MUST be in Japanese.",
            Language::Ko => "Response MUST be in Korean.",
            Language::Es => "Response MUST be in Spanish.",
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            "ja" => Ok(Language::Ja),
            "ko" => Ok(Language::Ko),
            "es" => Ok(Language::Es),
            other => Err(format!("unsupported language: {other}")),
        }
    }
}
