use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Puzzle text language.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
}

impl Language {
    pub const FALLBACK: Self = Self::En;

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Hi => "hi",
        }
    }

    /// Name shown on the language switch.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Hi => "Hinglish",
        }
    }

    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::En => Self::Hi,
            Self::Hi => Self::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "hi" => Ok(Self::Hi),
            _ => Err(()),
        }
    }
}

/// Text with optional per-language variants.
///
/// Lookup prefers the requested variant, then the base text, then the
/// fallback-language variant.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    pub base: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<Language, String>,
}

impl LocalizedText {
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            variants: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_variant(mut self, language: Language, text: impl Into<String>) -> Self {
        self.variants.insert(language, text.into());
        self
    }

    #[must_use]
    pub fn resolve(&self, language: Language) -> &str {
        let variant = |lang: Language| {
            self.variants
                .get(&lang)
                .map(String::as_str)
                .filter(|text| !text.is_empty())
        };
        if let Some(text) = variant(language) {
            return text;
        }
        if !self.base.is_empty() {
            return &self.base;
        }
        variant(Language::FALLBACK).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.variants.values().all(String::is_empty)
    }
}

impl From<&str> for LocalizedText {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
