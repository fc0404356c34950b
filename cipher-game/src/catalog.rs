//! Static puzzle catalog, indexed by difficulty and 1-based level.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::difficulty::Difficulty;
use crate::evaluator::evaluate;
use crate::language::{Language, LocalizedText};
use crate::progress::LevelTotals;

/// A single puzzle. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleDefinition {
    pub id: String,
    pub question: LocalizedText,
    #[serde(default)]
    pub image: Option<String>,
    /// Classification tag, e.g. `pattern-recognition`.
    #[serde(rename = "type", default)]
    pub kind: String,
    pub answer: String,
    pub hint: LocalizedText,
    #[serde(default)]
    pub explanation: Option<LocalizedText>,
}

impl PuzzleDefinition {
    #[must_use]
    pub fn question(&self, language: Language) -> &str {
        self.question.resolve(language)
    }

    #[must_use]
    pub fn hint(&self, language: Language) -> &str {
        self.hint.resolve(language)
    }

    #[must_use]
    pub fn explanation(&self, language: Language) -> Option<&str> {
        self.explanation
            .as_ref()
            .map(|text| text.resolve(language))
            .filter(|text| !text.is_empty())
    }

    /// Classification badge text; untyped puzzles read `CLASSIFIED`.
    #[must_use]
    pub fn classification(&self) -> String {
        if self.kind.is_empty() {
            "CLASSIFIED".to_string()
        } else {
            self.kind.replace('-', " ").to_uppercase()
        }
    }

    #[must_use]
    pub fn check(&self, submitted: &str) -> bool {
        evaluate(submitted, &self.answer)
    }
}

/// Ordered puzzles for every difficulty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PuzzleCatalog {
    easy: Vec<PuzzleDefinition>,
    medium: Vec<PuzzleDefinition>,
    hard: Vec<PuzzleDefinition>,
}

impl PuzzleCatalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a catalog from the dataset JSON.
    ///
    /// The dataset is an object keyed by difficulty. Puzzle records may carry
    /// `question_<lang>`, `hint_<lang>` and `explanation_<lang>` variants;
    /// absent fields default to empty text and an absent id to `puzzle-<index>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into the dataset shape.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Ok(Self {
            easy: convert_tier(raw.easy),
            medium: convert_tier(raw.medium),
            hard: convert_tier(raw.hard),
        })
    }

    #[must_use]
    pub fn with_puzzles(mut self, difficulty: Difficulty, puzzles: Vec<PuzzleDefinition>) -> Self {
        *self.tier_mut(difficulty) = puzzles;
        self
    }

    #[must_use]
    pub fn puzzles(&self, difficulty: Difficulty) -> &[PuzzleDefinition] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn tier_mut(&mut self, difficulty: Difficulty) -> &mut Vec<PuzzleDefinition> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }

    /// Puzzle at 1-based `level`, or `None` once the tier is exhausted.
    #[must_use]
    pub fn get_puzzle(&self, difficulty: Difficulty, level: u32) -> Option<&PuzzleDefinition> {
        let index = usize::try_from(level.checked_sub(1)?).ok()?;
        self.puzzles(difficulty).get(index)
    }

    #[must_use]
    pub fn level_total(&self, difficulty: Difficulty) -> u32 {
        u32::try_from(self.puzzles(difficulty).len()).unwrap_or(u32::MAX)
    }

    #[must_use]
    pub fn level_totals(&self) -> LevelTotals {
        LevelTotals {
            easy: self.level_total(Difficulty::Easy),
            medium: self.level_total(Difficulty::Medium),
            hard: self.level_total(Difficulty::Hard),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        Difficulty::ALL
            .into_iter()
            .all(|d| self.puzzles(d).is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCatalog {
    easy: Vec<RawPuzzle>,
    medium: Vec<RawPuzzle>,
    hard: Vec<RawPuzzle>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPuzzle {
    id: Option<String>,
    question: Option<String>,
    image: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    answer: Option<String>,
    hint: Option<String>,
    explanation: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

fn convert_tier(raw: Vec<RawPuzzle>) -> Vec<PuzzleDefinition> {
    raw.into_iter()
        .enumerate()
        .map(|(index, puzzle)| puzzle.into_definition(index))
        .collect()
}

impl RawPuzzle {
    fn into_definition(self, index: usize) -> PuzzleDefinition {
        let mut question = LocalizedText::new(self.question.unwrap_or_default());
        let mut hint = LocalizedText::new(self.hint.unwrap_or_default());
        let mut explanation = LocalizedText::new(self.explanation.unwrap_or_default());

        for (key, value) in self.extra {
            let Some((field, tag)) = key.rsplit_once('_') else {
                continue;
            };
            let (Ok(language), Some(text)) = (tag.parse::<Language>(), value.as_str()) else {
                continue;
            };
            let target = match field {
                "question" => &mut question,
                "hint" => &mut hint,
                "explanation" => &mut explanation,
                _ => continue,
            };
            target.variants.insert(language, text.to_string());
        }

        PuzzleDefinition {
            id: self.id.unwrap_or_else(|| format!("puzzle-{index}")),
            question,
            image: self.image.filter(|image| !image.is_empty()),
            kind: self.kind.unwrap_or_default(),
            answer: self.answer.unwrap_or_default(),
            hint,
            explanation: (!explanation.is_empty()).then_some(explanation),
        }
    }
}
