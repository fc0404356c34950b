//! Per-difficulty completion counts and the hint ledger.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::constants::DEFAULT_LEVELS_PER_DIFFICULTY;
use crate::difficulty::Difficulty;

/// Levels completed in each difficulty. Every tier is always present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default)]
    pub easy: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub hard: u32,
}

impl Progress {
    #[must_use]
    pub const fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    pub const fn set(&mut self, difficulty: Difficulty, completed: u32) {
        match difficulty {
            Difficulty::Easy => self.easy = completed,
            Difficulty::Medium => self.medium = completed,
            Difficulty::Hard => self.hard = completed,
        }
    }

    /// Sum of completed levels across all tiers.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.easy
            .saturating_add(self.medium)
            .saturating_add(self.hard)
    }

    /// Lower any count that exceeds the tier's level total.
    pub fn clamp_to(&mut self, totals: &LevelTotals) {
        for difficulty in Difficulty::ALL {
            let limit = totals.get(difficulty);
            if self.get(difficulty) > limit {
                log::warn!(
                    "progress for {difficulty} exceeds {limit} levels; clamping",
                );
                self.set(difficulty, limit);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Difficulty, u32)> + '_ {
        Difficulty::ALL.into_iter().map(|d| (d, self.get(d)))
    }
}

/// Number of levels available per difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTotals {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl Default for LevelTotals {
    fn default() -> Self {
        Self::uniform(DEFAULT_LEVELS_PER_DIFFICULTY)
    }
}

impl LevelTotals {
    #[must_use]
    pub const fn uniform(levels: u32) -> Self {
        Self {
            easy: levels,
            medium: levels,
            hard: levels,
        }
    }

    #[must_use]
    pub const fn get(&self, difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => self.easy,
            Difficulty::Medium => self.medium,
            Difficulty::Hard => self.hard,
        }
    }

    #[must_use]
    pub const fn sum(&self) -> u32 {
        self.easy
            .saturating_add(self.medium)
            .saturating_add(self.hard)
    }
}

/// Puzzles whose hint has been revealed. Entries are only ever added;
/// the ledger empties solely on a full progress reset.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HintLedger(BTreeMap<String, bool>);

impl HintLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the hint for `puzzle_id` as used.
    /// Returns `true` when the entry was not already set.
    pub fn record(&mut self, puzzle_id: &str) -> bool {
        match self.0.get_mut(puzzle_id) {
            Some(used) if *used => false,
            Some(used) => {
                *used = true;
                true
            }
            None => {
                self.0.insert(puzzle_id.to_string(), true);
                true
            }
        }
    }

    #[must_use]
    pub fn is_used(&self, puzzle_id: &str) -> bool {
        self.0.get(puzzle_id).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(id, used)| (id.as_str(), *used))
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(String, bool)> for HintLedger {
    fn from_iter<I: IntoIterator<Item = (String, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_defaults_to_zero_for_every_tier() {
        let progress = Progress::default();
        assert!(progress.iter().all(|(_, completed)| completed == 0));
        assert_eq!(progress.total(), 0);
    }

    #[test]
    fn clamp_limits_each_tier_independently() {
        let mut progress = Progress {
            easy: 12,
            medium: 4,
            hard: 3,
        };
        let totals = LevelTotals {
            easy: 10,
            medium: 10,
            hard: 2,
        };
        progress.clamp_to(&totals);
        assert_eq!(
            progress,
            Progress {
                easy: 10,
                medium: 4,
                hard: 2
            }
        );
    }

    #[test]
    fn hint_ledger_record_is_idempotent() {
        let mut ledger = HintLedger::new();
        assert!(ledger.record("easy-1"));
        assert!(!ledger.record("easy-1"));
        assert!(ledger.is_used("easy-1"));
        assert!(!ledger.is_used("easy-2"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn hint_ledger_serializes_as_plain_map() {
        let mut ledger = HintLedger::new();
        ledger.record("m-3");
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"m-3":true}"#);
    }
}
