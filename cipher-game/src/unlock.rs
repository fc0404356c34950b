//! Unlock policy. These are the only rules deciding which tiers and levels a
//! player may open; both the session guards and the presentation layer use them.
use serde::{Deserialize, Serialize};

use crate::constants::UNLOCK_THRESHOLD;
use crate::difficulty::Difficulty;
use crate::progress::Progress;

/// Whether `difficulty` may be selected given `progress`.
#[must_use]
pub const fn difficulty_unlocked(progress: &Progress, difficulty: Difficulty) -> bool {
    match difficulty.prerequisite() {
        None => true,
        Some(gate) => progress.get(gate) >= UNLOCK_THRESHOLD,
    }
}

/// Whether `level` (1-based) may be opened within an unlocked `difficulty`.
#[must_use]
pub const fn level_unlocked(progress: &Progress, difficulty: Difficulty, level: u32) -> bool {
    level >= 1 && level <= progress.get(difficulty).saturating_add(1)
}

/// State of one cell on the level grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelStatus {
    Completed,
    Current,
    Locked,
}

impl LevelStatus {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Completed => "COMPLETED",
            Self::Current => "CURRENT",
            Self::Locked => "LOCKED",
        }
    }

    /// Button caption for selectable cells.
    #[must_use]
    pub const fn action(self) -> Option<&'static str> {
        match self {
            Self::Completed => Some("Replay"),
            Self::Current => Some("Continue"),
            Self::Locked => None,
        }
    }

    #[must_use]
    pub const fn is_selectable(self) -> bool {
        !matches!(self, Self::Locked)
    }
}

#[must_use]
pub const fn level_status(progress: &Progress, difficulty: Difficulty, level: u32) -> LevelStatus {
    let completed = progress.get(difficulty);
    if level >= 1 && level <= completed {
        LevelStatus::Completed
    } else if level == completed.saturating_add(1) {
        LevelStatus::Current
    } else {
        LevelStatus::Locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_easy_is_open_on_fresh_progress() {
        let progress = Progress::default();
        let open: Vec<Difficulty> = Difficulty::ALL
            .into_iter()
            .filter(|d| difficulty_unlocked(&progress, *d))
            .collect();
        assert_eq!(open, vec![Difficulty::Easy]);
    }

    #[test]
    fn tiers_open_at_threshold() {
        let mut progress = Progress::default();
        progress.easy = UNLOCK_THRESHOLD - 1;
        assert!(!difficulty_unlocked(&progress, Difficulty::Medium));
        progress.easy = UNLOCK_THRESHOLD;
        assert!(difficulty_unlocked(&progress, Difficulty::Medium));
        assert!(!difficulty_unlocked(&progress, Difficulty::Hard));
        progress.medium = UNLOCK_THRESHOLD;
        assert!(difficulty_unlocked(&progress, Difficulty::Hard));
    }

    #[test]
    fn hard_depends_only_on_medium() {
        let progress = Progress {
            easy: 0,
            medium: 6,
            hard: 0,
        };
        assert!(difficulty_unlocked(&progress, Difficulty::Hard));
        assert!(!difficulty_unlocked(&progress, Difficulty::Medium));
    }

    #[test]
    fn levels_open_up_to_the_frontier() {
        let progress = Progress {
            easy: 3,
            ..Progress::default()
        };
        assert!(!level_unlocked(&progress, Difficulty::Easy, 0));
        assert!(level_unlocked(&progress, Difficulty::Easy, 1));
        assert!(level_unlocked(&progress, Difficulty::Easy, 4));
        assert!(!level_unlocked(&progress, Difficulty::Easy, 5));
    }

    #[test]
    fn grid_status_around_frontier() {
        let progress = Progress {
            medium: 2,
            ..Progress::default()
        };
        assert_eq!(level_status(&progress, Difficulty::Medium, 2), LevelStatus::Completed);
        assert_eq!(level_status(&progress, Difficulty::Medium, 3), LevelStatus::Current);
        assert_eq!(level_status(&progress, Difficulty::Medium, 4), LevelStatus::Locked);
        assert_eq!(LevelStatus::Completed.action(), Some("Replay"));
        assert!(!LevelStatus::Locked.is_selectable());
    }
}
