//! Game session state machine.
//!
//! [`GameSession`] owns the selected difficulty, the current level, progress,
//! the hint ledger and the display mode. State changes only through the named
//! operations below, and every operation that changes state writes the record
//! back through its [`ProgressStore`] before returning.
use serde::{Deserialize, Serialize};

use crate::ProgressStorage;
use crate::catalog::{PuzzleCatalog, PuzzleDefinition};
use crate::constants::DEFAULT_DARK_MODE;
use crate::difficulty::Difficulty;
use crate::progress::{HintLedger, LevelTotals, Progress};
use crate::store::{ProgressStore, Snapshot, StoreError};
use crate::unlock::{self, LevelStatus};

/// Result of completing the current level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Completion {
    /// The frontier level was solved; `completed` is the new progress count.
    Advanced {
        difficulty: Difficulty,
        completed: u32,
    },
    /// An already completed level was solved again. Progress is unchanged.
    Replayed,
    /// Every level of the tier is already complete.
    Saturated,
    /// No difficulty is selected.
    NoDifficulty,
}

impl Completion {
    #[must_use]
    pub const fn advanced(self) -> bool {
        matches!(self, Self::Advanced { .. })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0} is locked")]
    DifficultyLocked(Difficulty),
    #[error("level {level} of {difficulty} is locked")]
    LevelLocked { difficulty: Difficulty, level: u32 },
    #[error("level {level} is outside 1..={total} for {difficulty}")]
    LevelOutOfRange {
        difficulty: Difficulty,
        level: u32,
        total: u32,
    },
    #[error("no difficulty selected")]
    NoDifficulty,
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct GameSession<S: ProgressStorage> {
    store: ProgressStore<S>,
    totals: LevelTotals,
    progress: Progress,
    hints: HintLedger,
    dark_mode: bool,
    current_difficulty: Option<Difficulty>,
    current_level: u32,
}

impl<S: ProgressStorage> GameSession<S> {
    /// Open a session from whatever the store currently holds.
    pub fn open(store: ProgressStore<S>) -> Self {
        let snapshot = store.load();
        let totals = store.level_totals();
        let mut session = Self {
            store,
            totals,
            progress: snapshot.progress,
            hints: snapshot.hints_used,
            dark_mode: snapshot.is_dark_mode,
            current_difficulty: snapshot.current_mode,
            current_level: snapshot.current_level,
        };
        // A stored position ahead of the frontier cannot be reached through
        // the grid; pull it back rather than resume there.
        if let Some(difficulty) = session.current_difficulty {
            let frontier = session.progress.get(difficulty).saturating_add(1);
            if session.current_level > frontier {
                log::warn!(
                    "stored level {} of {difficulty} is past the frontier; resuming at {frontier}",
                    session.current_level
                );
                session.current_level = frontier;
            }
        }
        log::debug!("session opened with progress {:?}", session.progress);
        session
    }

    pub const fn progress(&self) -> &Progress {
        &self.progress
    }

    pub const fn hints(&self) -> &HintLedger {
        &self.hints
    }

    pub fn hint_used(&self, puzzle_id: &str) -> bool {
        self.hints.is_used(puzzle_id)
    }

    pub const fn current_difficulty(&self) -> Option<Difficulty> {
        self.current_difficulty
    }

    pub const fn current_level(&self) -> u32 {
        self.current_level
    }

    pub const fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub const fn level_totals(&self) -> LevelTotals {
        self.totals
    }

    pub const fn store(&self) -> &ProgressStore<S> {
        &self.store
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_mode: self.current_difficulty,
            current_level: self.current_level,
            progress: self.progress,
            is_dark_mode: self.dark_mode,
            hints_used: self.hints.clone(),
        }
    }

    pub const fn difficulty_unlocked(&self, difficulty: Difficulty) -> bool {
        unlock::difficulty_unlocked(&self.progress, difficulty)
    }

    pub const fn level_status(&self, difficulty: Difficulty, level: u32) -> LevelStatus {
        unlock::level_status(&self.progress, difficulty, level)
    }

    /// Puzzle at the current position, or `None` when no difficulty is
    /// selected or the tier has no puzzle there ("mode complete").
    pub fn current_puzzle<'a>(&self, catalog: &'a PuzzleCatalog) -> Option<&'a PuzzleDefinition> {
        catalog.get_puzzle(self.current_difficulty?, self.current_level)
    }

    /// Whether every level of the selected tier is complete.
    pub fn mode_complete(&self) -> bool {
        self.current_difficulty
            .is_some_and(|d| self.progress.get(d) >= self.totals.get(d))
    }

    /// Select a tier and resume at its first incomplete level.
    ///
    /// Does not check the unlock rule; see [`Self::try_select_difficulty`].
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written. The selection is
    /// applied in memory regardless.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> Result<(), StoreError> {
        self.current_difficulty = Some(difficulty);
        self.current_level = self.progress.get(difficulty).saturating_add(1).max(1);
        log::debug!("selected {difficulty}, level {}", self.current_level);
        self.persist()
    }

    /// Select a tier only if the unlock rule allows it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::DifficultyLocked`] for a locked tier, or a store
    /// error if the record cannot be written.
    pub fn try_select_difficulty(&mut self, difficulty: Difficulty) -> Result<(), SessionError> {
        if !self.difficulty_unlocked(difficulty) {
            return Err(SessionError::DifficultyLocked(difficulty));
        }
        self.select_difficulty(difficulty)?;
        Ok(())
    }

    /// Move to `level` without any bounds check.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn select_level(&mut self, level: u32) -> Result<(), StoreError> {
        self.current_level = level;
        log::debug!("selected level {level}");
        self.persist()
    }

    /// Move to `level` only if it exists and is unlocked in the selected tier.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionError`] describing the rejected position, or a store
    /// error if the record cannot be written.
    pub fn try_select_level(&mut self, level: u32) -> Result<(), SessionError> {
        let difficulty = self.current_difficulty.ok_or(SessionError::NoDifficulty)?;
        let total = self.totals.get(difficulty);
        if level == 0 || level > total {
            return Err(SessionError::LevelOutOfRange {
                difficulty,
                level,
                total,
            });
        }
        if !unlock::level_unlocked(&self.progress, difficulty, level) {
            return Err(SessionError::LevelLocked { difficulty, level });
        }
        self.select_level(level)?;
        Ok(())
    }

    /// Record that the current level was solved.
    ///
    /// Only the frontier level advances progress. Callers must not invoke this
    /// for positions beyond the frontier; progress is still never pushed past
    /// the tier's level total.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn complete_current_level(&mut self) -> Result<Completion, StoreError> {
        let Some(difficulty) = self.current_difficulty else {
            return Ok(Completion::NoDifficulty);
        };
        let completed = self.progress.get(difficulty);
        if self.current_level <= completed {
            log::debug!("replayed level {} of {difficulty}", self.current_level);
            return Ok(Completion::Replayed);
        }
        if completed >= self.totals.get(difficulty) {
            return Ok(Completion::Saturated);
        }

        let completed = completed + 1;
        self.progress.set(difficulty, completed);
        self.current_level = self.current_level.saturating_add(1);
        log::debug!("{difficulty} progress advanced to {completed}");
        self.persist()?;
        Ok(Completion::Advanced {
            difficulty,
            completed,
        })
    }

    /// Mark a puzzle's hint as revealed. Returns `true` on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn record_hint_used(&mut self, puzzle_id: &str) -> Result<bool, StoreError> {
        let newly = self.hints.record(puzzle_id);
        self.persist()?;
        Ok(newly)
    }

    /// Flip between dark and light display. Returns the new mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    pub fn toggle_display_mode(&mut self) -> Result<bool, StoreError> {
        self.dark_mode = !self.dark_mode;
        self.persist()?;
        Ok(self.dark_mode)
    }

    /// Forget all progress, hints and the current position, and delete the
    /// stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the removal.
    pub fn reset_all(&mut self) -> Result<(), StoreError> {
        self.progress = Progress::default();
        self.hints.clear();
        self.dark_mode = DEFAULT_DARK_MODE;
        self.current_difficulty = None;
        self.current_level = 1;
        log::info!("progress reset");
        self.store
            .reset()
            .inspect_err(|err| log::error!("failed to delete progress record: {err}"))
    }

    fn persist(&self) -> Result<(), StoreError> {
        self.store
            .save(&self.snapshot())
            .inspect_err(|err| log::error!("failed to persist progress: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::STATE_STORAGE_KEY;
    use crate::store::MemoryStorage;

    fn fresh() -> (MemoryStorage, GameSession<MemoryStorage>) {
        let storage = MemoryStorage::new();
        let session = GameSession::open(ProgressStore::new(storage.clone()));
        (storage, session)
    }

    fn clear_levels(session: &mut GameSession<MemoryStorage>, count: u32) {
        for _ in 0..count {
            assert!(session.complete_current_level().unwrap().advanced());
        }
    }

    #[test]
    fn selecting_a_fresh_tier_starts_at_level_one() {
        let (_, mut session) = fresh();
        session.select_difficulty(Difficulty::Easy).unwrap();
        assert_eq!(session.current_level(), 1);
        assert_eq!(session.current_difficulty(), Some(Difficulty::Easy));
    }

    #[test]
    fn selecting_a_tier_resumes_after_completed_levels() {
        let (_, mut session) = fresh();
        session.select_difficulty(Difficulty::Easy).unwrap();
        clear_levels(&mut session, 3);
        session.select_difficulty(Difficulty::Medium).unwrap();
        session.select_difficulty(Difficulty::Easy).unwrap();
        assert_eq!(session.current_level(), 4);
    }

    #[test]
    fn frontier_completion_advances_by_one() {
        let (_, mut session) = fresh();
        session.select_difficulty(Difficulty::Easy).unwrap();
        let outcome = session.complete_current_level().unwrap();
        assert_eq!(
            outcome,
            Completion::Advanced {
                difficulty: Difficulty::Easy,
                completed: 1
            }
        );
        assert_eq!(session.current_level(), 2);
    }

    #[test]
    fn replay_leaves_progress_unchanged() {
        let (_, mut session) = fresh();
        session.select_difficulty(Difficulty::Easy).unwrap();
        clear_levels(&mut session, 4);
        session.select_level(2).unwrap();
        assert_eq!(session.complete_current_level().unwrap(), Completion::Replayed);
        assert_eq!(session.progress().easy, 4);
        assert_eq!(session.current_level(), 2);
    }

    #[test]
    fn progress_never_exceeds_level_total() {
        let storage = MemoryStorage::new();
        let store = ProgressStore::new(storage).with_level_totals(LevelTotals::uniform(2));
        let mut session = GameSession::open(store);
        session.select_difficulty(Difficulty::Hard).unwrap();
        clear_levels(&mut session, 2);
        assert_eq!(session.current_level(), 3);
        assert!(session.mode_complete());
        assert_eq!(session.complete_current_level().unwrap(), Completion::Saturated);
        assert_eq!(session.progress().hard, 2);
    }

    #[test]
    fn completing_without_difficulty_is_a_no_op() {
        let (storage, mut session) = fresh();
        assert_eq!(
            session.complete_current_level().unwrap(),
            Completion::NoDifficulty
        );
        assert!(storage.raw(STATE_STORAGE_KEY).is_none());
    }

    #[test]
    fn guarded_selection_enforces_unlocks() {
        let (_, mut session) = fresh();
        assert!(matches!(
            session.try_select_difficulty(Difficulty::Medium),
            Err(SessionError::DifficultyLocked(Difficulty::Medium))
        ));
        assert!(matches!(
            session.try_select_level(1),
            Err(SessionError::NoDifficulty)
        ));
        session.try_select_difficulty(Difficulty::Easy).unwrap();
        assert!(matches!(
            session.try_select_level(3),
            Err(SessionError::LevelLocked { level: 3, .. })
        ));
        assert!(matches!(
            session.try_select_level(11),
            Err(SessionError::LevelOutOfRange { total: 10, .. })
        ));
        session.try_select_level(1).unwrap();
    }

    #[test]
    fn hint_usage_is_idempotent_and_persisted() {
        let (storage, mut session) = fresh();
        assert!(session.record_hint_used("easy-1").unwrap());
        assert!(!session.record_hint_used("easy-1").unwrap());
        assert!(session.hint_used("easy-1"));
        let reopened = GameSession::open(ProgressStore::new(storage));
        assert!(reopened.hint_used("easy-1"));
    }

    #[test]
    fn every_mutation_is_written_through() {
        let (storage, mut session) = fresh();
        session.toggle_display_mode().unwrap();
        let stored = Snapshot::from_json(&storage.raw(STATE_STORAGE_KEY).unwrap()).unwrap();
        assert!(!stored.is_dark_mode);

        session.select_difficulty(Difficulty::Easy).unwrap();
        session.complete_current_level().unwrap();
        let stored = Snapshot::from_json(&storage.raw(STATE_STORAGE_KEY).unwrap()).unwrap();
        assert_eq!(stored, session.snapshot());
    }

    #[test]
    fn reset_restores_defaults_and_removes_record() {
        let (storage, mut session) = fresh();
        session.select_difficulty(Difficulty::Easy).unwrap();
        clear_levels(&mut session, 5);
        session.record_hint_used("easy-3").unwrap();
        session.toggle_display_mode().unwrap();

        session.reset_all().unwrap();
        assert_eq!(session.snapshot(), Snapshot::default());
        assert!(storage.raw(STATE_STORAGE_KEY).is_none());
        for difficulty in Difficulty::ALL {
            assert_eq!(session.progress().get(difficulty), 0);
            assert_eq!(
                session.difficulty_unlocked(difficulty),
                difficulty == Difficulty::Easy
            );
        }
    }

    #[test]
    fn open_pulls_back_positions_past_the_frontier() {
        let storage = MemoryStorage::new();
        storage.insert_raw(
            STATE_STORAGE_KEY,
            r#"{"currentMode":"easy","currentLevel":9,"progress":{"easy":2}}"#,
        );
        let session = GameSession::open(ProgressStore::new(storage));
        assert_eq!(session.current_level(), 3);
    }
}
