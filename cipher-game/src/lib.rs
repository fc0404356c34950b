//! Cipher Game Engine
//!
//! Platform-agnostic core logic for the Cipher puzzle game: tier progression,
//! the hint ledger, answer checking and the persisted progress record.
//! This crate has no UI or browser dependencies.

pub mod attempt;
pub mod catalog;
pub mod constants;
pub mod difficulty;
pub mod evaluator;
pub mod language;
pub mod progress;
pub mod screen;
pub mod session;
pub mod stats;
pub mod store;
pub mod unlock;

use anyhow::Context;

// Re-export commonly used types
pub use attempt::{Attempt, Feedback, format_elapsed};
pub use catalog::{PuzzleCatalog, PuzzleDefinition};
pub use difficulty::Difficulty;
pub use evaluator::{evaluate, is_blank};
pub use language::{Language, LocalizedText};
pub use progress::{HintLedger, LevelTotals, Progress};
pub use screen::{Screen, ScreenFlow};
pub use session::{Completion, GameSession, SessionError};
pub use stats::{ProgressSummary, summarize};
pub use store::{MemoryStorage, ProgressStore, Snapshot, StoreError};
pub use unlock::{LevelStatus, difficulty_unlocked, level_status, level_unlocked};

/// Trait for abstracting puzzle catalog loading
/// Platform-specific implementations should provide this
pub trait PuzzleLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the full puzzle catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or parsed.
    fn load_catalog(&self) -> Result<PuzzleCatalog, Self::Error>;
}

/// Trait for abstracting the key-value medium the progress record lives in
/// Platform-specific implementations should provide this
pub trait ProgressStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the raw record stored under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn read_record(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the record under `key` with `payload`
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written.
    fn write_record(&self, key: &str, payload: &str) -> Result<(), Self::Error>;

    /// Delete the record under `key`
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be removed.
    fn remove_record(&self, key: &str) -> Result<(), Self::Error>;
}

/// Entry point wiring a catalog source to a storage medium
pub struct CipherEngine<L, S>
where
    L: PuzzleLoader,
    S: ProgressStorage,
{
    loader: L,
    storage: S,
}

impl<L, S> CipherEngine<L, S>
where
    L: PuzzleLoader,
    S: ProgressStorage + Clone,
{
    /// Create a new engine with the provided catalog loader and storage
    pub const fn new(loader: L, storage: S) -> Self {
        Self { loader, storage }
    }

    /// Load the puzzle catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn load_catalog(&self) -> Result<PuzzleCatalog, L::Error> {
        self.loader.load_catalog()
    }

    /// Load the catalog and open a session whose level totals match it
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub fn open_session(&self) -> anyhow::Result<(PuzzleCatalog, GameSession<S>)> {
        let catalog = self
            .load_catalog()
            .map_err(anyhow::Error::new)
            .context("loading puzzle catalog")?;
        let store =
            ProgressStore::new(self.storage.clone()).with_level_totals(catalog.level_totals());
        Ok((catalog, GameSession::open(store)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[derive(Clone, Copy, Default)]
    struct FixtureLoader;

    impl PuzzleLoader for FixtureLoader {
        type Error = Infallible;

        fn load_catalog(&self) -> Result<PuzzleCatalog, Self::Error> {
            let puzzle = PuzzleDefinition {
                id: "e1".to_string(),
                question: LocalizedText::new("2, 4, 8, ?"),
                image: None,
                kind: "sequence".to_string(),
                answer: "16".to_string(),
                hint: LocalizedText::new("Doubling"),
                explanation: None,
            };
            Ok(PuzzleCatalog::empty().with_puzzles(Difficulty::Easy, vec![puzzle]))
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("asset missing")]
    struct MissingAsset;

    struct BrokenLoader;

    impl PuzzleLoader for BrokenLoader {
        type Error = MissingAsset;

        fn load_catalog(&self) -> Result<PuzzleCatalog, Self::Error> {
            Err(MissingAsset)
        }
    }

    #[test]
    fn engine_opens_session_sized_to_catalog() {
        let engine = CipherEngine::new(FixtureLoader, MemoryStorage::new());
        let (catalog, mut session) = engine.open_session().unwrap();
        assert_eq!(session.level_totals().easy, 1);

        session.select_difficulty(Difficulty::Easy).unwrap();
        let puzzle = session.current_puzzle(&catalog).expect("first puzzle");
        assert!(puzzle.check("16"));
        session.complete_current_level().unwrap();
        assert!(session.current_puzzle(&catalog).is_none());
        assert!(session.mode_complete());
    }

    #[test]
    fn engine_sessions_share_storage() {
        let storage = MemoryStorage::new();
        let engine = CipherEngine::new(FixtureLoader, storage.clone());
        let (_, mut first) = engine.open_session().unwrap();
        first.record_hint_used("e1").unwrap();

        let (_, second) = engine.open_session().unwrap();
        assert!(second.hint_used("e1"));
        assert!(storage.raw(constants::STATE_STORAGE_KEY).is_some());
    }

    #[test]
    fn engine_reports_catalog_failures_with_context() {
        let engine = CipherEngine::new(BrokenLoader, MemoryStorage::new());
        let err = engine.open_session().err().expect("loader fails");
        assert!(format!("{err:#}").contains("loading puzzle catalog"));
    }
}
