//! Persisted progress record and the store that reads and writes it.
//!
//! The record is a single JSON object kept under one fixed key. Reading is
//! forgiving: each field that is missing or has the wrong shape falls back to
//! its default on its own, so one bad value never discards the rest.
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;
use std::rc::Rc;

use crate::ProgressStorage;
use crate::constants::{DEFAULT_DARK_MODE, STATE_STORAGE_KEY};
use crate::difficulty::Difficulty;
use crate::progress::{HintLedger, LevelTotals, Progress};

/// In-memory form of the persisted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub current_mode: Option<Difficulty>,
    pub current_level: u32,
    pub progress: Progress,
    pub is_dark_mode: bool,
    pub hints_used: HintLedger,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            current_mode: None,
            current_level: 1,
            progress: Progress::default(),
            is_dark_mode: DEFAULT_DARK_MODE,
            hints_used: HintLedger::default(),
        }
    }
}

impl Snapshot {
    /// Parse a stored record, recovering field by field.
    ///
    /// # Errors
    ///
    /// Returns an error only when `json` is not JSON at all.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Build a snapshot from an arbitrary JSON value. Anything that is not an
    /// object yields the defaults; unknown keys are ignored.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let defaults = Self::default();
        let Some(record) = value.as_object() else {
            return defaults;
        };

        Self {
            current_mode: field::<Option<Difficulty>>(record, "currentMode")
                .unwrap_or(defaults.current_mode),
            current_level: field::<u32>(record, "currentLevel")
                .filter(|level| *level >= 1)
                .unwrap_or(defaults.current_level),
            progress: record
                .get("progress")
                .and_then(Value::as_object)
                .map_or(defaults.progress, progress_from_map),
            is_dark_mode: field::<bool>(record, "isDarkMode").unwrap_or(defaults.is_dark_mode),
            hints_used: record
                .get("hintsUsed")
                .and_then(Value::as_object)
                .map_or(defaults.hints_used, hints_from_map),
        }
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn field<T: DeserializeOwned>(record: &Map<String, Value>, key: &str) -> Option<T> {
    record
        .get(key)
        .and_then(|value| serde_json::from_value(value.clone()).ok())
}

fn progress_from_map(map: &Map<String, Value>) -> Progress {
    let mut progress = Progress::default();
    for difficulty in Difficulty::ALL {
        if let Some(completed) = field::<u32>(map, difficulty.as_str()) {
            progress.set(difficulty, completed);
        }
    }
    progress
}

fn hints_from_map(map: &Map<String, Value>) -> HintLedger {
    map.iter()
        .filter_map(|(id, used)| used.as_bool().map(|used| (id.clone(), used)))
        .collect()
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend(Box::new(err))
    }
}

/// Reads and writes the progress record through a platform storage backend.
#[derive(Debug, Clone)]
pub struct ProgressStore<S> {
    storage: S,
    key: String,
    totals: LevelTotals,
}

impl<S: ProgressStorage> ProgressStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: STATE_STORAGE_KEY.to_string(),
            totals: LevelTotals::default(),
        }
    }

    #[must_use]
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    #[must_use]
    pub const fn with_level_totals(mut self, totals: LevelTotals) -> Self {
        self.totals = totals;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub const fn level_totals(&self) -> LevelTotals {
        self.totals
    }

    /// Load the stored record. Never fails: an absent, unreadable or corrupt
    /// record yields defaults, and progress is clamped to the level totals.
    pub fn load(&self) -> Snapshot {
        let raw = match self.storage.read_record(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Snapshot::default(),
            Err(err) => {
                log::warn!("could not read '{}': {err}; using defaults", self.key);
                return Snapshot::default();
            }
        };

        let mut snapshot = Snapshot::from_json(&raw).unwrap_or_else(|err| {
            log::warn!("discarding corrupt record '{}': {err}", self.key);
            Snapshot::default()
        });
        snapshot.progress.clamp_to(&self.totals);
        snapshot
    }

    /// Overwrite the stored record with `snapshot` in a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be serialized or written.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let payload = snapshot.to_json()?;
        self.storage
            .write_record(&self.key, &payload)
            .map_err(StoreError::backend)
    }

    /// Delete the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the removal.
    pub fn reset(&self) -> Result<(), StoreError> {
        self.storage
            .remove_record(&self.key)
            .map_err(StoreError::backend)
    }
}

/// Process-local storage, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.records.borrow().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, payload: impl Into<String>) {
        self.records
            .borrow_mut()
            .insert(key.to_string(), payload.into());
    }
}

impl ProgressStorage for MemoryStorage {
    type Error = Infallible;

    fn read_record(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.raw(key))
    }

    fn write_record(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        self.insert_raw(key, payload);
        Ok(())
    }

    fn remove_record(&self, key: &str) -> Result<(), Self::Error> {
        self.records.borrow_mut().remove(key);
        Ok(())
    }
}
