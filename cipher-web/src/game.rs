//! Web-specific game engine implementation
//!
//! This module provides web-specific implementations of the cipher-game traits
//! and re-exports the core game logic types.

use wasm_bindgen::JsValue;

// Re-export all types from cipher-game
pub use cipher_game::*;

use crate::dom;

/// Bundled puzzle dataset.
pub const PUZZLES_JSON: &str = include_str!("../static/assets/data/puzzles.json");

/// Web-specific catalog loader reading the bundled dataset
#[derive(Debug, Clone, Copy, Default)]
pub struct WebPuzzleLoader;

#[derive(Debug, thiserror::Error)]
pub enum WebDataError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("puzzle catalog is empty")]
    Empty,
}

impl PuzzleLoader for WebPuzzleLoader {
    type Error = WebDataError;

    fn load_catalog(&self) -> Result<PuzzleCatalog, Self::Error> {
        let catalog = PuzzleCatalog::from_json(PUZZLES_JSON)?;
        if catalog.is_empty() {
            return Err(WebDataError::Empty);
        }
        Ok(catalog)
    }
}

/// Web-specific progress storage using localStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct WebProgressStorage;

#[derive(Debug, thiserror::Error)]
pub enum WebStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("Storage error: {0}")]
    Storage(String),
}

impl WebStorageError {
    fn storage(err: &JsValue) -> Self {
        Self::Storage(dom::js_error_message(err))
    }
}

fn storage_handle() -> Result<web_sys::Storage, WebStorageError> {
    dom::local_storage().map_err(|err| WebStorageError::Unavailable(dom::js_error_message(&err)))
}

impl ProgressStorage for WebProgressStorage {
    type Error = WebStorageError;

    fn read_record(&self, key: &str) -> Result<Option<String>, Self::Error> {
        storage_handle()?
            .get_item(key)
            .map_err(|err| WebStorageError::storage(&err))
    }

    fn write_record(&self, key: &str, payload: &str) -> Result<(), Self::Error> {
        storage_handle()?
            .set_item(key, payload)
            .map_err(|err| WebStorageError::storage(&err))
    }

    fn remove_record(&self, key: &str) -> Result<(), Self::Error> {
        storage_handle()?
            .remove_item(key)
            .map_err(|err| WebStorageError::storage(&err))
    }
}

/// Create a web-compatible engine with `WebPuzzleLoader` and `WebProgressStorage`
#[must_use]
pub const fn create_web_engine() -> CipherEngine<WebPuzzleLoader, WebProgressStorage> {
    CipherEngine::new(WebPuzzleLoader, WebProgressStorage)
}
