#![cfg(target_arch = "wasm32")]

use cipher_game::constants::{LANGUAGE_STORAGE_KEY, STATE_STORAGE_KEY};
use cipher_game::{Difficulty, GameSession, Language, ProgressStorage, ProgressStore};
use cipher_web::game::WebProgressStorage;
use cipher_web::{dom, i18n, theme};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn clear_storage() {
    let storage = dom::local_storage().unwrap();
    storage.remove_item(STATE_STORAGE_KEY).unwrap();
    storage.remove_item(LANGUAGE_STORAGE_KEY).unwrap();
}

#[wasm_bindgen_test]
fn dom_helpers_find_window_and_root() {
    assert!(dom::window().is_some());
    assert!(dom::document().is_some());
    assert!(dom::root_element().is_some());
}

#[wasm_bindgen_test]
fn local_storage_round_trips_records() {
    clear_storage();
    let storage = WebProgressStorage;
    assert_eq!(storage.read_record("cipher-test").unwrap(), None);
    storage.write_record("cipher-test", "{}").unwrap();
    assert_eq!(storage.read_record("cipher-test").unwrap().as_deref(), Some("{}"));
    storage.remove_record("cipher-test").unwrap();
    assert_eq!(storage.read_record("cipher-test").unwrap(), None);
}

#[wasm_bindgen_test]
fn session_progress_persists_in_local_storage() {
    clear_storage();
    {
        let mut session = GameSession::open(ProgressStore::new(WebProgressStorage));
        session.select_difficulty(Difficulty::Easy).unwrap();
        session.complete_current_level().unwrap();
    }
    let reopened = GameSession::open(ProgressStore::new(WebProgressStorage));
    assert_eq!(reopened.progress().easy, 1);
    assert_eq!(reopened.current_level(), 2);
    clear_storage();
}

#[wasm_bindgen_test]
fn theme_class_follows_mode() {
    theme::apply_theme(false);
    let classes = dom::root_element().unwrap().class_list();
    assert!(classes.contains("light"));
    assert!(!classes.contains("dark"));
    theme::apply_theme(true);
    assert!(classes.contains("dark"));
}

#[wasm_bindgen_test]
fn language_choice_is_saved_separately() {
    clear_storage();
    i18n::set_language(Language::Hi);
    let saved = dom::local_storage()
        .unwrap()
        .get_item(LANGUAGE_STORAGE_KEY)
        .unwrap();
    assert_eq!(saved.as_deref(), Some("hi"));
    assert_eq!(
        dom::root_element().unwrap().get_attribute("lang").as_deref(),
        Some("hi")
    );
    i18n::set_language(Language::En);
    clear_storage();
}

#[wasm_bindgen_test]
async fn sleep_resolves() {
    dom::sleep_ms(10).await.unwrap();
}
