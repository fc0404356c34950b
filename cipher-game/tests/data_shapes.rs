use cipher_game::constants::STATE_STORAGE_KEY;
use cipher_game::{
    Difficulty, GameSession, Language, MemoryStorage, ProgressStore, PuzzleCatalog, Snapshot,
};
use serde_json::Value;

const BUNDLED: &str = include_str!("../../cipher-web/static/assets/data/puzzles.json");

#[test]
fn bundled_catalog_has_ten_levels_per_tier() {
    let catalog = PuzzleCatalog::from_json(BUNDLED).unwrap();
    for difficulty in Difficulty::ALL {
        assert_eq!(catalog.level_total(difficulty), 10, "{difficulty}");
        for (idx, puzzle) in catalog.puzzles(difficulty).iter().enumerate() {
            assert!(!puzzle.id.is_empty());
            assert!(!puzzle.answer.trim().is_empty(), "{} has no answer", puzzle.id);
            assert!(!puzzle.question(Language::En).is_empty());
            assert!(!puzzle.hint(Language::Hi).is_empty());
            assert_eq!(puzzle.id, format!("{}-{}", difficulty.as_str(), idx + 1));
        }
    }
}

#[test]
fn bundled_catalog_ids_are_unique() {
    let catalog = PuzzleCatalog::from_json(BUNDLED).unwrap();
    let mut ids: Vec<&str> = Difficulty::ALL
        .iter()
        .flat_map(|d| catalog.puzzles(*d).iter().map(|p| p.id.as_str()))
        .collect();
    let before = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), before);
}

#[test]
fn persisted_record_uses_camel_case_fields() {
    let storage = MemoryStorage::new();
    let mut session = GameSession::open(ProgressStore::new(storage.clone()));
    session.select_difficulty(Difficulty::Easy).unwrap();
    session.complete_current_level().unwrap();
    session.record_hint_used("easy-2").unwrap();

    let raw = storage.raw(STATE_STORAGE_KEY).expect("record written");
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["currentMode"], "easy");
    assert_eq!(value["currentLevel"], 2);
    assert_eq!(value["progress"]["easy"], 1);
    assert_eq!(value["progress"]["medium"], 0);
    assert_eq!(value["isDarkMode"], true);
    assert_eq!(value["hintsUsed"]["easy-2"], true);
}

#[test]
fn partially_damaged_record_keeps_valid_fields() {
    let storage = MemoryStorage::new();
    storage.insert_raw(
        STATE_STORAGE_KEY,
        r#"{"currentMode":"legendary","currentLevel":"x","progress":{"easy":7,"hard":"?"},"isDarkMode":false}"#,
    );
    let snapshot = ProgressStore::new(storage.clone()).load();
    assert_eq!(snapshot.current_mode, None);
    assert_eq!(snapshot.current_level, 1);
    assert_eq!(snapshot.progress.easy, 7);
    assert_eq!(snapshot.progress.hard, 0);
    assert!(!snapshot.is_dark_mode);
    assert!(snapshot.hints_used.is_empty());
}

#[test]
fn unparseable_record_falls_back_to_defaults() {
    let storage = MemoryStorage::new();
    storage.insert_raw(STATE_STORAGE_KEY, "{not json");
    let snapshot = ProgressStore::new(storage).load();
    assert_eq!(snapshot, Snapshot::default());
}
